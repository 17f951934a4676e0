//! KEGG REST client and response parsers.

pub mod flatfile;
pub mod ids;
pub mod kgml;
pub mod tabular;

use crate::{config::Settings, error::FetchError, http::Fetcher};

use self::{
    ids::EntityKind,
    tabular::{LinkPair, ListEntry},
};

/// Thin typed wrapper over the KEGG endpoints used by the pipelines.
#[derive(Debug, Clone)]
pub struct KeggClient {
    fetcher: Fetcher,
    base_url: String,
}

impl KeggClient {
    pub fn new(fetcher: Fetcher, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { fetcher, base_url }
    }

    /// Client honouring the configured retry policy and KEGG rate limit.
    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        let fetcher = Fetcher::new(
            settings.http_timeout(),
            settings.retry_policy(),
            settings.kegg_limiter(),
        )?;
        Ok(Self::new(fetcher, settings.kegg_base_url.clone()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// `GET /list/{database}`
    pub async fn list(&self, database: &str) -> Result<Vec<ListEntry>, FetchError> {
        let body = self.fetcher.get_text(&self.url(&format!("list/{database}"))).await?;
        Ok(tabular::parse_list(&body))
    }

    /// Entry codes of `kind`, qualifiers stripped, other shapes dropped.
    pub async fn list_ids(&self, kind: EntityKind) -> Result<Vec<String>, FetchError> {
        Ok(self
            .list(kind.database())
            .await?
            .into_iter()
            .filter_map(|entry| kind.normalise(&entry.id))
            .collect())
    }

    /// `GET /link/{target}/{source}`
    pub async fn link(&self, target: &str, source: &str) -> Result<Vec<LinkPair>, FetchError> {
        let body = self
            .fetcher
            .get_text(&self.url(&format!("link/{target}/{source}")))
            .await?;
        Ok(tabular::parse_links(&body))
    }

    /// `GET /get/{id}`: the flat-file entry.
    pub async fn entry(&self, id: &str) -> Result<String, FetchError> {
        self.fetcher.get_text(&self.url(&format!("get/{id}"))).await
    }

    /// `GET /get/{id}/mol`
    pub async fn molfile(&self, id: &str) -> Result<String, FetchError> {
        self.fetcher.get_text(&self.url(&format!("get/{id}/mol"))).await
    }

    /// `GET /get/{pathway}/kgml`
    pub async fn kgml(&self, pathway: &str) -> Result<String, FetchError> {
        self.fetcher.get_text(&self.url(&format!("get/{pathway}/kgml"))).await
    }
}
