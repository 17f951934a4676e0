//! PubChem PUG-REST lookups used as the structure fallback.

use crate::{config::Settings, error::FetchError, http::Fetcher};

#[derive(Debug, Clone)]
pub struct PubChemClient {
    fetcher: Fetcher,
    base_url: String,
}

impl PubChemClient {
    pub fn new(fetcher: Fetcher, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { fetcher, base_url }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        let fetcher = Fetcher::new(
            settings.http_timeout(),
            settings.retry_policy(),
            settings.pubchem_limiter(),
        )?;
        Ok(Self::new(fetcher, settings.pubchem_base_url.clone()))
    }

    /// `GET /compound/cid/{cid}/SDF`: structure record for the compound.
    pub async fn sdf(&self, cid: &str) -> Result<String, FetchError> {
        let url = format!("{}/compound/cid/{cid}/SDF", self.base_url);
        self.fetcher.get_text(&url).await
    }

    /// Canonical SMILES for the compound, `None` when PubChem returns nothing.
    pub async fn canonical_smiles(&self, cid: &str) -> Result<Option<String>, FetchError> {
        let url = format!(
            "{}/compound/cid/{cid}/property/CanonicalSMILES/TXT",
            self.base_url
        );
        let body = self.fetcher.get_text(&url).await?;
        Ok(body
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string))
    }
}
