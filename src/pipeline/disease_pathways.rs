//! Disease → pathway harvesting into a SQL script.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

use crate::{
    http::or_empty,
    kegg::{flatfile, ids::EntityKind, ids::PathwayId, KeggClient},
    store::script::{self, ScriptSummary, DISEASE_PATHWAYS_SCRIPT},
};

use super::fanout;

/// Pathways found per disease, in disease list order.
pub type DiseasePathways = IndexMap<String, BTreeSet<PathwayId>>;

#[derive(Debug, Clone)]
pub struct DiseasePathwayOptions {
    pub workers: usize,
    /// Pause between diseases handled by the same worker.
    pub item_pause: Duration,
    /// Pause inserted every `gene_pause_every` gene lookups.
    pub gene_pause: Duration,
    pub gene_pause_every: usize,
}

impl Default for DiseasePathwayOptions {
    fn default() -> Self {
        Self {
            workers: 4,
            item_pause: Duration::from_millis(500),
            gene_pause: Duration::from_secs(1),
            gene_pause_every: 5,
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct DiseasePathwayRun {
    pub diseases: usize,
    pub summary: ScriptSummary,
    pub script: Option<PathBuf>,
}

/// True before the `every`-th, `2·every`-th, ... gene lookup (`idx` is 0-based).
fn gene_pause_due(idx: usize, every: usize) -> bool {
    every > 0 && (idx + 1) % every == 0
}

/// Union of the pathways linked to `disease` directly, named in its entry's
/// `PATHWAY` section, and linked to any of its genes.
pub async fn pathways_for_disease(
    kegg: &KeggClient,
    disease: &str,
    opts: &DiseasePathwayOptions,
) -> BTreeSet<PathwayId> {
    let mut pathways = BTreeSet::new();

    let direct = or_empty(kegg.link("pathway", disease).await, disease);
    pathways.extend(direct.iter().filter_map(|link| PathwayId::parse(&link.target)));

    let entry = or_empty(kegg.entry(disease).await, disease);
    pathways.extend(flatfile::pathway_codes(&entry));

    let genes = or_empty(kegg.link("hsa", disease).await, disease);
    for (idx, gene) in genes.iter().enumerate() {
        if gene_pause_due(idx, opts.gene_pause_every) && !opts.gene_pause.is_zero() {
            sleep(opts.gene_pause).await;
        }
        let links = or_empty(kegg.link("pathway", &gene.target).await, &gene.target);
        pathways.extend(links.iter().filter_map(|link| PathwayId::parse(&link.target)));
    }

    pathways
}

/// Resolve pathways for every disease using contiguous worker chunks.
pub async fn collect(
    kegg: &KeggClient,
    diseases: Vec<String>,
    opts: &DiseasePathwayOptions,
) -> DiseasePathways {
    let worker_kegg = kegg.clone();
    let worker_opts = opts.clone();
    let work = move |disease: String| {
        let kegg = worker_kegg.clone();
        let opts = worker_opts.clone();
        async move { Ok::<_, anyhow::Error>(pathways_for_disease(&kegg, &disease, &opts).await) }
    };

    fanout::run_chunked("diseases", diseases, opts.workers, opts.item_pause, work)
        .await
        .into_iter()
        .collect()
}

/// List human diseases, resolve their pathways, and write the SQL script
/// into `output_dir`.
#[instrument(skip(kegg, opts))]
pub async fn run(
    kegg: &KeggClient,
    opts: &DiseasePathwayOptions,
    output_dir: &Path,
) -> Result<DiseasePathwayRun> {
    info!("fetching human diseases from KEGG");
    let diseases = kegg
        .list_ids(EntityKind::Disease)
        .await
        .context("could not retrieve disease list")?;
    if diseases.is_empty() {
        warn!("disease list is empty; no script written");
        return Ok(DiseasePathwayRun {
            diseases: 0,
            summary: ScriptSummary::default(),
            script: None,
        });
    }
    info!(diseases = diseases.len(), workers = opts.workers, "resolving pathways");

    let total = diseases.len();
    let results = collect(kegg, diseases, opts).await;

    let path = output_dir.join(DISEASE_PATHWAYS_SCRIPT);
    let summary = script::write_disease_pathways_file(&path, &results)
        .with_context(|| format!("write {path:?}"))?;

    info!(
        inserts = summary.inserts,
        with_pathways = summary.with_pathways,
        without_pathways = summary.without_pathways,
        "disease pathway summary"
    );
    Ok(DiseasePathwayRun {
        diseases: total,
        summary,
        script: Some(path),
    })
}
