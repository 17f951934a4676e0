//! Disease → compound relationships derived through shared pathways.

use std::{
    collections::{BTreeSet, HashMap},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{error, info, instrument, warn};

use crate::{
    kegg::{
        ids::{EntityKind, PathwayId, ORGANISM},
        tabular::LinkPair,
        KeggClient,
    },
    store::{BatchReport, PairTable, Store},
};

use super::RelationSet;

/// Rows per insert transaction.
pub const CHUNK_SIZE: usize = 50_000;
/// CSV export file name under the data directory.
pub const EXPORT_NAME: &str = "disease_compounds.csv";

/// Join `(disease, pathway)` rows with `pathway → compound` links.
///
/// Only reference pathway links (`path:map#####`) are joined; they are
/// rewritten for [`ORGANISM`] first, so `path:map00010` matches a disease
/// stored with `path:hsa00010`.
pub fn disease_compound_pairs(
    disease_pathways: &[(String, String)],
    links: &[LinkPair],
) -> RelationSet {
    let mut by_pathway: HashMap<PathwayId, BTreeSet<&str>> = HashMap::new();
    for (disease, pathway) in disease_pathways {
        if let Some(pathway) = PathwayId::parse(pathway) {
            by_pathway.entry(pathway).or_default().insert(disease);
        }
    }

    let mut pairs = RelationSet::new();
    for link in links {
        let (Some(pathway), Some(compound)) = (
            PathwayId::parse(&link.source),
            EntityKind::Compound.normalise(&link.target),
        ) else {
            continue;
        };
        if !pathway.is_reference() {
            continue;
        }
        if let Some(diseases) = by_pathway.get(&pathway.for_organism(ORGANISM)) {
            for disease in diseases {
                pairs.insert(*disease, compound.clone());
            }
        }
    }
    pairs
}

/// Totals for one disease-compounds run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiseaseCompoundReport {
    pub disease_pathways: usize,
    pub links: usize,
    pub pairs: usize,
    pub saved: BatchReport,
    pub exported: Option<usize>,
}

fn load_disease_pathways(db_path: &Path) -> Result<Vec<(String, String)>> {
    let store = Store::open(db_path).with_context(|| format!("open {db_path:?}"))?;
    if let Err(err) = store.tune_for_bulk_load() {
        warn!(%err, "bulk load pragmas not applied");
    }
    store.ensure_schema()?;
    Ok(store.pairs(PairTable::DiseasePathways)?)
}

fn save(db_path: &Path, pairs: RelationSet, export: Option<PathBuf>) -> Result<(BatchReport, Option<usize>)> {
    let mut store = Store::open(db_path).with_context(|| format!("open {db_path:?}"))?;
    store.ensure_schema()?;
    let saved = store.insert_pairs(PairTable::DiseaseCompounds, &pairs.into_vec(), CHUNK_SIZE);
    let exported = match export {
        Some(dest) => Some(
            store
                .export_csv(PairTable::DiseaseCompounds.name(), &dest)
                .with_context(|| format!("export {dest:?}"))?,
        ),
        None => None,
    };
    Ok((saved, exported))
}

/// Rebuild `DiseaseCompounds` from `DiseasePathways` and the KEGG
/// pathway/compound link table, optionally exporting the result to `export`.
#[instrument(skip(kegg))]
pub async fn run(
    kegg: &KeggClient,
    db_path: &Path,
    export: Option<PathBuf>,
) -> Result<DiseaseCompoundReport> {
    let path = db_path.to_path_buf();
    let disease_pathways =
        tokio::task::spawn_blocking(move || load_disease_pathways(&path)).await??;
    info!(rows = disease_pathways.len(), "loaded disease pathways");

    let links = match kegg.link("compound", "pathway").await {
        Ok(links) => links,
        Err(err) => {
            error!(%err, "pathway/compound links unavailable");
            Vec::new()
        }
    };
    info!(links = links.len(), "fetched pathway compound links");

    let pairs = disease_compound_pairs(&disease_pathways, &links);
    let mut report = DiseaseCompoundReport {
        disease_pathways: disease_pathways.len(),
        links: links.len(),
        pairs: pairs.len(),
        ..DiseaseCompoundReport::default()
    };
    info!(pairs = report.pairs, diseases = pairs.left_count(), "derived disease compounds");

    let path = db_path.to_path_buf();
    let (saved, exported) = tokio::task::spawn_blocking(move || save(&path, pairs, export)).await??;
    report.saved = saved;
    report.exported = exported;

    info!(
        inserted = report.saved.inserted,
        failed_batches = report.saved.failed_batches,
        exported = ?report.exported,
        "disease compounds finished"
    );
    Ok(report)
}
