//! Drug → pathway harvesting into the `DrugPathways` table.
//!
//! Five independent methods feed one [`RelationSet`]; only pairs whose drug
//! and pathway are already known to the database are kept, spelled the way
//! the database spells them.

use std::{collections::HashMap, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::{
    cli::DrugPathwayMethod,
    http::or_empty,
    kegg::{
        flatfile,
        ids::{EntityKind, PathwayId},
        kgml, KeggClient,
    },
    store::{PairTable, Store},
};

use super::{fanout, RelationSet};

/// Items handled sequentially by one task in the batched methods.
pub const BATCH_SIZE: usize = 100;
/// Rows per insert transaction.
pub const SAVE_BATCH: usize = 1_000;

/// Drugs and pathways known to the database, keyed by normalised code.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    drugs: HashMap<String, String>,
    pathways: HashMap<String, String>,
}

impl Catalog {
    pub fn new(drug_rows: Vec<String>, pathway_rows: Vec<String>) -> Self {
        let drugs = drug_rows
            .into_iter()
            .filter_map(|stored| {
                EntityKind::Drug
                    .normalise(&stored)
                    .map(|code| (code, stored))
            })
            .collect();
        let pathways = pathway_rows
            .into_iter()
            .filter_map(|stored| {
                PathwayId::parse(&stored).map(|id| (id.as_str().to_string(), stored))
            })
            .collect();
        Self { drugs, pathways }
    }

    pub fn drug_count(&self) -> usize {
        self.drugs.len()
    }

    pub fn pathway_count(&self) -> usize {
        self.pathways.len()
    }

    /// Normalised drug codes, sorted.
    pub fn drug_codes(&self) -> Vec<String> {
        let mut codes: Vec<_> = self.drugs.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Unqualified pathway codes, sorted.
    pub fn pathway_codes(&self) -> Vec<String> {
        let mut codes: Vec<_> = self.pathways.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Stored spellings of `drug` and `pathway` when both are known.
    pub fn pair(&self, drug: &str, pathway: &PathwayId) -> Option<(String, String)> {
        let code = EntityKind::Drug.normalise(drug)?;
        let drug = self.drugs.get(&code)?;
        let pathway = self.pathways.get(pathway.as_str())?;
        Some((drug.clone(), pathway.clone()))
    }
}

fn merge_results<T>(results: Vec<(T, RelationSet)>) -> RelationSet {
    let mut all = RelationSet::new();
    for (_, found) in results {
        all.merge(found);
    }
    all
}

/// Method 1: `PATHWAY` sections of the drug entries, in batches.
pub async fn from_drug_entries(kegg: &KeggClient, catalog: &Catalog, workers: usize) -> RelationSet {
    let batches: Vec<Vec<String>> = catalog
        .drug_codes()
        .chunks(BATCH_SIZE)
        .map(<[String]>::to_vec)
        .collect();
    let results = fanout::run_each("drug entry batches", batches, workers, |batch| async move {
        let mut found = RelationSet::new();
        for drug in &batch {
            let entry = or_empty(kegg.entry(drug).await, drug);
            found.extend(
                flatfile::pathway_codes(&entry)
                    .iter()
                    .filter_map(|pathway| catalog.pair(drug, pathway)),
            );
        }
        Ok::<_, anyhow::Error>(found)
    })
    .await;
    merge_results(results)
}

/// Method 2: pathways of the genes named in each drug's `TARGET` section.
pub async fn from_drug_targets(kegg: &KeggClient, catalog: &Catalog, workers: usize) -> RelationSet {
    let results = fanout::run_each("drug targets", catalog.drug_codes(), workers, |drug| async move {
        let mut found = RelationSet::new();
        let entry = or_empty(kegg.entry(&drug).await, &drug);
        for gene in flatfile::target_genes(&entry) {
            let gene_entry = or_empty(kegg.entry(&gene).await, &gene);
            found.extend(
                flatfile::pathway_codes(&gene_entry)
                    .iter()
                    .filter_map(|pathway| catalog.pair(&drug, pathway)),
            );
        }
        Ok::<_, anyhow::Error>(found)
    })
    .await;
    merge_results(results)
}

/// Method 3: `DRUG` sections of the pathway entries, in batches.
pub async fn from_pathway_listings(
    kegg: &KeggClient,
    catalog: &Catalog,
    workers: usize,
) -> RelationSet {
    let batches: Vec<Vec<String>> = catalog
        .pathway_codes()
        .chunks(BATCH_SIZE)
        .map(<[String]>::to_vec)
        .collect();
    let results = fanout::run_each("pathway batches", batches, workers, |batch| async move {
        let mut found = RelationSet::new();
        for code in &batch {
            let Some(pathway) = PathwayId::parse(code) else {
                continue;
            };
            let entry = or_empty(kegg.entry(code).await, code);
            found.extend(
                flatfile::drug_codes(&entry)
                    .iter()
                    .filter_map(|drug| catalog.pair(drug, &pathway)),
            );
        }
        Ok::<_, anyhow::Error>(found)
    })
    .await;
    merge_results(results)
}

/// Method 4: drug entries of each pathway's KGML map.
pub async fn from_kgml(kegg: &KeggClient, catalog: &Catalog, workers: usize) -> RelationSet {
    let results = fanout::run_each("pathway kgml", catalog.pathway_codes(), workers, |code| async move {
        let mut found = RelationSet::new();
        let Some(pathway) = PathwayId::parse(&code) else {
            return Ok::<_, anyhow::Error>(found);
        };
        let xml = or_empty(kegg.kgml(&code).await, &code);
        found.extend(
            kgml::drug_entries(&xml)
                .iter()
                .filter_map(|drug| catalog.pair(drug, &pathway)),
        );
        Ok::<_, anyhow::Error>(found)
    })
    .await;
    merge_results(results)
}

/// Method 5: every drug of a disease inherits the pathways in that disease's
/// `PATHWAY` section.
pub async fn from_disease_bridge(
    kegg: &KeggClient,
    catalog: &Catalog,
    disease_drugs: &[(String, String)],
    workers: usize,
) -> RelationSet {
    let mut diseases: Vec<String> = disease_drugs.iter().map(|(d, _)| d.clone()).collect();
    diseases.sort();
    diseases.dedup();

    let disease_pathways: HashMap<String, Vec<PathwayId>> =
        fanout::run_each("disease entries", diseases, workers, |disease| async move {
            let entry = or_empty(kegg.entry(&disease).await, &disease);
            Ok::<_, anyhow::Error>(flatfile::pathway_codes(&entry))
        })
        .await
        .into_iter()
        .collect();

    let mut found = RelationSet::new();
    for (disease, drug) in disease_drugs {
        if let Some(pathways) = disease_pathways.get(disease) {
            found.extend(pathways.iter().filter_map(|pathway| catalog.pair(drug, pathway)));
        }
    }
    found
}

/// Totals printed after a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrugPathwayReport {
    pub drugs: usize,
    pub pathways: usize,
    pub found: usize,
    pub inserted: usize,
    pub failed_batches: usize,
    pub total_rows: i64,
    pub drugs_with_pathways: i64,
}

impl DrugPathwayReport {
    pub fn drugs_without_pathways(&self) -> i64 {
        self.drugs as i64 - self.drugs_with_pathways
    }
}

struct BaseData {
    drugs: Vec<String>,
    pathways: Vec<String>,
    disease_drugs: Vec<(String, String)>,
}

fn load_base_data(db_path: &Path, with_diseases: bool) -> Result<BaseData> {
    let store = Store::open(db_path).with_context(|| format!("open {db_path:?}"))?;
    let drugs = store.column_values("Drugs", "id").context("load Drugs")?;
    let pathways = store
        .column_values("Pathways", "pathway_id")
        .context("load Pathways")?;
    let disease_drugs = if with_diseases {
        store
            .column_pairs("DiseaseDrugs", "disease_id", "drug_id")
            .unwrap_or_else(|err| {
                warn!(%err, "DiseaseDrugs unavailable; skipping disease bridge");
                Vec::new()
            })
    } else {
        Vec::new()
    };
    Ok(BaseData {
        drugs,
        pathways,
        disease_drugs,
    })
}

fn save(db_path: PathBuf, found: RelationSet) -> Result<(usize, usize, i64, i64)> {
    let mut store = Store::open(&db_path).with_context(|| format!("open {db_path:?}"))?;
    store.ensure_schema()?;
    let pairs = found.into_vec();
    info!(rows = pairs.len(), "saving unique drug-pathway relationships");
    let report = store.insert_pairs(PairTable::DrugPathways, &pairs, SAVE_BATCH);
    let total = store.count(PairTable::DrugPathways.name())?;
    let with_pathways = store.distinct_count(PairTable::DrugPathways.name(), "drug_id")?;
    Ok((report.inserted, report.failed_batches, total, with_pathways))
}

/// Run the selected methods in order, then persist the merged pairs.
#[instrument(skip(kegg))]
pub async fn run(
    kegg: &KeggClient,
    db_path: &Path,
    methods: &[DrugPathwayMethod],
    workers: usize,
) -> Result<DrugPathwayReport> {
    let with_diseases = methods.contains(&DrugPathwayMethod::DiseaseBridge);
    let path = db_path.to_path_buf();
    let base = tokio::task::spawn_blocking(move || load_base_data(&path, with_diseases)).await??;

    let catalog = Catalog::new(base.drugs, base.pathways);
    info!(
        drugs = catalog.drug_count(),
        pathways = catalog.pathway_count(),
        workers,
        "loaded base data"
    );

    let mut all = RelationSet::new();
    for method in methods {
        let found = match method {
            DrugPathwayMethod::Entries => from_drug_entries(kegg, &catalog, workers).await,
            DrugPathwayMethod::Targets => from_drug_targets(kegg, &catalog, workers).await,
            DrugPathwayMethod::PathwayListings => {
                from_pathway_listings(kegg, &catalog, workers).await
            }
            DrugPathwayMethod::Kgml => from_kgml(kegg, &catalog, workers).await,
            DrugPathwayMethod::DiseaseBridge => {
                from_disease_bridge(kegg, &catalog, &base.disease_drugs, workers).await
            }
        };
        info!(?method, pairs = found.len(), "method finished");
        all.merge(found);
    }

    let found = all.len();
    let path = db_path.to_path_buf();
    let (inserted, failed_batches, total_rows, drugs_with_pathways) =
        tokio::task::spawn_blocking(move || save(path, all)).await??;

    let report = DrugPathwayReport {
        drugs: catalog.drug_count(),
        pathways: catalog.pathway_count(),
        found,
        inserted,
        failed_batches,
        total_rows,
        drugs_with_pathways,
    };
    info!(
        drugs = report.drugs,
        pathways = report.pathways,
        found = report.found,
        total_rows = report.total_rows,
        drugs_with_pathways = report.drugs_with_pathways,
        drugs_without_pathways = report.drugs_without_pathways(),
        "drug pathway report"
    );
    Ok(report)
}
