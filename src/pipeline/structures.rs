//! Drug / compound structure harvesting: molfile cache plus SMILES rows.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::{
    cli::StructureEntity,
    config::Settings,
    http::or_empty,
    kegg::{flatfile, ids::EntityKind, KeggClient},
    pubchem::PubChemClient,
    store::{Store, StructureTable},
};

use super::fanout;

impl StructureEntity {
    pub fn kind(self) -> EntityKind {
        match self {
            Self::Drugs => EntityKind::Drug,
            Self::Compounds => EntityKind::Compound,
        }
    }

    pub fn table(self) -> StructureTable {
        match self {
            Self::Drugs => StructureTable::Drugs,
            Self::Compounds => StructureTable::Compounds,
        }
    }

    /// CSV export file name under the data directory.
    pub fn export_name(self) -> &'static str {
        match self {
            Self::Drugs => "drugs.csv",
            Self::Compounds => "compounds.csv",
        }
    }
}

/// True when `text` carries an MDL counts line (`V2000` or `V3000`).
pub fn looks_like_molfile(text: &str) -> bool {
    text.lines()
        .nth(3)
        .is_some_and(|counts| counts.contains("V2000") || counts.contains("V3000"))
}

/// On-disk molfile cache keyed by entry code: `{dir}/{id}.mol`.
#[derive(Debug, Clone)]
pub struct MolCache {
    dir: PathBuf,
}

impl MolCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.mol"))
    }

    pub async fn contains(&self, id: &str) -> bool {
        tokio::fs::try_exists(self.path(id)).await.unwrap_or(false)
    }

    pub async fn store(&self, id: &str, text: &str) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path(id);
        tokio::fs::write(&path, text).await?;
        Ok(path)
    }
}

/// Per-item result of the structure worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureOutcome {
    pub molfile: bool,
    pub smiles: Option<String>,
}

/// KEGG entry fetched at most once per item, only when PubChem is needed.
struct EntryCache<'a> {
    kegg: &'a KeggClient,
    id: &'a str,
    entry: Option<String>,
}

impl<'a> EntryCache<'a> {
    fn new(kegg: &'a KeggClient, id: &'a str) -> Self {
        Self {
            kegg,
            id,
            entry: None,
        }
    }

    async fn pubchem_id(&mut self) -> Option<String> {
        if self.entry.is_none() {
            self.entry = Some(or_empty(self.kegg.entry(self.id).await, self.id));
        }
        self.entry.as_deref().and_then(flatfile::pubchem_id)
    }
}

/// Make sure `id` has a cached molfile (KEGG first, PubChem SDF second) and
/// look up its SMILES on PubChem.
pub async fn resolve_structure(
    kegg: &KeggClient,
    pubchem: &PubChemClient,
    cache: &MolCache,
    id: &str,
) -> Result<StructureOutcome> {
    let mut entry = EntryCache::new(kegg, id);

    let molfile = if cache.contains(id).await {
        true
    } else {
        let from_kegg = or_empty(kegg.molfile(id).await, id);
        let text = if looks_like_molfile(&from_kegg) {
            Some(from_kegg)
        } else if let Some(cid) = entry.pubchem_id().await {
            let sdf = or_empty(pubchem.sdf(&cid).await, &cid);
            looks_like_molfile(&sdf).then_some(sdf)
        } else {
            None
        };
        match text {
            Some(text) => {
                cache
                    .store(id, &text)
                    .await
                    .with_context(|| format!("cache molfile for {id}"))?;
                true
            }
            None => {
                warn!(%id, "no molfile available");
                false
            }
        }
    };

    let smiles = match entry.pubchem_id().await {
        Some(cid) => or_empty(pubchem.canonical_smiles(&cid).await, &cid),
        None => None,
    };

    Ok(StructureOutcome { molfile, smiles })
}

fn persist(db_path: &Path, table: StructureTable, id: &str, smiles: &str) -> Result<()> {
    let store = Store::open(db_path)?;
    store.upsert_structure(table, id, smiles)?;
    Ok(())
}

/// Totals for one structures run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureReport {
    pub items: usize,
    pub molfiles: usize,
    pub stored: usize,
    pub exported: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct StructureOptions {
    pub entity: StructureEntity,
    /// First list index to process.
    pub start: usize,
    /// List index to stop before; clamped to the list length.
    pub end: usize,
    pub workers: usize,
    /// Dump the structure table to CSV after the run.
    pub export: bool,
}

impl Default for StructureOptions {
    fn default() -> Self {
        Self {
            entity: StructureEntity::Drugs,
            start: 0,
            end: 100_000,
            workers: 5,
            export: true,
        }
    }
}

/// Harvest structures for the `[start, end)` slice of the KEGG list.
#[instrument(skip(kegg, pubchem, settings))]
pub async fn run(
    kegg: &KeggClient,
    pubchem: &PubChemClient,
    settings: &Settings,
    opts: &StructureOptions,
) -> Result<StructureReport> {
    let StructureOptions {
        entity,
        start,
        end,
        workers,
        export,
    } = *opts;
    let db_path = settings.db_path.clone();
    prepare_database(db_path.clone()).await?;

    let ids = kegg
        .list_ids(entity.kind())
        .await
        .with_context(|| format!("list {}", entity.kind().database()))?;
    let end = end.min(ids.len());
    let start = start.min(end);
    let items = ids[start..end].to_vec();
    info!(?entity, items = items.len(), workers, "starting structures");

    let cache = MolCache::new(&settings.mol_dir);
    let table = entity.table();
    let results = fanout::run_each("structures", items, workers, |id| {
        let cache = &cache;
        let db_path = db_path.clone();
        async move {
            let outcome = resolve_structure(kegg, pubchem, cache, &id).await?;
            if let Some(smiles) = outcome.smiles.clone() {
                let id = id.clone();
                tokio::task::spawn_blocking(move || persist(&db_path, table, &id, &smiles))
                    .await??;
            }
            Ok::<_, anyhow::Error>(outcome)
        }
    })
    .await;

    let mut report = StructureReport {
        items: results.len(),
        ..StructureReport::default()
    };
    for (_, outcome) in &results {
        report.molfiles += usize::from(outcome.molfile);
        report.stored += usize::from(outcome.smiles.is_some());
    }

    if export {
        let dest = settings.join_data(entity.export_name());
        let rows = tokio::task::spawn_blocking(move || {
            Store::open(&db_path)?.export_csv(table.name(), &dest)
        })
        .await??;
        report.exported = Some(rows);
    }

    info!(
        items = report.items,
        molfiles = report.molfiles,
        stored = report.stored,
        "structures finished"
    );
    Ok(report)
}

/// Apply bulk-load pragmas and ensure the schema once before workers start.
pub async fn prepare_database(db_path: PathBuf) -> Result<()> {
    tokio::task::spawn_blocking(move || -> Result<()> {
        let store = Store::open(&db_path).with_context(|| format!("open {db_path:?}"))?;
        if let Err(err) = store.tune_for_bulk_load() {
            warn!(%err, "bulk load pragmas not applied");
        }
        store.ensure_schema()?;
        Ok(())
    })
    .await?
}
