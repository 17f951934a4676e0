//! CLI entry-point for the disease → pathway script.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    kegg::KeggClient,
    pipeline::disease_pathways::{self, DiseasePathwayOptions},
    store::Store,
};

/// Args for the `disease-pathways` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Number of worker tasks; diseases are split into this many chunks.
    #[arg(long, default_value_t = 4)]
    pub workers: usize,
    /// Folder receiving `insert_disease_pathways.sql`.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Execute the generated script against the database afterwards.
    #[arg(long)]
    pub apply: bool,
    /// Database used with `--apply`.
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let output_dir = args.output_dir.unwrap_or_else(|| settings.output_dir.clone());
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("create output dir {output_dir:?}"))?;

    let kegg = KeggClient::from_settings(&settings)?;
    let opts = DiseasePathwayOptions {
        workers: args.workers.max(1),
        item_pause: settings.item_pause(),
        ..DiseasePathwayOptions::default()
    };
    let outcome = disease_pathways::run(&kegg, &opts, &output_dir).await?;

    let Some(script) = outcome.script else {
        return Ok(());
    };
    info!(script = %script.display(), diseases = outcome.diseases, "script written");

    if args.apply {
        let db = args.db.unwrap_or_else(|| settings.db_path.clone());
        tokio::task::spawn_blocking(move || -> Result<()> {
            let store = Store::open(&db).with_context(|| format!("open {db:?}"))?;
            store.ensure_schema()?;
            store
                .apply_script(&script)
                .with_context(|| format!("apply {script:?}"))?;
            Ok(())
        })
        .await??;
    }
    Ok(())
}
