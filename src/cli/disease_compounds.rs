//! CLI entry-point for disease → compound derivation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{config::Settings, kegg::KeggClient, pipeline::disease_compounds};

/// Args for the `disease-compounds` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Override the database path.
    #[arg(long)]
    pub db: Option<PathBuf>,
    /// Skip the CSV export after the run.
    #[arg(long)]
    pub no_export: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let db = args.db.unwrap_or_else(|| settings.db_path.clone());
    let export = (!args.no_export).then(|| settings.join_data(disease_compounds::EXPORT_NAME));
    let kegg = KeggClient::from_settings(&settings)?;
    disease_compounds::run(&kegg, &db, export).await?;
    Ok(())
}
