//! CLI entry-point for structure harvesting.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use super::StructureEntity;
use crate::{
    config::Settings,
    kegg::KeggClient,
    pipeline::structures::{self, StructureOptions},
    pubchem::PubChemClient,
};

/// Args for the `structures` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Which KEGG list to walk.
    #[arg(long, value_enum, default_value_t = StructureEntity::Drugs)]
    pub entity: StructureEntity,
    /// First list index to process.
    #[arg(long, default_value_t = 0)]
    pub start: usize,
    /// List index to stop before.
    #[arg(long, default_value_t = 100_000)]
    pub end: usize,
    /// Items in flight at once.
    #[arg(long, default_value_t = 5)]
    pub workers: usize,
    /// Override the database path.
    #[arg(long)]
    pub db: Option<PathBuf>,
    /// Skip the CSV export after the run.
    #[arg(long)]
    pub no_export: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, mut settings: Settings) -> Result<()> {
    if let Some(db) = args.db {
        settings.db_path = db;
    }
    let kegg = KeggClient::from_settings(&settings)?;
    let pubchem = PubChemClient::from_settings(&settings)?;
    let opts = StructureOptions {
        entity: args.entity,
        start: args.start,
        end: args.end,
        workers: args.workers.max(1),
        export: !args.no_export,
    };
    structures::run(&kegg, &pubchem, &settings, &opts).await?;
    Ok(())
}
