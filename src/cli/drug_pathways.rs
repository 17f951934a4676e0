//! CLI entry-point for drug → pathway harvesting.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use super::DrugPathwayMethod;
use crate::{config::Settings, kegg::KeggClient, pipeline::drug_pathways};

/// Args for the `drug-pathways` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Comma separated methods to run; all of them by default.
    #[arg(long, value_enum, value_delimiter = ',')]
    pub methods: Vec<DrugPathwayMethod>,
    /// Requests in flight at once.
    #[arg(long, default_value_t = 16)]
    pub workers: usize,
    /// Database holding `Drugs`, `Pathways`, and `DiseaseDrugs`.
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let methods = if args.methods.is_empty() {
        DrugPathwayMethod::all()
    } else {
        args.methods
    };
    let db = args.db.unwrap_or_else(|| settings.db_path.clone());
    let kegg = KeggClient::from_settings(&settings)?;
    drug_pathways::run(&kegg, &db, &methods, args.workers.max(1)).await?;
    Ok(())
}
