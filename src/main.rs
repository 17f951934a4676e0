//! Entry point wiring CLI dispatch to pipeline modules.

use anyhow::Result;
use kegg_harvest::{cli::Cli, config::Settings, logging};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load()?;
    logging::init_tracing(settings.log_file.as_deref())?;

    info!(?cli, "starting command");
    cli.dispatch(settings).await
}
