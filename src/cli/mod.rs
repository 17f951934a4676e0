//! Command-line interface wiring for kegg-harvest.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Settings;

pub mod disease_compounds;
pub mod disease_pathways;
pub mod drug_pathways;
pub mod structures;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Harvest KEGG disease, drug, and compound relationships",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::DiseasePathways(args) => disease_pathways::run(args, settings).await,
            Commands::DrugPathways(args) => drug_pathways::run(args, settings).await,
            Commands::Structures(args) => structures::run(args, settings).await,
            Commands::DiseaseCompounds(args) => disease_compounds::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve pathways for every human disease and write an SQL script.
    DiseasePathways(disease_pathways::Args),
    /// Link known drugs to known pathways.
    DrugPathways(drug_pathways::Args),
    /// Cache molfiles and store SMILES for drugs or compounds.
    Structures(structures::Args),
    /// Derive disease → compound pairs through shared pathways.
    DiseaseCompounds(disease_compounds::Args),
}

/// Sources consulted by `drug-pathways`, run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DrugPathwayMethod {
    /// `PATHWAY` section of each drug entry.
    Entries,
    /// Pathways of each drug's target genes.
    Targets,
    /// `DRUG` section of each pathway entry.
    PathwayListings,
    /// Drug nodes in each pathway's KGML map.
    Kgml,
    /// Pathways of the diseases each drug treats.
    DiseaseBridge,
}

impl DrugPathwayMethod {
    pub fn all() -> Vec<Self> {
        Self::value_variants().to_vec()
    }
}

/// Entity whose structures are harvested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StructureEntity {
    Drugs,
    Compounds,
}
