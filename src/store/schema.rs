//! DDL for the tables the harvesters maintain.
//!
//! `Drugs`, `Pathways`, and `DiseaseDrugs` are owned by the application
//! database and only read here.

pub const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS DiseasePathways (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        disease_id  TEXT NOT NULL,
        pathway_id  TEXT NOT NULL,
        UNIQUE(disease_id, pathway_id)
    );

    CREATE TABLE IF NOT EXISTS DrugPathways (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        drug_id     TEXT NOT NULL,
        pathway_id  TEXT NOT NULL,
        FOREIGN KEY (drug_id) REFERENCES Drugs(id)
            ON DELETE CASCADE
            ON UPDATE CASCADE,
        FOREIGN KEY (pathway_id) REFERENCES Pathways(pathway_id)
            ON DELETE CASCADE
            ON UPDATE CASCADE,
        UNIQUE(drug_id, pathway_id)
    );

    CREATE TABLE IF NOT EXISTS DiseaseCompounds (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        disease_id  TEXT NOT NULL,
        compound_id TEXT NOT NULL,
        UNIQUE(disease_id, compound_id)
    );

    CREATE INDEX IF NOT EXISTS idx_disease_compound_disease ON DiseaseCompounds(disease_id);
    CREATE INDEX IF NOT EXISTS idx_disease_compound_compound ON DiseaseCompounds(compound_id);

    CREATE TABLE IF NOT EXISTS DrugStructures (
        drug_id TEXT PRIMARY KEY,
        smiles  TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS CompoundStructures (
        compound_id TEXT PRIMARY KEY,
        smiles      TEXT NOT NULL
    );
";

/// Relationship tables keyed by a composite unique pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairTable {
    DiseasePathways,
    DrugPathways,
    DiseaseCompounds,
}

impl PairTable {
    pub fn name(self) -> &'static str {
        match self {
            Self::DiseasePathways => "DiseasePathways",
            Self::DrugPathways => "DrugPathways",
            Self::DiseaseCompounds => "DiseaseCompounds",
        }
    }

    pub fn columns(self) -> (&'static str, &'static str) {
        match self {
            Self::DiseasePathways => ("disease_id", "pathway_id"),
            Self::DrugPathways => ("drug_id", "pathway_id"),
            Self::DiseaseCompounds => ("disease_id", "compound_id"),
        }
    }
}

/// Structure tables, one SMILES per entry, replaced on conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureTable {
    Drugs,
    Compounds,
}

impl StructureTable {
    pub fn name(self) -> &'static str {
        match self {
            Self::Drugs => "DrugStructures",
            Self::Compounds => "CompoundStructures",
        }
    }

    pub fn key_column(self) -> &'static str {
        match self {
            Self::Drugs => "drug_id",
            Self::Compounds => "compound_id",
        }
    }
}
