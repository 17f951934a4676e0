#![allow(dead_code)]

use std::time::Duration;

use kegg_harvest::{
    http::{retry::RetryPolicy, Fetcher},
    kegg::KeggClient,
    pubchem::PubChemClient,
};
use rusqlite::Connection;
use std::path::Path;

/// Fetcher without pauses or rate limiting; requests are tried twice.
pub fn fetcher() -> Fetcher {
    Fetcher::new(Duration::from_secs(5), RetryPolicy::immediate(2), None)
        .expect("http client builds")
}

pub fn kegg(base: &str) -> KeggClient {
    KeggClient::new(fetcher(), base)
}

pub fn pubchem(base: &str) -> PubChemClient {
    PubChemClient::new(fetcher(), base)
}

/// Create the application-owned tables the harvesters read from.
pub fn seed_app_tables(db: &Path, drugs: &[&str], pathways: &[&str], disease_drugs: &[(&str, &str)]) {
    let conn = Connection::open(db).expect("open db");
    conn.execute_batch(
        "CREATE TABLE Drugs (id TEXT PRIMARY KEY);
         CREATE TABLE Pathways (pathway_id TEXT PRIMARY KEY);
         CREATE TABLE DiseaseDrugs (disease_id TEXT, drug_id TEXT);",
    )
    .expect("create app tables");
    for drug in drugs {
        conn.execute("INSERT INTO Drugs (id) VALUES (?1)", [drug]).expect("insert drug");
    }
    for pathway in pathways {
        conn.execute("INSERT INTO Pathways (pathway_id) VALUES (?1)", [pathway])
            .expect("insert pathway");
    }
    for (disease, drug) in disease_drugs {
        conn.execute(
            "INSERT INTO DiseaseDrugs (disease_id, drug_id) VALUES (?1, ?2)",
            [disease, drug],
        )
        .expect("insert disease drug");
    }
}

pub const MOLFILE: &str = "\
Aspirin
  KEGG      

 13 13  0  0  0  0  0  0  0  0999 V2000
    1.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
M  END
";
