//! SQL script sink for disease → pathway relationships.

use std::{
    collections::BTreeSet,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use chrono::Utc;
use indexmap::IndexMap;
use tracing::info;

use crate::{error::StoreResult, kegg::ids::PathwayId};

/// File name written into the output directory.
pub const DISEASE_PATHWAYS_SCRIPT: &str = "insert_disease_pathways.sql";

/// Counts reported after writing the script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub inserts: usize,
    pub with_pathways: usize,
    pub without_pathways: usize,
}

/// Quote `value` as an SQL string literal.
pub fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Write a delete-then-repopulate script for `DiseasePathways`, wrapped in a
/// single transaction. Pathways are stored `path:`-qualified.
pub fn write_disease_pathways<W: Write>(
    mut out: W,
    results: &IndexMap<String, BTreeSet<PathwayId>>,
) -> io::Result<ScriptSummary> {
    let mut summary = ScriptSummary::default();

    writeln!(out, "-- Generated by kegg-harvest at {}", Utc::now().to_rfc3339())?;
    writeln!(out, "BEGIN TRANSACTION;")?;
    writeln!(out)?;
    writeln!(out, "DELETE FROM DiseasePathways;")?;
    writeln!(out, "-- Inserting disease-pathway relationships")?;
    writeln!(out)?;

    for (disease, pathways) in results {
        if pathways.is_empty() {
            summary.without_pathways += 1;
            continue;
        }
        summary.with_pathways += 1;
        for pathway in pathways {
            writeln!(
                out,
                "INSERT INTO DiseasePathways (disease_id, pathway_id) VALUES ({}, {});",
                sql_literal(disease),
                sql_literal(&pathway.qualified())
            )?;
            summary.inserts += 1;
        }
    }

    writeln!(out)?;
    writeln!(out, "COMMIT;")?;
    out.flush()?;
    Ok(summary)
}

/// [`write_disease_pathways`] into `path`, creating parent folders.
pub fn write_disease_pathways_file(
    path: &Path,
    results: &IndexMap<String, BTreeSet<PathwayId>>,
) -> StoreResult<ScriptSummary> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let summary = write_disease_pathways(BufWriter::new(file), results)?;
    info!(path = %path.display(), inserts = summary.inserts, "wrote sql script");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_escape_quotes() {
        assert_eq!(sql_literal("H00001"), "'H00001'");
        assert_eq!(sql_literal("O'Brien"), "'O''Brien'");
    }

    #[test]
    fn script_counts_diseases_with_and_without_pathways() {
        let mut results = IndexMap::new();
        results.insert(
            "H00001".to_string(),
            ["hsa04910", "hsa04930"]
                .iter()
                .filter_map(|c| PathwayId::parse(c))
                .collect(),
        );
        results.insert("H00002".to_string(), BTreeSet::new());

        let mut buf = Vec::new();
        let summary = write_disease_pathways(&mut buf, &results).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            summary,
            ScriptSummary {
                inserts: 2,
                with_pathways: 1,
                without_pathways: 1
            }
        );
        assert!(text.contains("BEGIN TRANSACTION;"));
        assert!(text.contains("DELETE FROM DiseasePathways;"));
        assert!(text.contains(
            "INSERT INTO DiseasePathways (disease_id, pathway_id) VALUES ('H00001', 'path:hsa04930');"
        ));
        assert!(text.trim_end().ends_with("COMMIT;"));
    }
}
