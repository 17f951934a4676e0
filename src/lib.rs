//! KEGG relationship and structure harvester.
//!
//! Each sub-command lists identifiers from KEGG or the local database, fans
//! the per-item lookups out over a bounded worker pool, merges the results,
//! and persists them to SQLite, an SQL script, or CSV.

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod kegg;
pub mod logging;
pub mod pipeline;
pub mod pubchem;
pub mod store;
