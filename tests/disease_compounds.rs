mod common;

use kegg_harvest::{
    kegg::tabular::LinkPair,
    pipeline::disease_compounds::{self, disease_compound_pairs},
    store::{PairTable, Store},
};
use tempfile::tempdir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const LINKS: &str = "\
path:map00010\tcpd:C00022
path:map00010\tcpd:C00031
path:hsa04910\tcpd:C00031
path:map01100\tcpd:C00001
malformed line
";

fn disease_rows() -> Vec<(String, String)> {
    [
        ("H00001", "path:hsa00010"),
        ("H00002", "path:hsa04910"),
        ("H00003", "path:hsa00010"),
    ]
    .iter()
    .map(|(d, p)| (d.to_string(), p.to_string()))
    .collect()
}

fn link(source: &str, target: &str) -> LinkPair {
    LinkPair {
        source: source.to_string(),
        target: target.to_string(),
    }
}

#[test]
fn reference_pathways_reach_human_diseases() {
    let pairs = disease_compound_pairs(
        &disease_rows(),
        &[
            link("path:map00010", "cpd:C00022"),
            link("path:hsa04910", "cpd:C00031"),
            link("path:map99999", "cpd:C00001"),
            link("path:map00010", "gl:G00001"),
        ],
    );
    assert_eq!(pairs.len(), 2);
    assert!(pairs.contains("H00001", "C00022"));
    assert!(pairs.contains("H00003", "C00022"));
}

#[test]
fn organism_specific_links_are_not_joined() {
    let pairs = disease_compound_pairs(&disease_rows(), &[link("path:hsa04910", "cpd:C00031")]);
    assert!(pairs.is_empty());
    assert!(!pairs.contains("H00002", "C00031"));
}

#[tokio::test]
async fn run_saves_and_exports_pairs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/link/compound/pathway"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LINKS))
        .mount(&server)
        .await;
    let kegg = common::kegg(&server.uri());

    let dir = tempdir().unwrap();
    let db = dir.path().join("kegg.db");
    let mut store = Store::open(&db).unwrap();
    store.ensure_schema().unwrap();
    store.insert_pairs(PairTable::DiseasePathways, &disease_rows(), 100);
    drop(store);

    let export = dir.path().join("data_files").join("disease_compounds.csv");
    let report = disease_compounds::run(&kegg, &db, Some(export.clone()))
        .await
        .unwrap();
    assert_eq!(report.disease_pathways, 3);
    assert_eq!(report.links, 4);
    assert_eq!(report.pairs, 4);
    assert_eq!(report.saved.inserted, 4);
    assert_eq!(report.exported, Some(4));
    assert!(export.exists());

    let again = disease_compounds::run(&kegg, &db, None).await.unwrap();
    assert_eq!(again.saved.inserted, 0);

    let store = Store::open(&db).unwrap();
    assert_eq!(store.count("DiseaseCompounds").unwrap(), 4);
    let journal: String = store
        .connection()
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap();
    assert_eq!(journal.to_lowercase(), "wal");
}

#[tokio::test]
async fn unavailable_links_save_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/link/compound/pathway"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let kegg = common::kegg(&server.uri());
    let dir = tempdir().unwrap();
    let db = dir.path().join("kegg.db");

    let report = disease_compounds::run(&kegg, &db, None).await.unwrap();
    assert_eq!(report.pairs, 0);
    assert_eq!(report.saved.inserted, 0);
}
