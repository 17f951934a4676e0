mod common;

use std::time::Duration;

use kegg_harvest::{
    pipeline::disease_pathways::{self, DiseasePathwayOptions},
    store::{PairTable, Store},
};
use tempfile::tempdir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const H00001_ENTRY: &str = "\
ENTRY       H00001                      Disease
NAME        Example disease
PATHWAY     hsa04930  Type II diabetes mellitus
///
";

async fn mount_text(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn kegg_fixture() -> MockServer {
    let server = MockServer::start().await;
    mount_text(
        &server,
        "/list/disease",
        "ds:H00001\tExample disease\nds:H00002\tGene driven disease\nds:H00003\tOrphan disease\n",
    )
    .await;
    mount_text(&server, "/link/pathway/H00001", "ds:H00001\tpath:hsa04910\n").await;
    mount_text(&server, "/get/H00001", H00001_ENTRY).await;
    mount_text(&server, "/link/hsa/H00001", "").await;
    mount_text(&server, "/link/hsa/H00002", "ds:H00002\thsa:3643\n").await;
    mount_text(&server, "/link/pathway/hsa:3643", "hsa:3643\tpath:hsa04010\n").await;
    server
}

fn quick_options(workers: usize) -> DiseasePathwayOptions {
    DiseasePathwayOptions {
        workers,
        item_pause: Duration::ZERO,
        gene_pause: Duration::ZERO,
        gene_pause_every: 5,
    }
}

#[tokio::test]
async fn pathways_are_unioned_per_disease() {
    let server = kegg_fixture().await;
    let kegg = common::kegg(&server.uri());

    let found =
        disease_pathways::pathways_for_disease(&kegg, "H00001", &quick_options(1)).await;
    let codes: Vec<&str> = found.iter().map(|id| id.as_str()).collect();
    assert_eq!(codes, vec!["hsa04910", "hsa04930"]);

    let via_genes =
        disease_pathways::pathways_for_disease(&kegg, "H00002", &quick_options(1)).await;
    let codes: Vec<&str> = via_genes.iter().map(|id| id.as_str()).collect();
    assert_eq!(codes, vec!["hsa04010"]);
}

#[tokio::test]
async fn script_lists_every_pair_and_applies() {
    let server = kegg_fixture().await;
    let kegg = common::kegg(&server.uri());
    let dir = tempdir().unwrap();

    let outcome = disease_pathways::run(&kegg, &quick_options(2), dir.path())
        .await
        .unwrap();
    assert_eq!(outcome.diseases, 3);
    assert_eq!(outcome.summary.inserts, 3);
    assert_eq!(outcome.summary.with_pathways, 2);
    assert_eq!(outcome.summary.without_pathways, 1);

    let script = outcome.script.expect("script written");
    let sql = std::fs::read_to_string(&script).unwrap();
    assert!(sql.contains("BEGIN TRANSACTION;"));
    assert!(sql.contains("DELETE FROM DiseasePathways;"));
    assert!(sql.contains(
        "INSERT INTO DiseasePathways (disease_id, pathway_id) VALUES ('H00001', 'path:hsa04910');"
    ));
    assert!(sql.contains(
        "INSERT INTO DiseasePathways (disease_id, pathway_id) VALUES ('H00001', 'path:hsa04930');"
    ));
    assert!(!sql.contains("H00003"));
    assert!(sql.trim_end().ends_with("COMMIT;"));

    let store = Store::open(dir.path().join("kegg.db")).unwrap();
    store.ensure_schema().unwrap();
    store.apply_script(&script).unwrap();
    store.apply_script(&script).unwrap();
    assert_eq!(store.count(PairTable::DiseasePathways.name()).unwrap(), 3);
}

#[tokio::test]
async fn single_disease_yields_two_inserts() {
    let server = MockServer::start().await;
    mount_text(&server, "/list/disease", "ds:H00001\tExample disease\n").await;
    mount_text(&server, "/link/pathway/H00001", "H00001\tpath:hsa04910\n").await;
    mount_text(&server, "/get/H00001", H00001_ENTRY).await;
    let kegg = common::kegg(&server.uri());
    let dir = tempdir().unwrap();

    let outcome = disease_pathways::run(&kegg, &quick_options(4), dir.path())
        .await
        .unwrap();
    let sql = std::fs::read_to_string(outcome.script.expect("script written")).unwrap();
    let inserts: Vec<&str> = sql.lines().filter(|l| l.starts_with("INSERT")).collect();
    assert_eq!(inserts.len(), 2);
    assert!(inserts[0].contains("'path:hsa04910'"));
    assert!(inserts[1].contains("'path:hsa04930'"));
}

#[tokio::test]
async fn empty_disease_list_writes_no_script() {
    let server = MockServer::start().await;
    mount_text(&server, "/list/disease", "").await;
    let kegg = common::kegg(&server.uri());
    let dir = tempdir().unwrap();

    let outcome = disease_pathways::run(&kegg, &quick_options(4), dir.path())
        .await
        .unwrap();
    assert_eq!(outcome.diseases, 0);
    assert!(outcome.script.is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn unreachable_disease_list_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list/disease"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let kegg = common::kegg(&server.uri());
    let dir = tempdir().unwrap();

    assert!(disease_pathways::run(&kegg, &quick_options(1), dir.path())
        .await
        .is_err());
}
