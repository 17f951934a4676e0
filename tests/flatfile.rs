use kegg_harvest::kegg::flatfile::{self, Section};

const DISEASE_ENTRY: &str = "\
ENTRY       H00001                      Disease
NAME        B-lymphoblastic leukemia/lymphoma
PATHWAY     hsa05202  Transcriptional misregulation in cancer
            hsa05221  Acute myeloid leukemia
PATHWAY_MAP hsa99999  Not a pathway section
GENE        (t(12;21)) ETV6-RUNX1 [HSA:2120 861] [KO:K03211 K08367]
///
";

const DRUG_ENTRY: &str = "\
ENTRY       D00109                      Drug
NAME        Aspirin (JP18/USP)
TARGET      PTGS1 [HSA:5742] [KO:K00509]
            PTGS2 [hsa:5743] [KO:K11987]
PATHWAY     hsa00590  Arachidonic acid metabolism
              PTGS1 [HSA:5742] [KO:K00509]
DBLINKS     CAS: 50-78-2
            PubChem: 7847131
            ChEBI: 15365
///
";

const PATHWAY_ENTRY: &str = "\
ENTRY       hsa04930                    Pathway
NAME        Type II diabetes mellitus - Homo sapiens (human)
DRUG        D00109  Aspirin
            D00217  Acetaminophen (JP18/USP/INN)
            D00109  Aspirin
COMPOUND    C00031  D-Glucose
///
";

#[test]
fn pathway_section_spans_continuation_lines() {
    let codes: Vec<String> = flatfile::pathway_codes(DISEASE_ENTRY)
        .iter()
        .map(|id| id.as_str().to_string())
        .collect();
    assert_eq!(codes, vec!["hsa05202", "hsa05221"]);
}

#[test]
fn similarly_named_keywords_do_not_open_a_section() {
    let lines = flatfile::section_lines(DISEASE_ENTRY, Section::Pathway);
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|line| !line.contains("hsa99999")));
}

#[test]
fn target_genes_accept_upper_case_and_normalise() {
    assert_eq!(
        flatfile::target_genes(DRUG_ENTRY),
        vec!["hsa:5742".to_string(), "hsa:5743".to_string()]
    );
}

#[test]
fn gene_tags_outside_target_are_ignored() {
    let codes = flatfile::pathway_codes(DRUG_ENTRY);
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].as_str(), "hsa00590");
    assert!(flatfile::target_genes(DISEASE_ENTRY).is_empty());
}

#[test]
fn drug_codes_are_deduplicated_in_order() {
    assert_eq!(
        flatfile::drug_codes(PATHWAY_ENTRY),
        vec!["D00109".to_string(), "D00217".to_string()]
    );
}

#[test]
fn pubchem_id_comes_from_dblinks() {
    assert_eq!(flatfile::pubchem_id(DRUG_ENTRY).as_deref(), Some("7847131"));
    assert_eq!(flatfile::pubchem_id(PATHWAY_ENTRY), None);
}

#[test]
fn missing_sections_and_empty_entries_yield_nothing() {
    assert!(flatfile::drug_codes(DISEASE_ENTRY).is_empty());
    assert!(flatfile::pathway_codes("").is_empty());
    assert!(flatfile::section_lines("", Section::Dblinks).is_empty());
}

#[test]
fn section_stops_at_first_unindented_line() {
    let entry = "\
ENTRY       H00409                      Disease
PATHWAY     hsa04930  Type II diabetes mellitus
            hsa04910  Insulin signaling pathway
            hsa04940  Type I diabetes mellitus
            hsa04950  Maturity onset diabetes of the young
GENE        INS [HSA:3630]
            hsa05010  Indented but after the section closed
///
";
    let codes: Vec<String> = flatfile::pathway_codes(entry)
        .iter()
        .map(|id| id.as_str().to_string())
        .collect();
    assert_eq!(codes, vec!["hsa04930", "hsa04910", "hsa04940", "hsa04950"]);
}
