//! Section scanning for KEGG flat-file entries (`/get/{id}` responses).
//!
//! Entries are column-aligned text: a section starts with its keyword in
//! column 0, continuation lines are indented. Code extraction is regex based
//! and line-local, so a malformed line only loses its own codes.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

use super::ids::PathwayId;

static HSA_PATHWAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bhsa\d{5}\b").expect("valid regex"));
static HSA_GENE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bhsa:(\d+)").expect("valid regex"));
static DRUG_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bD\d{5}\b").expect("valid regex"));
static PUBCHEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"PubChem:\s*(\d+)").expect("valid regex"));

/// Section keywords the pipelines read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Pathway,
    Target,
    Drug,
    Dblinks,
}

impl Section {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Pathway => "PATHWAY",
            Self::Target => "TARGET",
            Self::Drug => "DRUG",
            Self::Dblinks => "DBLINKS",
        }
    }

    /// True when `line` is this section's header. The keyword must be a whole
    /// token, so `PATHWAY_MAP` does not open `PATHWAY`.
    fn opens(self, line: &str) -> bool {
        line.strip_prefix(self.keyword())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    }
}

/// Lines belonging to `section`: the header line plus every following line
/// indented by at least two spaces. Any other line closes the section.
pub fn section_lines(entry: &str, section: Section) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut open = false;
    for line in entry.lines() {
        if section.opens(line) {
            open = true;
            lines.push(line);
        } else if open && line.starts_with("  ") {
            lines.push(line);
        } else {
            open = false;
        }
    }
    lines
}

fn scan<F>(entry: &str, section: Section, mut extract: F) -> Vec<String>
where
    F: FnMut(&str, &mut IndexSet<String>),
{
    let mut found = IndexSet::new();
    for line in section_lines(entry, section) {
        extract(line, &mut found);
    }
    found.into_iter().collect()
}

/// Human pathway codes (`hsa#####`) from the `PATHWAY` section.
pub fn pathway_codes(entry: &str) -> Vec<PathwayId> {
    scan(entry, Section::Pathway, |line, found| {
        found.extend(HSA_PATHWAY.find_iter(line).map(|m| m.as_str().to_string()));
    })
    .iter()
    .filter_map(|code| PathwayId::parse(code))
    .collect()
}

/// Target genes (`hsa:<entrez>`) from the `TARGET` section. KEGG writes these
/// as `[HSA:1636]`; the result is lower-cased to match `/get/` identifiers.
pub fn target_genes(entry: &str) -> Vec<String> {
    scan(entry, Section::Target, |line, found| {
        found.extend(
            HSA_GENE
                .captures_iter(line)
                .map(|caps| format!("hsa:{}", &caps[1])),
        );
    })
}

/// Drug codes (`D#####`) from the `DRUG` section of a pathway entry.
pub fn drug_codes(entry: &str) -> Vec<String> {
    scan(entry, Section::Drug, |line, found| {
        found.extend(DRUG_CODE.find_iter(line).map(|m| m.as_str().to_string()));
    })
}

/// PubChem identifier listed under `DBLINKS`, if any.
pub fn pubchem_id(entry: &str) -> Option<String> {
    section_lines(entry, Section::Dblinks)
        .into_iter()
        .find_map(|line| PUBCHEM.captures(line).map(|caps| caps[1].to_string()))
}
