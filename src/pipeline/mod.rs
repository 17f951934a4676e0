//! Batch pipelines: identifier source → fan-out → aggregate → persist.

pub mod disease_compounds;
pub mod disease_pathways;
pub mod drug_pathways;
pub mod fanout;
pub mod structures;

use std::collections::BTreeSet;

/// Deduplicated relationship pairs collected from worker results.
///
/// Workers return their own pairs; the caller merges them here once the pool
/// has finished, so no set is shared between tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationSet {
    pairs: BTreeSet<(String, String)>,
}

impl RelationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, left: impl Into<String>, right: impl Into<String>) -> bool {
        self.pairs.insert((left.into(), right.into()))
    }

    pub fn merge(&mut self, other: RelationSet) {
        self.pairs.extend(other.pairs);
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, left: &str, right: &str) -> bool {
        self.pairs.contains(&(left.to_string(), right.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, String)> {
        self.pairs.iter()
    }

    /// Number of distinct left-hand identifiers.
    pub fn left_count(&self) -> usize {
        self.pairs
            .iter()
            .map(|(left, _)| left.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn into_vec(self) -> Vec<(String, String)> {
        self.pairs.into_iter().collect()
    }
}

impl Extend<(String, String)> for RelationSet {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.pairs.extend(iter);
    }
}

impl FromIterator<(String, String)> for RelationSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}
