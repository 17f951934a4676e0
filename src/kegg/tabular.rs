//! Tab-delimited `/list` and `/link` bodies.

/// One `/list/{db}` row: entry code and free-text description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub id: String,
    pub description: String,
}

/// One `/link/{target}/{source}` row, in response column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPair {
    pub source: String,
    pub target: String,
}

fn two_columns(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split('\t');
    let first = parts.next()?.trim();
    let second = parts.next()?.trim();
    if parts.next().is_some() || first.is_empty() || second.is_empty() {
        return None;
    }
    Some((first, second))
}

/// Parse a `/list` body; lines without exactly two fields are skipped.
pub fn parse_list(body: &str) -> Vec<ListEntry> {
    body.lines()
        .filter_map(two_columns)
        .map(|(id, description)| ListEntry {
            id: id.to_string(),
            description: description.to_string(),
        })
        .collect()
}

/// Parse a `/link` body; lines without exactly two fields are skipped.
pub fn parse_links(body: &str) -> Vec<LinkPair> {
    body.lines()
        .filter_map(two_columns)
        .map(|(source, target)| LinkPair {
            source: source.to_string(),
            target: target.to_string(),
        })
        .collect()
}
