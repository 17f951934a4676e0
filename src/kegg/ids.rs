//! KEGG identifier shapes and normalisation.

use std::fmt;

/// Organism code used when turning reference (`map`) pathways into
/// organism-specific ones. Every pipeline assumes a human-only context.
pub const ORGANISM: &str = "hsa";

const PATH_PREFIX: &str = "path:";

/// Pathway code without the `path:` qualifier, e.g. `hsa04910` or `map00010`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathwayId(String);

impl PathwayId {
    /// Parse a bare or `path:`-qualified code. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim();
        let code = code.strip_prefix(PATH_PREFIX).unwrap_or(code);
        if code.is_empty() || code.contains(char::is_whitespace) {
            return None;
        }
        Some(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `path:`-qualified spelling stored in the database.
    pub fn qualified(&self) -> String {
        format!("{PATH_PREFIX}{}", self.0)
    }

    pub fn is_reference(&self) -> bool {
        self.0.starts_with("map")
    }

    /// Rewrite a reference pathway (`map#####`) for `organism`; other codes
    /// are returned unchanged.
    ///
    /// Precondition: the map number is assumed to exist for `organism`. KEGG
    /// does not guarantee this for every organism, and callers only use
    /// [`ORGANISM`], which covers the human pathways the database holds.
    pub fn for_organism(&self, organism: &str) -> Self {
        match self.0.strip_prefix("map") {
            Some(number) => Self(format!("{organism}{number}")),
            None => self.clone(),
        }
    }
}

impl fmt::Display for PathwayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of KEGG entry addressed by a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Disease,
    Drug,
    Compound,
}

impl EntityKind {
    /// Database name accepted by `/list/{db}`.
    pub fn database(self) -> &'static str {
        match self {
            Self::Disease => "disease",
            Self::Drug => "drug",
            Self::Compound => "compound",
        }
    }

    /// Leading letter of the entry code.
    pub fn code_prefix(self) -> char {
        match self {
            Self::Disease => 'H',
            Self::Drug => 'D',
            Self::Compound => 'C',
        }
    }

    /// Database qualifier KEGG sometimes prepends to the code.
    pub fn qualifier(self) -> &'static str {
        match self {
            Self::Disease => "ds:",
            Self::Drug => "dr:",
            Self::Compound => "cpd:",
        }
    }

    /// Strip the qualifier and check the code shape (`X` followed by digits).
    pub fn normalise(self, raw: &str) -> Option<String> {
        let code = raw.trim();
        let code = code.strip_prefix(self.qualifier()).unwrap_or(code);
        let mut chars = code.chars();
        let shaped = chars.next() == Some(self.code_prefix())
            && code.len() > 1
            && chars.all(|c| c.is_ascii_digit());
        shaped.then(|| code.to_string())
    }
}
