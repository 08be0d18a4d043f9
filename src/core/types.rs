use serde::{Deserialize, Serialize};

/// Identifier of a synteny block.
///
/// A block's query-side and target-side nodes share the same id, which is the
/// block's position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub usize);

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "block#{}", self.0)
    }
}

/// Relative orientation of the two sides of an alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

impl Strand {
    /// Parse `+` or `-`
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Self::Forward),
            "-" => Some(Self::Reverse),
            _ => None,
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => write!(f, "+"),
            Self::Reverse => write!(f, "-"),
        }
    }
}

/// One validated row of a synteny block file
#[derive(Debug, Clone, PartialEq)]
pub struct SyntenyRecord {
    pub query_contig: String,
    pub query_start: u64,
    pub query_stop: u64,
    pub target_contig: String,
    pub target_start: u64,
    pub target_stop: u64,
    /// Proportion identity in [0, 1]
    pub identity: f64,
    pub strand: Strand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_parse() {
        assert_eq!(Strand::parse("+"), Some(Strand::Forward));
        assert_eq!(Strand::parse("-"), Some(Strand::Reverse));
        assert_eq!(Strand::parse("."), None);
        assert_eq!(Strand::Reverse.to_string(), "-");
    }
}
