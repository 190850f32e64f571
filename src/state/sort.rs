use serde::{Deserialize, Serialize};

/// Display order for the notes of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortOrder {
    /// Timestamp descending
    #[default]
    #[serde(rename = "timestamp-desc")]
    Newest,
    /// Timestamp ascending
    #[serde(rename = "timestamp-asc")]
    Oldest,
    /// Content, lexicographic ascending
    #[serde(rename = "content-asc")]
    Content,
}

impl SortOrder {
    /// The order a sort toggle moves to next.
    pub fn next(self) -> Self {
        match self {
            SortOrder::Newest => SortOrder::Oldest,
            SortOrder::Oldest => SortOrder::Content,
            SortOrder::Content => SortOrder::Newest,
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Newest => write!(f, "newest"),
            SortOrder::Oldest => write!(f, "oldest"),
            SortOrder::Content => write!(f, "content"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "newest" | "new" | "timestamp-desc" => Ok(SortOrder::Newest),
            "oldest" | "old" | "timestamp-asc" => Ok(SortOrder::Oldest),
            "content" | "alpha" | "content-asc" => Ok(SortOrder::Content),
            _ => Err(s.to_string()),
        }
    }
}
