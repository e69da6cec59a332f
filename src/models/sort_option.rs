use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordering applied to the visible item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    #[default]
    Alphabetical,
    #[serde(rename = "category")]
    ByCategory,
    #[serde(rename = "status")]
    ByStatus,
}

impl SortOption {
    pub const ALL: [SortOption; 3] = [
        SortOption::Alphabetical,
        SortOption::ByCategory,
        SortOption::ByStatus,
    ];

    /// Human readable label shown in the sort menu
    pub fn label(&self) -> &'static str {
        match self {
            SortOption::Alphabetical => "Alphabetically",
            SortOption::ByCategory => "Category",
            SortOption::ByStatus => "Status",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOption::Alphabetical => write!(f, "alphabetical"),
            SortOption::ByCategory => write!(f, "category"),
            SortOption::ByStatus => write!(f, "status"),
        }
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "alphabetical" => Ok(SortOption::Alphabetical),
            "category" => Ok(SortOption::ByCategory),
            "status" => Ok(SortOption::ByStatus),
            _ => Err(format!(
                "Invalid sort option '{}'. Valid options: alphabetical, category, status",
                s
            )),
        }
    }
}
