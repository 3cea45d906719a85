//! Spending categories shared by transactions and their items.

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Fixed set of categories a transaction (or an item) can be tagged with.
///
/// Stored as its lowercase name. Anything not explicitly tagged falls into
/// [`Category::Others`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Transportation,
    Utilities,
    Entertainment,
    Shopping,
    Healthcare,
    Education,
    #[default]
    Others,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Self::Food,
        Self::Transportation,
        Self::Utilities,
        Self::Entertainment,
        Self::Shopping,
        Self::Healthcare,
        Self::Education,
        Self::Others,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transportation => "transportation",
            Self::Utilities => "utilities",
            Self::Entertainment => "entertainment",
            Self::Shopping => "shopping",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::Others => "others",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| EngineError::InvalidCategory(value.to_string()))
    }
}
