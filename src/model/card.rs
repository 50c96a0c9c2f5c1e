use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identity of a board card: the record's model name and its id.
///
/// Ids arrive as JSON numbers from some endpoints and as strings from
/// others; both normalize to the string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardRef {
    pub model: String,
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

impl CardRef {
    pub fn new(model: impl Into<String>, id: impl Into<String>) -> Self {
        CardRef {
            model: model.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for CardRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.model, self.id)
    }
}

/// A card as displayed on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub card: CardRef,
    /// Text shown on the card face
    pub label: String,
    /// Status of the column that currently owns the card
    pub status: String,
}

/// Accept `"7"` or `7` for an id field.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Uint(n) => n.to_string(),
    })
}
