use serde::{
    Deserialize,
    Serialize,
};

/// Broad category of a learning item. The content pipeline tags items so
/// review surfaces can filter by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Word,
    Kanji,
    Grammar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JlptLevel {
    N5,
    N4,
    N3,
    N2,
    N1,
}

/// A learning item as produced by the content subsystem, consumed at the
/// exposure boundary. Only `id` carries identity; everything else is
/// denormalized display data copied onto the history record at first
/// exposure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceItem {
    pub id: String,              // Stable content-derived identifier
    pub text: String,            // The item as displayed (e.g. 勉強する)
    pub item_type: Option<ItemType>,
    pub meaning: Option<String>,
    pub reading: Option<String>, // Reading in kana
    pub jlpt: Option<JlptLevel>,
}

impl SourceItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        SourceItem {
            id: id.into(),
            text: text.into(),
            item_type: None,
            meaning: None,
            reading: None,
            jlpt: None,
        }
    }
}
