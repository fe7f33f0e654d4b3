//! Capability Classifier
//! Maps a catalog record's declared model type onto capability tags

use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Capability a catalog model can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CapabilityTag {
    Llm,
    Vlm,
    Embedding,
    Rerank,
    Text2Image,
    Image2Image,
}

impl CapabilityTag {
    /// Parse a provider tag. Unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "llm" => Some(Self::Llm),
            "vlm" => Some(Self::Vlm),
            "embedding" => Some(Self::Embedding),
            // the catalog spells rerank models "reranker"
            "rerank" | "reranker" => Some(Self::Rerank),
            "text2image" => Some(Self::Text2Image),
            "image2image" => Some(Self::Image2Image),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Llm => "llm",
            Self::Vlm => "vlm",
            Self::Embedding => "embedding",
            Self::Rerank => "rerank",
            Self::Text2Image => "text2image",
            Self::Image2Image => "image2image",
        }
    }
}

impl fmt::Display for CapabilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The raw `model_type` field of a catalog record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModelType {
    #[default]
    Absent,
    Single(String),
    Many(Vec<String>),
}

impl ModelType {
    /// Normalize the JSON value of `model_type`.
    /// Non-string list members and any other JSON shape are dropped.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(tag)) => Self::Single(tag.clone()),
            Some(Value::Array(items)) => Self::Many(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(String::from))
                    .collect(),
            ),
            _ => Self::Absent,
        }
    }
}

/// Set of capabilities derived from a `ModelType`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet(BTreeSet<CapabilityTag>);

impl CapabilitySet {
    pub fn contains(&self, tag: CapabilityTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn is_vision(&self) -> bool {
        self.contains(CapabilityTag::Vlm)
    }

    /// Eligible for a language-model manifest
    pub fn is_language_model(&self) -> bool {
        self.contains(CapabilityTag::Llm) || self.contains(CapabilityTag::Vlm)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CapabilityTag> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<CapabilityTag> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = CapabilityTag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Classify a model type into capability tags.
///
/// Unrecognized tags are ignored so new provider tags never break manifest
/// generation.
pub fn classify(model_type: &ModelType) -> CapabilitySet {
    match model_type {
        ModelType::Absent => CapabilitySet::default(),
        ModelType::Single(tag) => CapabilityTag::parse(tag).into_iter().collect(),
        ModelType::Many(tags) => tags.iter().filter_map(|t| CapabilityTag::parse(t)).collect(),
    }
}
