use serde::{Deserialize, Serialize};

/// Unique identifier for a record in the inventory
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Generate a fresh, collision-resistant identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a record came from.
///
/// Vendor exports are recognized as [`Source::Lcsc`] or [`Source::DigiKey`];
/// manual entries carry whatever text the user typed, including none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
    Lcsc,
    DigiKey,
    #[default]
    Unknown,
    Other(String),
}

impl Source {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Lcsc => "LCSC",
            Self::DigiKey => "DigiKey",
            Self::Unknown => "Unknown",
            Self::Other(name) => name,
        }
    }

}

impl From<String> for Source {
    fn from(s: String) -> Self {
        match s.as_str() {
            "LCSC" => Self::Lcsc,
            "DigiKey" => Self::DigiKey,
            "Unknown" => Self::Unknown,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        match source {
            Source::Other(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
