use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key of the bucket that collects tasks without a usable category.
pub const DEFAULT_BUCKET: &str = "Other";

/// Canonical grouping key for a task category.
///
/// Never blank: the only way to build one from arbitrary input is
/// [`normalize`], which routes blank labels to [`DEFAULT_BUCKET`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CategoryKey(String);

impl CategoryKey {
    pub fn default_bucket() -> Self {
        Self(DEFAULT_BUCKET.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default_bucket(&self) -> bool {
        self.0 == DEFAULT_BUCKET
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CategoryKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CategoryKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CategoryKey {
    fn from(label: &str) -> Self {
        normalize(Some(label))
    }
}

impl From<String> for CategoryKey {
    fn from(label: String) -> Self {
        if is_blank(&label) {
            Self::default_bucket()
        } else {
            Self(label)
        }
    }
}

impl From<Option<&str>> for CategoryKey {
    fn from(label: Option<&str>) -> Self {
        normalize(label)
    }
}

impl<'de> Deserialize<'de> for CategoryKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(Self::from).unwrap_or_else(Self::default_bucket))
    }
}

/// Maps a raw category label to its grouping key.
///
/// Missing, empty and whitespace-only labels all land in the default bucket.
/// Anything else is kept byte for byte: no trimming, no case folding.
pub fn normalize(label: Option<&str>) -> CategoryKey {
    match label {
        Some(text) if !is_blank(text) => CategoryKey(text.to_string()),
        _ => CategoryKey::default_bucket(),
    }
}

fn is_blank(label: &str) -> bool {
    label.trim().is_empty()
}
