//! Upstream version identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an installable upstream version.
///
/// Upstream version strings are not semver (release ids like `1.21.4` sit
/// next to snapshot ids like `24w14a`), so this wraps the raw string and
/// compares it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(String);

impl VersionId {
    /// Create a version identifier from the raw upstream string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw version string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for VersionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
