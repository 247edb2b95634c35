//! Canonical repository names derived from Go import paths.
//!
//! `github.com/scele/dep2bazel` becomes `com_github_scele_dep2bazel`: host
//! labels reversed, path segments appended, everything joined by `_`,
//! lowercased, with `-` and `.` folded to `_`. Two import paths that differ
//! only in those characters map to the same name; that collision is accepted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bazel-safe identifier for an external repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalName(String);

impl CanonicalName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derives the canonical name of `import_path`.
///
/// The first `/`-separated segment is treated as a dotted host name. Callers
/// pass well-formed import paths; an empty string yields an empty name.
pub fn normalize(import_path: &str) -> CanonicalName {
    let mut segments = import_path.split('/');
    let host = segments.next().unwrap_or_default();

    let mut parts: Vec<&str> = host.split('.').rev().collect();
    parts.extend(segments);

    let joined = parts.join("_").to_lowercase();
    CanonicalName(joined.replace(['-', '.'], "_"))
}
