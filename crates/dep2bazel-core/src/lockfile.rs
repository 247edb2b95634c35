//! `Gopkg.lock` decoding.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// The decoded lock file; `projects` keeps file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lock {
    #[serde(default)]
    pub projects: Vec<LockedProject>,
}

/// One `[[projects]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedProject {
    /// Import path of the project root, e.g. `github.com/pkg/errors`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub revision: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Alternate location to fetch from (URL or import path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub packages: Vec<String>,
}

impl LockedProject {
    /// Where the project is fetched from: `source` when set, else `name`.
    pub fn remote(&self) -> &str {
        match self.source.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => &self.name,
        }
    }
}

impl FromStr for Lock {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

impl Lock {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        data.parse()
            .with_context(|| format!("failed to parse {}", path.display()))
    }
}
