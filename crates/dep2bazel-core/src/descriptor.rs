//! How to reproduce a dependency's source tree.

use serde::Serialize;

/// A revision snapshot served as a tarball.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveDescriptor {
    url: String,
    strip_prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha256: Option<String>,
}

impl ArchiveDescriptor {
    pub fn new(url: String, strip_prefix: String, sha256: Option<String>) -> Self {
        Self {
            url,
            strip_prefix,
            sha256,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Top-level directory to drop when extracting; empty when there is none.
    pub fn strip_prefix(&self) -> &str {
        &self.strip_prefix
    }

    /// Lowercase hex SHA-256 of the archive, when the host serves stable bytes
    /// and checksums were requested.
    pub fn sha256(&self) -> Option<&str> {
        self.sha256.as_deref()
    }
}

/// Fetch by revision through a version-control client at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VcsDescriptor {
    revision: String,
}

impl VcsDescriptor {
    pub fn new(revision: impl Into<String>) -> Self {
        Self {
            revision: revision.into(),
        }
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FetchDescriptor {
    Archive(ArchiveDescriptor),
    Vcs(VcsDescriptor),
}

impl FetchDescriptor {
    pub fn as_archive(&self) -> Option<&ArchiveDescriptor> {
        match self {
            FetchDescriptor::Archive(a) => Some(a),
            FetchDescriptor::Vcs(_) => None,
        }
    }

    pub fn is_archive(&self) -> bool {
        self.as_archive().is_some()
    }
}

impl From<ArchiveDescriptor> for FetchDescriptor {
    fn from(a: ArchiveDescriptor) -> Self {
        FetchDescriptor::Archive(a)
    }
}

impl From<VcsDescriptor> for FetchDescriptor {
    fn from(v: VcsDescriptor) -> Self {
        FetchDescriptor::Vcs(v)
    }
}
