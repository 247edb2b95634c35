//! Tarball resolution: turn a repository URL and revision into an archive
//! descriptor for the hosts that serve revision snapshots.
//!
//! Only two host families are supported. Anything else is
//! [`TarballError::UnknownServer`], which the repository resolver treats as
//! the signal to fall back to a VCS checkout.

mod inspect;

#[cfg(test)]
pub(crate) use inspect::testutil;
pub use inspect::{strip_prefix, InspectError};

use std::io::{self, BufReader, Seek, SeekFrom};
use std::path::PathBuf;
use thiserror::Error;

use crate::checksum;
use crate::config::ResolverConfig;
use crate::descriptor::ArchiveDescriptor;
use crate::fetch::{ArchiveDownloader, FetchError};

const GITHUB: &str = "https://github.com/";
const GOOGLESOURCE: &str = "https://go.googlesource.com/";

#[derive(Debug, Error)]
pub enum TarballError {
    #[error("unknown server: {0}")]
    UnknownServer(String),
    #[error("create temporary file: {0}")]
    TempFile(#[source] io::Error),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("inspect {url}: {source}")]
    Inspect {
        url: String,
        #[source]
        source: InspectError,
    },
    #[error("checksum {url}: {source}")]
    Checksum {
        url: String,
        #[source]
        source: io::Error,
    },
}

/// Hosts with a known tarball endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostFamily {
    /// `<repo>/archive/<rev>.tar.gz`, wrapped in one top-level directory.
    GitHub,
    /// `<repo>/+archive/<rev>.tar.gz`, unwrapped, with bytes that change on
    /// every download.
    GoogleSource,
}

impl HostFamily {
    pub fn detect(url: &str) -> Option<Self> {
        if url.starts_with(GITHUB) {
            Some(HostFamily::GitHub)
        } else if url.starts_with(GOOGLESOURCE) {
            Some(HostFamily::GoogleSource)
        } else {
            None
        }
    }

    pub fn archive_url(self, repo_url: &str, revision: &str) -> String {
        let repo_url = repo_url.trim_end_matches('/');
        match self {
            HostFamily::GitHub => format!("{repo_url}/archive/{revision}.tar.gz"),
            HostFamily::GoogleSource => format!("{repo_url}/+archive/{revision}.tar.gz"),
        }
    }
}

pub struct TarballResolver {
    downloader: Box<dyn ArchiveDownloader>,
    config: ResolverConfig,
    /// Where scratch archives go; the system temp dir when unset.
    scratch_dir: Option<PathBuf>,
}

impl TarballResolver {
    pub fn new(downloader: Box<dyn ArchiveDownloader>, config: ResolverConfig) -> Self {
        Self {
            downloader,
            config,
            scratch_dir: None,
        }
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Build the archive descriptor for `url` at `revision`.
    pub fn resolve(&self, url: &str, revision: &str) -> Result<ArchiveDescriptor, TarballError> {
        let host =
            HostFamily::detect(url).ok_or_else(|| TarballError::UnknownServer(url.to_string()))?;
        let archive_url = host.archive_url(url, revision);
        match host {
            HostFamily::GitHub => self.inspect_download(archive_url),
            // No top-level directory and no stable checksum; nothing to download.
            HostFamily::GoogleSource => Ok(ArchiveDescriptor::new(archive_url, String::new(), None)),
        }
    }

    /// Download `archive_url` to a scratch file, read its root directory and
    /// optionally hash it. The scratch file is deleted when this returns.
    fn inspect_download(&self, archive_url: String) -> Result<ArchiveDescriptor, TarballError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("dep2bazel-").suffix(".tar.gz");
        let mut scratch = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(TarballError::TempFile)?;
        let file = scratch.as_file_mut();

        let size = self.downloader.download(&archive_url, file)?;
        tracing::debug!(url = %archive_url, size, "archive downloaded");

        let inspect_err = |source: InspectError| TarballError::Inspect {
            url: archive_url.clone(),
            source,
        };
        file.seek(SeekFrom::Start(0))
            .map_err(|e| inspect_err(e.into()))?;
        let prefix = strip_prefix(BufReader::new(&*file), self.config.strip_prefix_strategy)
            .map_err(inspect_err)?;

        let sha256 = if self.config.checksum {
            let digest = checksum::sha256_file(file).map_err(|source| TarballError::Checksum {
                url: archive_url.clone(),
                source,
            })?;
            Some(digest)
        } else {
            None
        };

        Ok(ArchiveDescriptor::new(archive_url, prefix, sha256))
    }
}
