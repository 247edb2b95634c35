//! Import path → repository root, the way `go get` finds it.
//!
//! Well-known code hosts are matched statically. Anything else is looked up
//! by fetching `https://<import path>?go-get=1` and reading its
//! `<meta name="go-import">` tags.

mod meta;
mod static_hosts;

pub use meta::{match_import, parse_meta_imports, MatchError, MetaImport};

use std::fmt;
use thiserror::Error;

use crate::fetch::{CurlDownloader, FetchError};
use static_hosts::StaticMatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vcs {
    Git,
    Hg,
    Bzr,
    Svn,
    Fossil,
}

impl Vcs {
    pub fn from_cmd(cmd: &str) -> Option<Self> {
        match cmd {
            "git" => Some(Vcs::Git),
            "hg" => Some(Vcs::Hg),
            "bzr" => Some(Vcs::Bzr),
            "svn" => Some(Vcs::Svn),
            "fossil" => Some(Vcs::Fossil),
            _ => None,
        }
    }

    pub fn cmd(self) -> &'static str {
        match self {
            Vcs::Git => "git",
            Vcs::Hg => "hg",
            Vcs::Bzr => "bzr",
            Vcs::Svn => "svn",
            Vcs::Fossil => "fossil",
        }
    }
}

impl fmt::Display for Vcs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cmd())
    }
}

/// Where the repository containing an import path lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRoot {
    pub vcs: Vcs,
    /// Clone URL, e.g. `https://github.com/pkg/errors`.
    pub repo: String,
    /// Import path of the repository root, e.g. `github.com/pkg/errors`.
    pub root: String,
}

#[derive(Debug, Error)]
pub enum VcsRootError {
    #[error("invalid import path {path:?}: {reason}")]
    InvalidImportPath { path: String, reason: &'static str },
    #[error("import path {path:?} does not match the layout of {host}")]
    MalformedHostPath { path: String, host: &'static str },
    #[error("fetch go-get metadata for {path}: {source}")]
    Discovery {
        path: String,
        #[source]
        source: FetchError,
    },
    #[error("no go-import meta tag for {path}")]
    NoMetaImport { path: String },
    #[error("multiple go-import meta tags match {path}: {prefixes:?}")]
    AmbiguousMetaImport { path: String, prefixes: Vec<String> },
    #[error("{path}: unsupported version control system {vcs:?}")]
    UnsupportedVcs { path: String, vcs: String },
    #[error("{path}: invalid repository URL {repo:?}")]
    InvalidRepoUrl { path: String, repo: String },
}

/// Resolves import paths to repository roots.
pub trait RootResolver {
    fn repo_root(&self, import_path: &str) -> Result<RepoRoot, VcsRootError>;
}

/// GET for discovery pages; implemented by the curl downloader.
pub trait PageFetcher {
    fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

impl PageFetcher for CurlDownloader {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        CurlDownloader::get_text(self, url)
    }
}

/// Static host table first, `?go-get=1` discovery second.
pub struct GoGetResolver<P = CurlDownloader> {
    pages: P,
}

impl<P: PageFetcher> GoGetResolver<P> {
    pub fn new(pages: P) -> Self {
        Self { pages }
    }

    fn discover(&self, import_path: &str) -> Result<RepoRoot, VcsRootError> {
        let mut url = url::Url::parse(&format!("https://{import_path}")).map_err(|_| {
            VcsRootError::InvalidImportPath {
                path: import_path.to_string(),
                reason: "not a valid host/path",
            }
        })?;
        url.set_query(Some("go-get=1"));
        tracing::debug!("discovering repository root via {}", url);

        let html = self
            .pages
            .get_text(url.as_str())
            .map_err(|source| VcsRootError::Discovery {
                path: import_path.to_string(),
                source,
            })?;
        let imports = parse_meta_imports(&html);
        let found = match_import(&imports, import_path).map_err(|e| match e {
            MatchError::NoMatch => VcsRootError::NoMetaImport {
                path: import_path.to_string(),
            },
            MatchError::Ambiguous(prefixes) => VcsRootError::AmbiguousMetaImport {
                path: import_path.to_string(),
                prefixes,
            },
        })?;

        let vcs = Vcs::from_cmd(&found.vcs).ok_or_else(|| VcsRootError::UnsupportedVcs {
            path: import_path.to_string(),
            vcs: found.vcs.clone(),
        })?;
        let repo_ok = url::Url::parse(&found.repo)
            .map(|u| u.has_host() && matches!(u.scheme(), "https" | "http" | "git" | "ssh" | "svn" | "bzr"))
            .unwrap_or(false);
        if !repo_ok {
            return Err(VcsRootError::InvalidRepoUrl {
                path: import_path.to_string(),
                repo: found.repo.clone(),
            });
        }

        Ok(RepoRoot {
            vcs,
            repo: found.repo.clone(),
            root: found.prefix.clone(),
        })
    }
}

impl<P: PageFetcher> RootResolver for GoGetResolver<P> {
    fn repo_root(&self, import_path: &str) -> Result<RepoRoot, VcsRootError> {
        let import_path = to_import_path(import_path);
        validate(import_path)?;
        match static_hosts::lookup(import_path) {
            StaticMatch::Found(root) => Ok(root),
            StaticMatch::Malformed(host) => Err(VcsRootError::MalformedHostPath {
                path: import_path.to_string(),
                host,
            }),
            StaticMatch::Unknown => self.discover(import_path),
        }
    }
}

/// Lock files may name a source as a URL; lookups work on the bare import path.
pub fn to_import_path(remote: &str) -> &str {
    let bare = remote
        .strip_prefix("https://")
        .or_else(|| remote.strip_prefix("http://"))
        .unwrap_or(remote);
    bare.trim_end_matches('/')
}

fn validate(path: &str) -> Result<(), VcsRootError> {
    let invalid = |reason| {
        Err(VcsRootError::InvalidImportPath {
            path: path.to_string(),
            reason,
        })
    };
    if path.is_empty() {
        return invalid("empty");
    }
    if path.contains("://") {
        return invalid("contains a scheme");
    }
    if path.starts_with('/') || path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return invalid("empty or relative path element");
    }
    if !path
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-._~/+:".contains(c))
    {
        return invalid("disallowed character");
    }
    let host = path.split('/').next().unwrap_or_default();
    if !host.contains('.') {
        return invalid("missing dot in first path element");
    }
    Ok(())
}
