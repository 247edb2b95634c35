//! GOPATH-style workspace pointing at Bazel's external repositories.
//!
//! For every dependency, `<gopath>/src/<import path>` becomes a symlink to
//! `<bazel output base>/external/<canonical name>`, so Go tooling outside Bazel
//! sees the same sources the build uses.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::naming::normalize;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create symlink {} -> {}: {source}", link.display(), target.display())]
    Symlink {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct GopathLayout {
    gopath_root: PathBuf,
    bazel_output_base: PathBuf,
}

impl GopathLayout {
    pub fn new(gopath_root: impl Into<PathBuf>, bazel_output_base: impl Into<PathBuf>) -> Self {
        Self {
            gopath_root: gopath_root.into(),
            bazel_output_base: bazel_output_base.into(),
        }
    }

    /// Where Bazel materializes the repository for `import_path`.
    pub fn external_path(&self, import_path: &str) -> PathBuf {
        self.bazel_output_base
            .join("external")
            .join(normalize(import_path).as_str())
    }

    fn link_path(&self, import_path: &str) -> PathBuf {
        self.gopath_root.join("src").join(import_path)
    }

    /// Link `<gopath>/src/<import_path>` to the dependency's external repository.
    pub fn link_dependency(&self, import_path: &str) -> Result<PathBuf, LayoutError> {
        let target = self.external_path(import_path);
        let link = self.link_path(import_path);
        place_symlink(&link, &target)?;
        Ok(link)
    }

    /// Link `<gopath>/src/<go_prefix>` to the project's own source directory.
    pub fn link_source(&self, go_prefix: &str, source_directory: &Path) -> Result<PathBuf, LayoutError> {
        let link = self.link_path(go_prefix);
        place_symlink(&link, source_directory)?;
        Ok(link)
    }
}

fn place_symlink(link: &Path, target: &Path) -> Result<(), LayoutError> {
    if let Some(parent) = link.parent() {
        create_dir_all(parent).map_err(|source| LayoutError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    // Re-running over an existing workspace is fine as long as the link agrees.
    if fs::read_link(link).is_ok_and(|existing| existing.as_path() == target) {
        return Ok(());
    }
    tracing::debug!("symlink {} -> {}", link.display(), target.display());
    symlink(target, link).map_err(|source| LayoutError::Symlink {
        link: link.to_path_buf(),
        target: target.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn create_dir_all(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o775).create(path)
}

#[cfg(not(unix))]
fn create_dir_all(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}
