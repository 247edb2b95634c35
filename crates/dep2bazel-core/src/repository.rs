//! Picks the fetch strategy for one repository.
//!
//! Tarballs are preferred: the remapped URL first, then the URL as given
//! (even when the two are equal).
//! When neither yields an archive the dependency is fetched by revision with
//! a VCS client, so resolution itself never fails.

use crate::config::ResolverConfig;
use crate::descriptor::{FetchDescriptor, VcsDescriptor};
use crate::fetch::ArchiveDownloader;
use crate::remap::remap;
use crate::tarball::{TarballError, TarballResolver};

pub struct RepositoryResolver {
    tarballs: TarballResolver,
}

impl RepositoryResolver {
    pub fn new(downloader: Box<dyn ArchiveDownloader>, config: ResolverConfig) -> Self {
        Self {
            tarballs: TarballResolver::new(downloader, config),
        }
    }

    pub fn resolve(&self, root_url: &str, revision: &str) -> FetchDescriptor {
        let remapped = remap(root_url);
        match self.tarballs.resolve(&remapped, revision) {
            Ok(archive) => return archive.into(),
            Err(e) => log_attempt(&remapped, &e),
        }

        // Tried even when remapping changed nothing: a transient failure gets
        // one more chance before settling for a checkout.
        match self.tarballs.resolve(root_url, revision) {
            Ok(archive) => return archive.into(),
            Err(e) => log_attempt(root_url, &e),
        }

        tracing::info!(url = root_url, revision, "no tarball available, using VCS checkout");
        VcsDescriptor::new(revision).into()
    }
}

fn log_attempt(url: &str, err: &TarballError) {
    match err {
        TarballError::UnknownServer(_) => tracing::debug!(url, "no tarball endpoint for host"),
        other => tracing::warn!(url, error = %other, "tarball attempt failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StripPrefixStrategy;
    use crate::tarball::fake::MemoryDownloader;
    use crate::tarball::testutil::github_like;

    fn resolver(dl: MemoryDownloader, checksum: bool) -> RepositoryResolver {
        RepositoryResolver::new(
            Box::new(dl),
            ResolverConfig {
                checksum,
                strip_prefix_strategy: StripPrefixStrategy::SecondEntry,
            },
        )
    }

    #[test]
    fn github_dependency_becomes_archive() {
        let dl = MemoryDownloader::default().with(
            "https://github.com/foo/bar/archive/abc123.tar.gz",
            github_like("bar-abc123/"),
        );
        let d = resolver(dl, false).resolve("https://github.com/foo/bar", "abc123");
        let a = d.as_archive().expect("archive");
        assert_eq!(a.url(), "https://github.com/foo/bar/archive/abc123.tar.gz");
        assert_eq!(a.strip_prefix(), "bar-abc123/");
        assert_eq!(a.sha256(), None);
    }

    #[test]
    fn gopkg_in_is_fetched_from_github_mirror() {
        let dl = MemoryDownloader::default().with(
            "https://github.com/go-yaml/yaml/archive/v2.2.1.tar.gz",
            github_like("yaml-2.2.1/"),
        );
        let d = resolver(dl, true).resolve("https://gopkg.in/yaml.v2", "v2.2.1");
        let a = d.as_archive().expect("archive");
        assert_eq!(a.url(), "https://github.com/go-yaml/yaml/archive/v2.2.1.tar.gz");
        assert_eq!(a.strip_prefix(), "yaml-2.2.1/");
        assert!(a.sha256().is_some());
    }

    #[test]
    fn falls_back_to_given_url_when_mirror_fails() {
        // github.com/golang/net is not served, so the googlesource archive is used.
        let d = resolver(MemoryDownloader::default(), true)
            .resolve("https://go.googlesource.com/net", "1e491301");
        let a = d.as_archive().expect("archive");
        assert_eq!(a.url(), "https://go.googlesource.com/net/+archive/1e491301.tar.gz");
        assert_eq!(a.strip_prefix(), "");
        assert_eq!(a.sha256(), None);
    }

    #[test]
    fn unknown_host_degrades_to_vcs_with_same_revision() {
        let d = resolver(MemoryDownloader::default(), true)
            .resolve("https://bitbucket.org/ww/goautoneg", "2ae31c8b");
        assert_eq!(d, FetchDescriptor::Vcs(VcsDescriptor::new("2ae31c8b")));
    }

    #[test]
    fn failed_download_degrades_to_vcs_after_two_attempts() {
        let dl = MemoryDownloader::default();
        let requested = dl.requested.clone();
        let d = resolver(dl, false).resolve("https://github.com/foo/missing", "v1.0.0");
        assert_eq!(d, FetchDescriptor::Vcs(VcsDescriptor::new("v1.0.0")));
        let url = "https://github.com/foo/missing/archive/v1.0.0.tar.gz";
        assert_eq!(*requested.borrow(), [url, url]);
    }

    #[test]
    fn mirror_is_tried_before_given_url() {
        let dl = MemoryDownloader::default();
        let requested = dl.requested.clone();
        let d = resolver(dl, false).resolve("https://gopkg.in/yaml.v2", "v2.2.1");
        assert!(!d.is_archive());
        // gopkg.in itself has no tarball endpoint, so only the mirror is fetched.
        assert_eq!(
            *requested.borrow(),
            ["https://github.com/go-yaml/yaml/archive/v2.2.1.tar.gz"]
        );
    }
}
