//! dep2bazel core: resolve `Gopkg.lock` dependencies into reproducible
//! `go_repository` fetch rules.

pub mod checksum;
pub mod config;
pub mod convert;
pub mod descriptor;
pub mod emit;
pub mod fetch;
pub mod layout;
pub mod lockfile;
pub mod logging;
pub mod naming;
pub mod remap;
pub mod repository;
pub mod retry;
pub mod tarball;
pub mod vcs_root;

pub use config::{Dep2BazelConfig, ResolverConfig, StripPrefixStrategy};
pub use convert::{Conversion, Converter, Skipped};
pub use descriptor::{ArchiveDescriptor, FetchDescriptor, VcsDescriptor};
pub use emit::{render_file, render_rule, BuildRule};
pub use fetch::{ArchiveDownloader, CurlDownloader, FetchError};
pub use layout::{GopathLayout, LayoutError};
pub use lockfile::{Lock, LockedProject};
pub use naming::{normalize, CanonicalName};
pub use remap::remap;
pub use repository::RepositoryResolver;
pub use tarball::{HostFamily, TarballError, TarballResolver};
pub use vcs_root::{GoGetResolver, RepoRoot, RootResolver, Vcs, VcsRootError};
