//! Remap command: archive-friendly mirror of a repository URL.

use dep2bazel_core::remap::remap;

/// Print the URL tarballs are fetched from for `url`.
pub fn run_remap(url: &str) {
    println!("{}", remap(url));
}
