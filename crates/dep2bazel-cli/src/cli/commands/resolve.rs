//! Resolve command: fetch descriptor for a single repository.

use anyhow::{Context, Result};
use dep2bazel_core::config::Dep2BazelConfig;
use dep2bazel_core::emit::render_descriptor;
use dep2bazel_core::fetch::CurlDownloader;
use dep2bazel_core::repository::RepositoryResolver;

/// Resolve `url` at `revision` and print the descriptor.
pub fn run_resolve(cfg: &Dep2BazelConfig, url: &str, revision: &str, json: bool) -> Result<()> {
    let resolver = RepositoryResolver::new(
        Box::new(CurlDownloader::from_config(cfg)),
        cfg.resolver(),
    );
    let descriptor = resolver.resolve(url, revision);
    if json {
        let text = serde_json::to_string_pretty(&descriptor).context("serialize descriptor")?;
        println!("{text}");
    } else {
        print!("{}", render_descriptor(&descriptor));
    }
    Ok(())
}
