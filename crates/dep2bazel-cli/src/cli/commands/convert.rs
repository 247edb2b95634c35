//! Convert command: Gopkg.lock to go_deps() and/or a GOPATH workspace.

use anyhow::{Context, Result};
use dep2bazel_core::config::Dep2BazelConfig;
use dep2bazel_core::convert::{Conversion, Converter};
use dep2bazel_core::emit::{extra_attributes, render_file};
use dep2bazel_core::fetch::CurlDownloader;
use dep2bazel_core::layout::GopathLayout;
use dep2bazel_core::lockfile::Lock;
use dep2bazel_core::repository::RepositoryResolver;
use dep2bazel_core::vcs_root::GoGetResolver;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct ConvertOptions {
    pub lockfile: PathBuf,
    pub output: Option<PathBuf>,
    /// (GOPATH root, Bazel output base).
    pub workspace: Option<(PathBuf, PathBuf)>,
    /// (go prefix, source directory).
    pub source: Option<(String, PathBuf)>,
}

impl ConvertOptions {
    /// Rules are produced for an explicit output file, or for stdout when
    /// nothing else was asked for.
    pub fn emits_rules(&self) -> bool {
        self.output.is_some() || self.workspace.is_none()
    }
}

pub fn run_convert(cfg: &Dep2BazelConfig, opts: ConvertOptions) -> Result<()> {
    let lock = Lock::load(&opts.lockfile)?;
    tracing::info!(
        "converting {} ({} projects)",
        opts.lockfile.display(),
        lock.projects.len()
    );

    // Opened up front so a bad path fails before any download or symlink.
    let mut output = match &opts.output {
        Some(path) => Some((
            path,
            fs::File::create(path).with_context(|| format!("create {}", path.display()))?,
        )),
        None => None,
    };

    let converter = build_converter(cfg, &opts);
    let conversion = converter.run(&lock)?;
    report_skipped(&conversion);

    if !opts.emits_rules() {
        return Ok(());
    }
    let text = render_file(&conversion.rules);
    match &mut output {
        Some((path, file)) => {
            file.write_all(text.as_bytes())
                .with_context(|| format!("write {}", path.display()))?;
            tracing::info!("wrote {} rules to {}", conversion.rules.len(), path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn build_converter(cfg: &Dep2BazelConfig, opts: &ConvertOptions) -> Converter {
    let downloader = CurlDownloader::from_config(cfg);
    let roots = GoGetResolver::new(downloader.clone());
    let repositories = RepositoryResolver::new(Box::new(downloader), cfg.resolver());

    let mut converter = Converter::new(Box::new(roots), repositories)
        .extra_attributes(extra_attributes(cfg))
        .emit_rules(opts.emits_rules());
    if let Some((gopath, output_base)) = &opts.workspace {
        converter = converter.layout(GopathLayout::new(gopath, output_base));
    }
    if let Some((prefix, dir)) = &opts.source {
        converter = converter.source_link(prefix.as_str(), dir);
    }
    converter
}

fn report_skipped(conversion: &Conversion) {
    for skipped in &conversion.skipped {
        eprintln!("warning: skipping {}: {}", skipped.name, skipped.error);
    }
}
