//! CLI for dep2bazel.

mod commands;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use dep2bazel_core::config::{self, Dep2BazelConfig};
use std::path::PathBuf;

use commands::{run_convert, run_name, run_remap, run_resolve, ConvertOptions};

/// Top-level CLI for dep2bazel.
#[derive(Debug, Parser)]
#[command(name = "dep2bazel")]
#[command(about = "Convert Gopkg.lock into Bazel go_repository rules", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/dep2bazel/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log detail (-v, -vv); DEP2BAZEL_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Flags that override the `go_repository` attributes from the config file.
#[derive(Debug, Default, Args)]
pub struct RuleFlags {
    /// Record SHA-256 checksums for archives with stable bytes.
    #[arg(long)]
    pub sha256: bool,

    /// Value for the build_file_generation attribute ("" to omit).
    #[arg(long, value_name = "VALUE")]
    pub build_file_generation: Option<String>,

    /// Value for the build_file_proto_mode attribute ("" to omit).
    #[arg(long, value_name = "VALUE")]
    pub build_file_proto_mode: Option<String>,
}

impl RuleFlags {
    fn apply(self, cfg: &mut Dep2BazelConfig) {
        if self.sha256 {
            cfg.sha256 = true;
        }
        if let Some(v) = self.build_file_generation {
            cfg.build_file_generation = Some(v);
        }
        if let Some(v) = self.build_file_proto_mode {
            cfg.build_file_proto_mode = Some(v);
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Convert a Gopkg.lock into a go_deps() macro and/or a GOPATH workspace.
    Convert {
        /// Path to Gopkg.lock.
        lockfile: PathBuf,

        /// Write the .bzl file here (stdout when omitted and no workspace is requested).
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        rules: RuleFlags,

        /// GOPATH root to populate with symlinks into Bazel's external repositories.
        #[arg(long, value_name = "DIR", requires = "bazel_output_base")]
        gopath: Option<PathBuf>,

        /// Bazel output base (`bazel info output_base`).
        #[arg(long, value_name = "DIR", requires = "gopath")]
        bazel_output_base: Option<PathBuf>,

        /// Project sources to link under --go-prefix in the GOPATH.
        #[arg(long, value_name = "DIR", requires = "go_prefix")]
        source_directory: Option<PathBuf>,

        /// Import path of the project itself.
        #[arg(long, value_name = "PATH", requires = "source_directory")]
        go_prefix: Option<String>,
    },

    /// Resolve one repository URL at a revision and print its fetch descriptor.
    Resolve {
        /// Repository URL, e.g. https://github.com/pkg/errors.
        url: String,
        /// Commit, tag or branch.
        revision: String,
        /// Record the archive's SHA-256.
        #[arg(long)]
        sha256: bool,
        /// Print JSON instead of go_repository attributes.
        #[arg(long)]
        json: bool,
    },

    /// Print the canonical repository name for an import path.
    Name {
        /// Import path, e.g. golang.org/x/net.
        import_path: String,
    },

    /// Print the archive-friendly mirror of a repository URL.
    Remap {
        /// Repository URL, e.g. https://gopkg.in/yaml.v2.
        url: String,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<Dep2BazelConfig> {
    match path {
        Some(p) => config::load_from(p),
        None => config::load_or_init(),
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            CliCommand::Convert {
                lockfile,
                output,
                rules,
                gopath,
                bazel_output_base,
                source_directory,
                go_prefix,
            } => {
                let mut cfg = load_config(self.config.as_ref())?;
                rules.apply(&mut cfg);
                tracing::debug!("loaded config: {:?}", cfg);
                let opts = ConvertOptions {
                    lockfile,
                    output,
                    workspace: gopath.zip(bazel_output_base),
                    source: go_prefix.zip(source_directory),
                };
                run_convert(&cfg, opts)?;
            }
            CliCommand::Resolve {
                url,
                revision,
                sha256,
                json,
            } => {
                let mut cfg = load_config(self.config.as_ref())?;
                cfg.sha256 |= sha256;
                run_resolve(&cfg, &url, &revision, json)?;
            }
            CliCommand::Name { import_path } => run_name(&import_path),
            CliCommand::Remap { url } => run_remap(&url),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
