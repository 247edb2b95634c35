//! Tracing setup for the `dep2bazel` binary.
//!
//! Events are appended to `$XDG_STATE_HOME/dep2bazel/dep2bazel.log`, one
//! header line per run. The level follows the `-v` count unless
//! `DEP2BAZEL_LOG` holds an `EnvFilter` directive.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the verbosity-derived filter.
pub const FILTER_ENV: &str = "DEP2BAZEL_LOG";

/// Filter directive for `-v` repeated `verbosity` times.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn,dep2bazel=info,dep2bazel_core=info",
        1 => "info,dep2bazel=debug,dep2bazel_core=debug",
        _ => "debug,dep2bazel=trace,dep2bazel_core=trace",
    }
}

fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
}

/// `$XDG_STATE_HOME/dep2bazel/dep2bazel.log`.
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dep2bazel")?;
    Ok(xdg_dirs
        .get_state_home()
        .join("dep2bazel")
        .join("dep2bazel.log"))
}

/// Open `path` for appending, creating its directory first.
pub fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))
}

/// Log to the state-dir file. Errors leave no subscriber installed, so the
/// caller can fall back to [`init_logging_stderr`].
pub fn init_logging(verbosity: u8) -> Result<()> {
    let path = log_path()?;
    let file = open_log_file(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(verbosity))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {}", e))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        pid = std::process::id(),
        "dep2bazel run started, logging to {}",
        path.display()
    );
    Ok(())
}

pub fn init_logging_stderr(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbosity))
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}
