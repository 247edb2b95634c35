use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per download (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.5,
            max_delay_secs: 10,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Timeouts applied to every HTTP transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Upper bound for a whole transfer, including the body.
    pub timeout_secs: u64,
    /// Abort when throughput stays below this many bytes/sec for `low_speed_time_secs`.
    pub low_speed_limit_bytes: u32,
    pub low_speed_time_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 600,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
        }
    }
}

/// How the tarball resolver determines the directory to strip from GitHub archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StripPrefixStrategy {
    /// Name of the second entry in the listing (after the pax global header).
    #[default]
    SecondEntry,
    /// Single top-level directory shared by every entry.
    CommonPrefix,
}

/// Global configuration loaded from `~/.config/dep2bazel/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dep2BazelConfig {
    /// Record SHA-256 checksums for archives that have stable bytes.
    #[serde(default)]
    pub sha256: bool,
    /// Value of the `build_file_generation` attribute (omitted when unset).
    #[serde(default)]
    pub build_file_generation: Option<String>,
    /// Value of the `build_file_proto_mode` attribute (omitted when unset).
    #[serde(default = "default_proto_mode")]
    pub build_file_proto_mode: Option<String>,
    #[serde(default)]
    pub strip_prefix_strategy: StripPrefixStrategy,
    #[serde(default)]
    pub http: HttpConfig,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

/// Knobs of the resolution engine, split out of [`Dep2BazelConfig`] so the
/// resolvers can be built without touching the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolverConfig {
    pub checksum: bool,
    pub strip_prefix_strategy: StripPrefixStrategy,
}

fn default_proto_mode() -> Option<String> {
    Some("disable".to_string())
}

impl Default for Dep2BazelConfig {
    fn default() -> Self {
        Self {
            sha256: false,
            build_file_generation: None,
            build_file_proto_mode: default_proto_mode(),
            strip_prefix_strategy: StripPrefixStrategy::default(),
            http: HttpConfig::default(),
            retry: None,
        }
    }
}

impl Dep2BazelConfig {
    pub fn resolver(&self) -> ResolverConfig {
        ResolverConfig {
            checksum: self.sha256,
            strip_prefix_strategy: self.strip_prefix_strategy,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dep2bazel")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<Dep2BazelConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = Dep2BazelConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path; the file must exist.
pub fn load_from(path: &Path) -> Result<Dep2BazelConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: Dep2BazelConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
