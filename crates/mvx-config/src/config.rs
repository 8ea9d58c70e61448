//! Ambient `RuntimeConfig`: defaults layered with an optional `mvx.toml`
//! and `MVX_*` environment variables, mirroring the teacher's
//! `vx-core::config_figment` defaults→file→env approach (spec.md §6).
//!
//! Per-tool overrides (`MVX_USE_SYSTEM_<TOOL>`, `MVX_<TOOL>_VERSION`) are
//! read directly by callers at the point of use rather than modeled here,
//! since their key names are dynamic per tool.

use crate::error::Result;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root directory mvx installs tools under; defaults to `<home>/.mvx`.
fn default_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mvx")
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_parallel_downloads() -> usize {
    3
}

fn default_min_file_size() -> u64 {
    1024
}

fn default_max_file_size() -> u64 {
    2 * 1024 * 1024 * 1024
}

fn default_timeout_secs() -> u64 {
    120
}

/// Ambient configuration for the tool lifecycle engine (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// `<root>/tools/<tool>/<version>[@<distribution>]` install layout root.
    pub root: PathBuf,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_parallel_downloads")]
    pub parallel_downloads: usize,
    #[serde(default = "default_min_file_size")]
    pub min_file_size: u64,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    #[serde(default = "default_timeout_secs")]
    pub download_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub registry_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub checksum_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub tls_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub response_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub idle_timeout_secs: u64,

    pub verbose: bool,
    pub no_color: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            parallel_downloads: default_parallel_downloads(),
            min_file_size: default_min_file_size(),
            max_file_size: default_max_file_size(),
            download_timeout_secs: default_timeout_secs(),
            registry_timeout_secs: default_timeout_secs(),
            checksum_timeout_secs: default_timeout_secs(),
            tls_timeout_secs: default_timeout_secs(),
            response_timeout_secs: default_timeout_secs(),
            idle_timeout_secs: default_timeout_secs(),
            verbose: false,
            no_color: false,
        }
    }
}

impl RuntimeConfig {
    /// Layer defaults, an optional `mvx.toml` in the current directory, and
    /// `MVX_*` environment variables (later wins), per spec.md §6's named
    /// `MVX_DOWNLOAD_TIMEOUT`/`MVX_MAX_RETRIES`/`MVX_PARALLEL_DOWNLOADS`/
    /// `MVX_VERBOSE`/etc. knobs.
    pub fn load() -> Result<Self> {
        Self::build_figment().extract().map_err(Into::into)
    }

    /// Same layering, reading `mvx.toml` from an explicit directory instead
    /// of the process's current directory (used in tests).
    pub fn load_from(dir: &std::path::Path) -> Result<Self> {
        Self::build_figment_at(dir).extract().map_err(Into::into)
    }

    pub fn tools_dir(&self) -> PathBuf {
        self.root.join("tools")
    }

    pub fn version_cache_path(&self) -> PathBuf {
        self.root.join("version_cache.json")
    }

    pub fn download_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.download_timeout_secs)
    }

    pub fn retry_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.retry_delay_ms)
    }

    fn build_figment() -> Figment {
        Self::build_figment_at(&std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    fn build_figment_at(dir: &std::path::Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(RuntimeConfig::default()));

        let project_file = dir.join("mvx.toml");
        if project_file.exists() {
            figment = figment.merge(Toml::file(project_file));
        }

        figment = figment
            .merge(Env::prefixed("MVX_").map(|key| match key.as_str() {
                "DOWNLOAD_TIMEOUT" => "download_timeout_secs".into(),
                "REGISTRY_TIMEOUT" => "registry_timeout_secs".into(),
                "CHECKSUM_TIMEOUT" => "checksum_timeout_secs".into(),
                "TLS_TIMEOUT" => "tls_timeout_secs".into(),
                "RESPONSE_TIMEOUT" => "response_timeout_secs".into(),
                "IDLE_TIMEOUT" => "idle_timeout_secs".into(),
                "MAX_RETRIES" => "max_retries".into(),
                "RETRY_DELAY" => "retry_delay_ms".into(),
                "PARALLEL_DOWNLOADS" => "parallel_downloads".into(),
                "MIN_FILE_SIZE" => "min_file_size".into(),
                "MAX_FILE_SIZE" => "max_file_size".into(),
                "VERBOSE" => "verbose".into(),
                "NO_COLOR" => "no_color".into(),
                "ROOT" => "root".into(),
                other => other.into(),
            }));

        figment
    }
}
