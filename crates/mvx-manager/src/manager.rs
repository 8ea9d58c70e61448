//! `Manager`: the facade spec.md §6 exposes to callers — `ensure_tool`,
//! `ensure_all`, `setup_environment`, `list_installed`, `search_versions` —
//! built via dependency injection (`Manager::new`/`with_http_client`)
//! rather than a process-global singleton, per Design Note §9's resolution,
//! grounded on `vx_core::async_manager::AsyncVxManager`'s bounded
//! `Semaphore` + `FuturesUnordered` worker pool.

use crate::registry;
use crate::version_cache::{spec_key, VersionCache};
use futures_util::stream::{FuturesUnordered, StreamExt};
use mvx_config::RuntimeConfig;
use mvx_env::{compose, ComposedEnv, ToolEnvEntry};
use mvx_platform::Platform;
use mvx_tool::{PathCacheKey, StandardLifecycle, Tool, ToolConfig, ToolError};
use mvx_version::{Version, VersionSpec};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// One tool to install, alongside its per-tool configuration.
#[derive(Debug, Clone)]
pub struct EnsureRequest {
    pub tool: String,
    pub spec: VersionSpec,
    pub config: ToolConfig,
}

impl EnsureRequest {
    pub fn new(tool: impl Into<String>, spec: VersionSpec) -> Self {
        Self {
            tool: tool.into(),
            spec,
            config: ToolConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ToolConfig) -> Self {
        self.config = config;
        self
    }
}

/// A tool version discovered on disk (spec.md §3 `InstalledVersion`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledVersion {
    pub tool: String,
    pub version: String,
    pub distribution: Option<String>,
    pub path: PathBuf,
}

type InFlight = Arc<OnceCell<PathBuf>>;

pub struct Manager {
    config: RuntimeConfig,
    tools: HashMap<String, Arc<dyn Tool>>,
    lifecycle: StandardLifecycle,
    version_cache: VersionCache,
    inflight: Mutex<HashMap<String, InFlight>>,
}

impl Manager {
    /// Build a manager rooted at `config.root`, with its own HTTP client.
    pub fn new(config: RuntimeConfig) -> mvx_installer::Result<Self> {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Build a manager with an injected HTTP client. Each registry still
    /// targets its real upstream host (Foojay, nodejs.org, go.dev); the
    /// injected client only lets callers customize transport-level
    /// behavior (timeouts, TLS, a test `User-Agent`) without touching the
    /// tool adapters themselves.
    pub fn with_http_client(config: RuntimeConfig, client: reqwest::Client) -> mvx_installer::Result<Self> {
        let tools_dir = config.tools_dir();
        let version_cache = VersionCache::load(config.version_cache_path());
        let lifecycle = StandardLifecycle::new(tools_dir)?;
        let tools = registry::build(client);

        Ok(Self {
            config,
            tools,
            lifecycle,
            version_cache,
            inflight: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    fn tool(&self, name: &str) -> Result<&Arc<dyn Tool>, ToolError> {
        self.tools.get(name).ok_or_else(|| ToolError::UnknownTool { name: name.to_string() })
    }

    /// Resolve `spec` against the tool's published versions, consulting
    /// (and updating) the version-resolution cache first.
    async fn resolve_version(&self, tool_name: &str, spec: &VersionSpec, distribution: Option<&str>) -> Result<Version, ToolError> {
        let spec_debug = format!("{spec:?}");
        let key = spec_key(tool_name, &spec_debug, distribution);

        if let Some(cached) = self.version_cache.get(&key) {
            if let Ok(version) = cached.parse::<Version>() {
                return Ok(version);
            }
        }

        let tool = self.tool(tool_name)?;
        let candidates = tool.list_versions().await?;
        let versions: Vec<Version> = candidates.iter().map(|c| c.version.clone()).collect();
        let lts_flags: Vec<bool> = candidates.iter().map(|c| c.lts).collect();

        let resolved = spec
            .resolve(&versions, &lts_flags)
            .map_err(|_| ToolError::VersionResolutionFailed {
                tool: tool_name.to_string(),
                spec: spec_debug.clone(),
            })?
            .clone();

        let exact = matches!(spec, VersionSpec::Exact(_));
        self.version_cache.put(key, resolved.to_string(), exact);

        Ok(resolved)
    }

    /// Idempotent ensure-installed for a single tool (spec.md §4.9, §6).
    /// Concurrent calls for the same resolved `(tool, version, distribution)`
    /// share one in-flight install rather than racing the filesystem.
    pub async fn ensure_tool(&self, request: &EnsureRequest) -> Result<PathBuf, ToolError> {
        let tool = self.tool(&request.tool)?.clone();
        let version = self.resolve_version(&request.tool, &request.spec, request.config.distribution.as_deref()).await?;

        let dedup_key = format!(
            "{}:{}:{}",
            request.tool,
            version,
            request.config.distribution.as_deref().unwrap_or("-")
        );

        let cell = {
            let mut inflight = self.inflight.lock().expect("inflight mutex poisoned");
            inflight.entry(dedup_key.clone()).or_insert_with(|| Arc::new(OnceCell::new())).clone()
        };

        let result = cell
            .get_or_try_init(|| async {
                info!("ensuring {} {}", request.tool, version);
                self.lifecycle.standard_install(tool.as_ref(), &version, &request.config).await
            })
            .await
            .map(|p| p.clone());

        if result.is_err() {
            self.inflight.lock().expect("inflight mutex poisoned").remove(&dedup_key);
        }
        result
    }

    /// Batch ensure, bounded by `config.parallel_downloads` concurrent
    /// workers (spec.md §4.10, env-tunable via `MVX_PARALLEL_DOWNLOADS`).
    /// All requests run; failures are collected into a single
    /// `ToolError::BatchError` once every worker completes.
    pub async fn ensure_all(&self, requests: &[EnsureRequest]) -> Result<Vec<(String, PathBuf)>, ToolError> {
        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.config.parallel_downloads.max(1)));
        let mut futures = FuturesUnordered::new();

        for request in requests {
            let semaphore = semaphore.clone();
            let request = request.clone();
            futures.push(async move {
                let _permit = semaphore.acquire().await.expect("semaphore closed");
                let outcome = self.ensure_tool(&request).await;
                (request.tool, outcome)
            });
        }

        let mut installed = Vec::with_capacity(requests.len());
        let mut errors = Vec::new();
        while let Some((tool, outcome)) = futures.next().await {
            match outcome {
                Ok(path) => installed.push((tool, path)),
                Err(e) => {
                    warn!("failed to ensure {tool}: {e}");
                    errors.push(e);
                }
            }
        }

        if errors.is_empty() {
            Ok(installed)
        } else {
            Err(ToolError::BatchError {
                successes: installed.len(),
                errors,
            })
        }
    }

    /// Compose `*_HOME` vars and a `PATH` prepend for a set of already
    /// resolved installs (spec.md §4.11), consulting the path cache so
    /// callers don't need to re-derive each tool's bin dir.
    pub fn setup_environment(&self, installed: &[(String, PathBuf)]) -> ComposedEnv {
        let platform = Platform::current();
        let entries: Vec<ToolEnvEntry> = installed
            .iter()
            .filter_map(|(name, bin_dir)| {
                let tool = self.tools.get(name)?;
                let home_var = tool.home_env_var().map(|var| {
                    // Most tools' bin dir is `<home>/bin`, but Node on
                    // Windows has no `bin/` subdirectory at all — the
                    // binary sits directly in the install dir, which is
                    // already its own home.
                    let home = if bin_dir.file_name() == Some(std::ffi::OsStr::new("bin")) {
                        bin_dir.parent().map(|p| p.to_path_buf()).unwrap_or_else(|| bin_dir.clone())
                    } else {
                        bin_dir.clone()
                    };
                    (var.to_string(), home)
                });
                Some(ToolEnvEntry {
                    tool: name.clone(),
                    bin_dir: bin_dir.clone(),
                    home_var,
                })
            })
            .collect();

        let current_path = std::env::var_os("PATH");
        compose(&entries, platform.os, current_path.as_ref())
    }

    /// Enumerate `<tools-dir>/<tool>/<version>[@<distribution>]` directories
    /// on disk (spec.md §3 `InstalledVersion`, discovered rather than
    /// tracked separately).
    pub fn list_installed(&self) -> Vec<InstalledVersion> {
        let mut out = Vec::new();
        let tools_dir = self.config.tools_dir();
        let Ok(tool_dirs) = std::fs::read_dir(&tools_dir) else {
            return out;
        };

        for tool_entry in tool_dirs.flatten() {
            let Ok(file_type) = tool_entry.file_type() else { continue };
            if !file_type.is_dir() {
                continue;
            }
            let tool_name = tool_entry.file_name().to_string_lossy().to_string();

            let Ok(version_dirs) = std::fs::read_dir(tool_entry.path()) else { continue };
            for version_entry in version_dirs.flatten() {
                let name = version_entry.file_name().to_string_lossy().to_string();
                if name.starts_with(".tmp-") {
                    continue;
                }
                let (version, distribution) = match name.split_once('@') {
                    Some((v, d)) => (v.to_string(), Some(d.to_string())),
                    None => (name.clone(), None),
                };
                out.push(InstalledVersion {
                    tool: tool_name.clone(),
                    version,
                    distribution,
                    path: version_entry.path(),
                });
            }
        }

        out
    }

    /// List published versions for a tool, for CLI-style `search`.
    pub async fn search_versions(&self, tool_name: &str) -> Result<Vec<mvx_registry::VersionCandidate>, ToolError> {
        self.tool(tool_name)?.list_versions().await
    }

    /// Look up the path-cache entry published by a prior install, without
    /// re-resolving or re-installing anything.
    pub fn cached_path(&self, tool: &str, version: &str, distribution: Option<&str>) -> Option<Arc<PathBuf>> {
        let key = PathCacheKey::new(tool, version, distribution.map(str::to_string));
        self.lifecycle.path_cache().get(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &std::path::Path) -> RuntimeConfig {
        let mut cfg = RuntimeConfig::default();
        cfg.root = dir.to_path_buf();
        cfg
    }

    #[test]
    fn list_installed_parses_distribution_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let manager = Manager::new(config).unwrap();

        let install_dir = dir.path().join("tools").join("java").join("21.0.4@temurin");
        std::fs::create_dir_all(&install_dir).unwrap();

        let installed = manager.list_installed();
        assert_eq!(installed.len(), 1);
        assert_eq!(installed[0].tool, "java");
        assert_eq!(installed[0].version, "21.0.4");
        assert_eq!(installed[0].distribution.as_deref(), Some("temurin"));
    }

    #[test]
    fn list_installed_skips_staging_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let manager = Manager::new(config).unwrap();

        let staging = dir.path().join("tools").join("node").join(".tmp-20.17.0-123");
        std::fs::create_dir_all(&staging).unwrap();

        assert!(manager.list_installed().is_empty());
    }

    #[test]
    fn setup_environment_uses_bin_dir_itself_as_home_without_a_bin_subdir() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let manager = Manager::new(config).unwrap();

        // Node on Windows has no `bin/` subdirectory: node.exe sits
        // directly in the version dir, which is therefore also NODE_HOME.
        let node_root = dir.path().join("tools").join("node").join("20.17.0");
        let installed = vec![("node".to_string(), node_root.clone())];

        let env = manager.setup_environment(&installed);
        assert_eq!(env.vars.get("NODE_HOME").unwrap(), &node_root.display().to_string());
    }

    #[test]
    fn setup_environment_ascends_one_level_when_bin_dir_is_named_bin() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let manager = Manager::new(config).unwrap();

        let java_bin = dir.path().join("tools").join("java").join("21.0.4").join("bin");
        let installed = vec![("java".to_string(), java_bin.clone())];

        let env = manager.setup_environment(&installed);
        assert_eq!(
            env.vars.get("JAVA_HOME").unwrap(),
            &java_bin.parent().unwrap().display().to_string()
        );
    }

    #[test]
    fn ensure_tool_on_unknown_tool_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let manager = Manager::new(config).unwrap();
        assert!(manager.tool("rustc").is_err());
    }
}
