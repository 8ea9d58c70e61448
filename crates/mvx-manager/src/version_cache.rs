//! Version-resolution cache: `{spec-key -> {resolved, timestamp}}`,
//! persisted as `version_cache.json` (spec.md §3, §6).
//!
//! TTL is 24h for an exact-version spec and 1h for a non-exact one
//! (`latest`/`lts`/range/major-only), resolving spec.md's Open Question
//! about `Latest`/`Lts` entries aging past visible upstream releases
//! (documented in DESIGN.md).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

const EXACT_TTL_SECS: u64 = 24 * 60 * 60;
const NON_EXACT_TTL_SECS: u64 = 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    pub resolved: String,
    pub timestamp: u64,
    pub exact: bool,
}

/// Build the `tool:spec:distribution` spec-key spec.md §3 names.
pub fn spec_key(tool: &str, spec_debug: &str, distribution: Option<&str>) -> String {
    format!("{tool}:{spec_debug}:{}", distribution.unwrap_or("-"))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub struct VersionCache {
    path: PathBuf,
    entries: RwLock<HashMap<String, CacheRecord>>,
}

impl VersionCache {
    /// Load from disk, dropping any entry already past its TTL (spec.md
    /// §9: "entries older than 24h at load time are absent").
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let raw: HashMap<String, CacheRecord> = std::fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        let now = now_secs();
        let fresh: HashMap<String, CacheRecord> = raw
            .into_iter()
            .filter(|(_, record)| !is_stale(record, now))
            .collect();

        Self {
            path,
            entries: RwLock::new(fresh),
        }
    }

    /// Return the cached resolution for `key` if present and still fresh.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = now_secs();
        let entries = self.entries.read().expect("version cache lock poisoned");
        entries
            .get(key)
            .filter(|record| !is_stale(record, now))
            .map(|record| record.resolved.clone())
    }

    /// Record a resolution and persist best-effort (spec.md §4.9:
    /// "coalesce: last writer wins, no file-locking required").
    pub fn put(&self, key: String, resolved: String, exact: bool) {
        let record = CacheRecord {
            resolved,
            timestamp: now_secs(),
            exact,
        };
        {
            let mut entries = self.entries.write().expect("version cache lock poisoned");
            entries.insert(key, record);
        }
        self.persist();
    }

    fn persist(&self) {
        let entries = self.entries.read().expect("version cache lock poisoned");
        if let Ok(json) = serde_json::to_string_pretty(&*entries) {
            if let Some(parent) = self.path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = std::fs::write(&self.path, json);
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn is_stale(record: &CacheRecord, now: u64) -> bool {
    let ttl = if record.exact { EXACT_TTL_SECS } else { NON_EXACT_TTL_SECS };
    now.saturating_sub(record.timestamp) > ttl
}
