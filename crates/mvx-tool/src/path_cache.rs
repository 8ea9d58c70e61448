//! Path cache keyed by `(tool, resolved-version, distribution)` (spec.md
//! §4.9). All writes go through a single mutex; reads after publish are
//! lock-free clones of an `Arc<PathBuf>`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathCacheKey {
    pub tool: String,
    pub version: String,
    pub distribution: Option<String>,
}

impl PathCacheKey {
    pub fn new(tool: impl Into<String>, version: impl Into<String>, distribution: Option<String>) -> Self {
        Self {
            tool: tool.into(),
            version: version.into(),
            distribution,
        }
    }
}

#[derive(Debug, Default)]
pub struct PathCache {
    entries: Mutex<HashMap<PathCacheKey, Arc<PathBuf>>>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PathCacheKey) -> Option<Arc<PathBuf>> {
        self.entries.lock().expect("path cache mutex poisoned").get(key).cloned()
    }

    pub fn publish(&self, key: PathCacheKey, path: PathBuf) -> Arc<PathBuf> {
        let path = Arc::new(path);
        self.entries
            .lock()
            .expect("path cache mutex poisoned")
            .insert(key, path.clone());
        path
    }

    /// Clear the cached path for a single tool (spec.md §4.9 step 7),
    /// e.g. after uninstall or a failed verification.
    pub fn clear_tool(&self, tool: &str) {
        self.entries
            .lock()
            .expect("path cache mutex poisoned")
            .retain(|key, _| key.tool != tool);
    }
}
