//! Environment composition: `*_HOME` variables plus a deterministic
//! `PATH` prepend, built via structured operations rather than generic
//! string concatenation (spec.md §4.11).

use mvx_platform::Os;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;

/// One resolved tool's contribution to the composed environment.
#[derive(Debug, Clone)]
pub struct ToolEnvEntry {
    pub tool: String,
    pub bin_dir: PathBuf,
    pub home_var: Option<(String, PathBuf)>,
}

/// The result of composing an environment: `HOME`-style vars plus the
/// final `PATH` string, ready to hand to a child process.
#[derive(Debug, Clone, Default)]
pub struct ComposedEnv {
    pub vars: BTreeMap<String, String>,
    pub path: String,
}

/// Split the platform's `PATH` separator (`;` on Windows, `:` elsewhere).
fn path_separator(os: Os) -> char {
    if os == Os::Windows {
        ';'
    } else {
        ':'
    }
}

/// Compose a new environment from a list of resolved tool entries and the
/// process's current environment. Entries are prepended to `PATH` in the
/// order given (spec.md §4.11: "order is configuration-dictated and
/// stable").
pub fn compose(entries: &[ToolEnvEntry], os: Os, current_path: Option<&OsString>) -> ComposedEnv {
    let sep = path_separator(os);
    let mut vars = BTreeMap::new();

    let mut prepend: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        prepend.push(entry.bin_dir.display().to_string());
        if let Some((var, home)) = &entry.home_var {
            vars.insert(var.clone(), home.display().to_string());
        }
    }

    let existing = current_path
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut segments: Vec<String> = Vec::with_capacity(prepend.len() + 1);
    segments.extend(prepend);
    if !existing.is_empty() {
        segments.push(existing);
    }

    let path = segments
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(&sep.to_string());

    ComposedEnv { vars, path }
}
