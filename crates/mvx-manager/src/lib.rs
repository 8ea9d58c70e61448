//! Orchestrator facade: tool registration, version-resolution caching,
//! bounded concurrent `ensure_tool`/`ensure_all`, and environment
//! composition (spec.md §2, §4.10, §6).

mod error;
mod manager;
mod registry;
mod version_cache;

pub use error::{ManagerError, Result};
pub use manager::{EnsureRequest, InstalledVersion, Manager};
pub use registry::SUPPORTED_TOOLS;
