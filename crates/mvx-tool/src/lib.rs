//! The `Tool` capability record, its error taxonomy, the path cache, and
//! the standard install lifecycle shared by every per-tool adapter.

mod error;
mod lifecycle;
mod path_cache;
mod tool;

pub use error::{diagnose, Result, ToolError};
pub use lifecycle::StandardLifecycle;
pub use path_cache::{PathCache, PathCacheKey};
pub use tool::{ChecksumInfo, Tool, ToolConfig};
