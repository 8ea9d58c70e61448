//! Ambient configuration and logging setup: `RuntimeConfig` layers
//! defaults, an optional `mvx.toml`, and `MVX_*` environment variables
//! (spec.md §6), following the teacher's `vx-core::config_figment`
//! defaults→file→env composition.

mod config;
mod error;
mod tracing_init;

pub use config::RuntimeConfig;
pub use error::{ConfigError, Result};
pub use tracing_init::init_tracing;
