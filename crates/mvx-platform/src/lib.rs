//! Platform detection and path resolution.
//!
//! Pure, no I/O beyond what's needed to detect the current libc and to walk
//! an install tree looking for a binary.

mod paths;
mod platform;

pub use paths::find_binary_parent_dir;
pub use platform::{Arch, Libc, Os, Platform};
