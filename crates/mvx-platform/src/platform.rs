//! OS/arch/libc detection and vendor-specific naming tables.

use serde::{Deserialize, Serialize};

/// C library implementation, relevant for Linux package selection (Java's
/// glibc vs musl `.tar.gz` preference order, spec.md §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Libc {
    #[default]
    Gnu,
    Musl,
}

impl Libc {
    /// Detect the current libc implementation.
    ///
    /// Checks `MVX_LIBC` for an explicit override first (useful in
    /// containers where `/etc/os-release` sniffing is unreliable), then
    /// falls back to inspecting `/etc/os-release` and the musl dynamic
    /// linker's well-known path.
    pub fn current() -> Self {
        if std::env::var("MVX_LIBC").ok().as_deref() == Some("musl") {
            return Libc::Musl;
        }
        if !cfg!(target_os = "linux") {
            return Libc::Gnu;
        }
        if let Ok(content) = std::fs::read_to_string("/etc/os-release") {
            if content.to_lowercase().contains("alpine") {
                return Libc::Musl;
            }
        }
        if std::path::Path::new("/lib/ld-musl-x86_64.so.1").exists()
            || std::path::Path::new("/lib/ld-musl-aarch64.so.1").exists()
        {
            return Libc::Musl;
        }
        Libc::Gnu
    }

    pub fn as_str(&self) -> &str {
        match self {
            Libc::Gnu => "gnu",
            Libc::Musl => "musl",
        }
    }

    pub fn is_musl(&self) -> bool {
        matches!(self, Libc::Musl)
    }
}

impl std::fmt::Display for Libc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Os {
    Windows,
    MacOS,
    Linux,
    Other,
}

impl Os {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Os::Windows
        } else if cfg!(target_os = "macos") {
            Os::MacOS
        } else if cfg!(target_os = "linux") {
            Os::Linux
        } else {
            Os::Other
        }
    }

    /// Canonical lowercase name, matching most upstream URL schemes
    /// (Node, Go). Apache/mvnd archives don't encode the OS at all.
    pub fn as_str(&self) -> &str {
        match self {
            Os::Windows => "windows",
            Os::MacOS => "darwin",
            Os::Linux => "linux",
            Os::Other => "unknown",
        }
    }

    pub fn exe_suffix(&self) -> &str {
        match self {
            Os::Windows => ".exe",
            _ => "",
        }
    }

    /// `.cmd` suffix used by some Node-ecosystem wrapper scripts (npm, mvnd
    /// on Windows ships `mvnd.cmd` alongside `mvnd`).
    pub fn script_suffix(&self) -> &str {
        match self {
            Os::Windows => ".cmd",
            _ => "",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arch {
    Amd64,
    Arm64,
    X86,
    Other,
}

impl Arch {
    pub fn current() -> Self {
        if cfg!(target_arch = "x86_64") {
            Arch::Amd64
        } else if cfg!(target_arch = "aarch64") {
            Arch::Arm64
        } else if cfg!(target_arch = "x86") {
            Arch::X86
        } else {
            Arch::Other
        }
    }

    /// Generic (Go/Docker-style) arch name: `amd64`, `arm64`.
    pub fn as_str(&self) -> &str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
            Arch::X86 => "386",
            Arch::Other => "unknown",
        }
    }

    /// Foojay (Java) arch naming: `x64`, `aarch64`.
    pub fn foojay_str(&self) -> &str {
        match self {
            Arch::Amd64 => "x64",
            Arch::Arm64 => "aarch64",
            Arch::X86 => "x86",
            Arch::Other => "unknown",
        }
    }

    /// Node.js dist naming: `x64`, `arm64`.
    pub fn node_str(&self) -> &str {
        match self {
            Arch::Amd64 => "x64",
            Arch::Arm64 => "arm64",
            Arch::X86 => "x86",
            Arch::Other => "unknown",
        }
    }

    /// Apache mvnd naming: uses `amd64`/`aarch64`.
    pub fn mvnd_str(&self) -> &str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "aarch64",
            Arch::X86 => "x86",
            Arch::Other => "unknown",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The current platform triple (os, arch, libc).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
    pub libc: Libc,
}

impl Platform {
    pub fn current() -> Self {
        Self {
            os: Os::current(),
            arch: Arch::current(),
            libc: Libc::current(),
        }
    }

    pub fn exe_name(&self, base: &str) -> String {
        format!("{base}{}", self.os.exe_suffix())
    }

    pub fn script_name(&self, base: &str) -> String {
        format!("{base}{}", self.os.script_suffix())
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}
