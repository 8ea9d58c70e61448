use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("could not parse version string: {0:?}")]
    InvalidVersion(String),

    #[error("could not parse version spec: {0:?}")]
    InvalidSpec(String),

    #[error("no candidate version matches spec {spec:?}")]
    NoMatch { spec: String },
}
