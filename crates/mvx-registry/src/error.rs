use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("could not parse response from {source}: {reason}")]
    Parse { source: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RegistryError>;
