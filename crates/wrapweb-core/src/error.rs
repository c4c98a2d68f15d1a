use thiserror::Error;

#[derive(Debug, Error)]
pub enum WrapError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("wrap generation failed: {0}")]
    GenerationFailed(String),

    #[error(transparent)]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, WrapError>;
