//! Error type for CLI commands

use formcraft::store::StoreError;
use formcraft::{ConfigError, FormError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid template file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A template or submission id did not resolve.
    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Invalid(String),

    #[error("{count} required field(s) left empty")]
    Incomplete { count: usize },

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl CliError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}
