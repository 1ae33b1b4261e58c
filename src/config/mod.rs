//! Configuration.
//!
//! Command line flags (each also readable from a `RELAY_`-prefixed environment
//! variable) plus an optional JSON file listing more chains, validated once into
//! an immutable [`RelayConfig`].

use thiserror::Error;

use crate::models::ChainId;

mod cli;
pub use cli::*;

mod config_file;
pub use config_file::*;

mod relay_config;
pub use relay_config::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
    #[error("Chain {0} is configured more than once")]
    DuplicateChain(ChainId),
    #[error("At least {required} chains are required, {found} configured")]
    TooFewChains { required: usize, found: usize },
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
    #[error("This is a development build; --unsafe-dev-mode is required to run it")]
    DevBuildRequiresUnsafeDevMode,
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
