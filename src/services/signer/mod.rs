//! Relayer signing key.

use std::{io, path::PathBuf};

use thiserror::Error;

mod relayer_key;
pub use relayer_key::*;

#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Failed to read key file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid private key: {0}")]
    Invalid(String),
}
