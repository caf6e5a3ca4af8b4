pub use utxodump_cardano::DecodeError;
pub use utxodump_core::*;

use miette::Diagnostic;
use std::fmt::Display;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    #[error("io error: {0}")]
    IO(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    #[diagnostic(help("set it in utxodump.toml, through UTXODUMP_* env vars or with a flag"))]
    ConfigError(String),

    #[error("decode error: {0}")]
    #[diagnostic(help("the dump doesn't match the text format of `cardano-cli query utxo`"))]
    DecodeError(#[from] DecodeError),

    #[error("model error: {0}")]
    ModelError(#[from] ModelError),

    #[error("{0}")]
    Message(String),
}

impl Error {
    pub fn config(text: impl Display) -> Error {
        Error::ConfigError(text.to_string())
    }

    pub fn message(text: impl Into<String>) -> Error {
        Error::Message(text.into())
    }
}
