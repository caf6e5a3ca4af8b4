use num_bigint::ParseBigIntError;
use thiserror::Error;

use crate::escape::EscapeError;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("missing utxo table header")]
    MissingHeader,

    #[error("malformed utxo table header at line {line}: {text:?}")]
    MalformedHeader { line: usize, text: String },

    #[error("unknown script data discriminator {token:?} at token {index}")]
    UnknownDiscriminator { token: String, index: usize },

    #[error("malformed byte string literal {token:?} at token {index}")]
    MalformedBytes { token: String, index: usize },

    #[error("invalid byte string at token {index}: {source}")]
    InvalidBytes {
        index: usize,
        #[source]
        source: EscapeError,
    },

    #[error("malformed integer {token:?} at token {index}: {source}")]
    MalformedInteger {
        token: String,
        index: usize,
        #[source]
        source: ParseBigIntError,
    },

    #[error("ran out of tokens at {index} while decoding {context}")]
    Underrun { index: usize, context: &'static str },

    #[error("map key at token {index} closes the map without a value")]
    DanglingMapKey { index: usize },

    #[error("unbalanced closing bracket at token {index}")]
    UnbalancedClosers { index: usize },

    #[error("unexpected trailing token {token:?} at {index}")]
    TrailingToken { token: String, index: usize },

    #[error("missing {column} column at token {index}")]
    MissingColumn { column: &'static str, index: usize },

    #[error("malformed {column} column {token:?} at token {index}")]
    MalformedColumn {
        column: &'static str,
        token: String,
        index: usize,
    },

    #[error("expected {expected:?} at token {index}, found {token:?}")]
    UnexpectedToken {
        expected: &'static str,
        token: String,
        index: usize,
    },

    #[error("unknown continuation {token:?} at token {index}")]
    UnknownContinuation { token: String, index: usize },

    #[error("no datum hash found after token {index}")]
    MissingDatumHash { index: usize },

    #[error("malformed asset {token:?} at token {index}")]
    MalformedAsset { token: String, index: usize },

    #[error("inline datum at token {index}: {source}")]
    InlineDatum {
        index: usize,
        #[source]
        source: Box<DecodeError>,
    },

    #[error("line {line} ({text:?}): {source}")]
    Line {
        line: usize,
        text: String,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    pub fn in_line(self, line: usize, text: &str) -> Self {
        DecodeError::Line {
            line,
            text: text.to_string(),
            source: Box::new(self),
        }
    }

    pub fn in_datum(self, index: usize) -> Self {
        DecodeError::InlineDatum {
            index,
            source: Box::new(self),
        }
    }

    /// Strips the line / datum wrappers and returns the error that triggered
    /// the failure.
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::Line { source, .. } => source.root_cause(),
            DecodeError::InlineDatum { source, .. } => source.root_cause(),
            x => x,
        }
    }
}
