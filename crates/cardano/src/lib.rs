//! Decoder for the text output of `cardano-cli query utxo`.
//!
//! The pipeline goes from a raw dump to [`utxodump_core::Utxo`] values:
//!
//! 1. [`tokenize`] splits lines into columns without breaking byte-string
//!    literals apart.
//! 2. [`escape`] turns the Haskell-escaped literals back into bytes.
//! 3. [`data`] rebuilds inline datums from their `ScriptData` rendering.
//! 4. [`utxo`] assembles the outputs, one per line.

mod error;

pub mod data;
pub mod escape;
pub mod tokenize;
pub mod utxo;

pub use data::{decode_data, parse_data, parse_data_text, Decoded, Step};
pub use error::DecodeError;
pub use escape::{decode_escaped, EscapeError};
pub use utxo::{decode_dump, DumpDecoder};
