use pallas::crypto::hash::Hash;
use thiserror::Error;

mod config;
mod data;
mod json;
mod utxo;
mod value;

/// The hash of a transaction body
pub type TxHash = Hash<32>;

/// The index of an output in a tx
pub type TxoIdx = u32;

/// The hash of a datum referenced by an output
pub type DatumHash = Hash<32>;

/// The hash of a minting policy script
pub type PolicyId = Hash<28>;

pub type AssetName = Vec<u8>;

pub type Cbor = Vec<u8>;

pub use config::*;
pub use data::*;
pub use utxo::*;
pub use value::*;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid utxo reference {0:?}")]
    InvalidTxoRef(String),

    #[error("invalid address {0:?}: {1}")]
    InvalidAddress(String, String),

    #[error("constructor tag {0} can't be represented as cbor")]
    ConstructorOutOfRange(num_bigint::BigUint),

    #[error("unknown constructor cbor tag {0}")]
    UnknownConstructorTag(u64),

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("cbor decode error: {0}")]
    CborDecode(#[from] pallas::codec::minicbor::decode::Error),

    #[error("cbor encode error: {0}")]
    CborEncode(String),
}

impl ModelError {
    pub fn cbor_encode(error: impl std::fmt::Display) -> Self {
        ModelError::CborEncode(error.to_string())
    }
}
