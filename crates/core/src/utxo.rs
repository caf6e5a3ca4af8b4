use std::{fmt::Display, str::FromStr, sync::Arc};

use serde::{Serialize, Serializer};
use serde_with::{serde_as, DisplayFromStr};

use crate::{Cbor, Data, DatumHash, ModelError, TxHash, TxoIdx, Value};

#[derive(Debug, Eq, PartialEq, Hash, Clone, PartialOrd, Ord)]
pub struct TxoRef(pub TxHash, pub TxoIdx);

impl Display for TxoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.0, self.1)
    }
}

/// Parses the `<tx hash>#<index>` form used by `--tx-in` style arguments.
impl FromStr for TxoRef {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidTxoRef(s.to_string());

        let (hash, index) = s.split_once('#').ok_or_else(invalid)?;

        if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let hash = TxHash::from_str(&hash.to_ascii_lowercase()).map_err(|_| invalid())?;
        let index = index.parse::<TxoIdx>().map_err(|_| invalid())?;

        Ok(TxoRef(hash, index))
    }
}

/// Address an output belongs to.
///
/// The dump doesn't carry addresses, so this is always supplied by whoever
/// issued the query. Only the bech32 text is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn from_bech32(text: &str) -> Result<Self, ModelError> {
        pallas::ledger::addresses::Address::from_bech32(text)
            .map_err(|err| ModelError::InvalidAddress(text.to_string(), err.to_string()))?;

        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque script attached to outputs as a reference script.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceScript(pub Cbor);

impl ReferenceScript {
    pub fn from_hex(text: &str) -> Result<Self, ModelError> {
        Ok(Self(hex::decode(text.trim())?))
    }
}

impl Serialize for ReferenceScript {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Datum {
    /// The datum is supplied elsewhere, only its hash is on the output
    Hash(#[serde_as(as = "DisplayFromStr")] DatumHash),

    /// The datum is fully present in the output
    Inline(Data),
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Utxo {
    #[serde_as(as = "DisplayFromStr")]
    pub reference: TxoRef,
    pub address: Address,
    pub value: Value,
    pub datum: Option<Datum>,
    pub reference_script: Option<Arc<ReferenceScript>>,
}
