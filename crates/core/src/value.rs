use std::collections::BTreeMap;

use num_bigint::{BigInt, BigUint};
use serde::ser::SerializeMap as _;
use serde::{Serialize, Serializer};

use crate::json::{BigIntJson, BigUintJson};
use crate::{AssetName, PolicyId};

/// A multi-asset amount: lovelace plus any number of native assets.
///
/// Asset quantities are signed so that burn deltas can be represented.
/// Adding the same policy / asset name pair twice accumulates the quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Value {
    pub lovelace: BigUint,
    pub assets: BTreeMap<PolicyId, BTreeMap<AssetName, BigInt>>,
}

impl Value {
    pub fn lovelace(amount: impl Into<BigUint>) -> Self {
        Self {
            lovelace: amount.into(),
            assets: Default::default(),
        }
    }

    pub fn add_asset(&mut self, policy: PolicyId, name: AssetName, quantity: impl Into<BigInt>) {
        let entry = self
            .assets
            .entry(policy)
            .or_default()
            .entry(name)
            .or_default();

        *entry += quantity.into();
    }

    pub fn quantity_of(&self, policy: &PolicyId, name: &[u8]) -> Option<&BigInt> {
        self.assets.get(policy)?.get(name)
    }

    /// Iterates every asset entry as a flat `(policy, name, quantity)` tuple.
    pub fn assets(&self) -> impl Iterator<Item = (&PolicyId, &AssetName, &BigInt)> {
        self.assets
            .iter()
            .flat_map(|(policy, names)| names.iter().map(move |(name, qty)| (policy, name, qty)))
    }

    pub fn is_lovelace_only(&self) -> bool {
        self.assets.is_empty()
    }
}

struct AssetsJson<'a>(&'a BTreeMap<AssetName, BigInt>);

impl Serialize for AssetsJson<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;

        for (name, quantity) in self.0 {
            map.serialize_entry(&hex::encode(name), &BigIntJson(quantity))?;
        }

        map.end()
    }
}

/// Serializes as `{ "lovelace": n, "<policy>": { "<name hex>": n } }`, the
/// shape `cardano-cli` uses for its JSON output.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.assets.len() + 1))?;

        map.serialize_entry("lovelace", &BigUintJson(&self.lovelace))?;

        for (policy, names) in &self.assets {
            map.serialize_entry(&policy.to_string(), &AssetsJson(names))?;
        }

        map.end()
    }
}
