use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;
use serde::{Serialize, Serializer};

/// Integers that fit in 64 bits become JSON numbers, anything wider is
/// written as a decimal string so that no precision is lost.
pub(crate) struct BigIntJson<'a>(pub &'a BigInt);

impl Serialize for BigIntJson<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let Some(x) = self.0.to_i64() {
            return serializer.serialize_i64(x);
        }

        if let Some(x) = self.0.to_u64() {
            return serializer.serialize_u64(x);
        }

        serializer.collect_str(self.0)
    }
}

pub(crate) struct BigUintJson<'a>(pub &'a BigUint);

impl Serialize for BigUintJson<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0.to_u64() {
            Some(x) => serializer.serialize_u64(x),
            None => serializer.collect_str(self.0),
        }
    }
}
