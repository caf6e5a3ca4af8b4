use std::ops::Deref as _;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::ToPrimitive as _;
use pallas::codec::minicbor;
use pallas::codec::utils::{Int, KeyValuePairs, MaybeIndefArray};
use pallas::ledger::primitives::{BigInt as PlutusBigInt, Constr, PlutusData};
use serde::ser::SerializeMap as _;
use serde::{Serialize, Serializer};

use crate::json::{BigIntJson, BigUintJson};
use crate::{Cbor, ModelError};

/// On-chain structured data attached to outputs as datums.
///
/// Maps are kept as ordered pairs: keys aren't required to be unique and the
/// order in which they were found is significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Data {
    Integer(BigInt),
    ByteString(Vec<u8>),
    List(Vec<Data>),
    Map(Vec<(Data, Data)>),
    Constructor { tag: BigUint, fields: Vec<Data> },
}

impl Data {
    pub fn integer(value: impl Into<BigInt>) -> Self {
        Data::Integer(value.into())
    }

    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Data::ByteString(value.into())
    }

    pub fn list(items: Vec<Data>) -> Self {
        Data::List(items)
    }

    pub fn map(pairs: Vec<(Data, Data)>) -> Self {
        Data::Map(pairs)
    }

    pub fn constr(tag: u64, fields: Vec<Data>) -> Self {
        Data::Constructor {
            tag: BigUint::from(tag),
            fields,
        }
    }

    pub fn to_cbor(&self) -> Result<Cbor, ModelError> {
        let plutus = PlutusData::try_from(self)?;
        minicbor::to_vec(&plutus).map_err(ModelError::cbor_encode)
    }

    pub fn to_cbor_hex(&self) -> Result<String, ModelError> {
        self.to_cbor().map(hex::encode)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, ModelError> {
        let plutus: PlutusData = minicbor::decode(bytes)?;
        Data::try_from(&plutus)
    }

    pub fn from_cbor_hex(text: &str) -> Result<Self, ModelError> {
        let bytes = hex::decode(text.trim())?;
        Self::from_cbor(&bytes)
    }
}

fn plutus_integer(value: &BigInt) -> PlutusBigInt {
    if let Some(x) = value.to_i64() {
        return PlutusBigInt::Int(Int::from(x));
    }

    match value.sign() {
        // negative bignums are stored as `-1 - n`
        Sign::Minus => {
            let (_, raw) = (-value - BigInt::from(1)).to_bytes_be();
            PlutusBigInt::BigNInt(raw.into())
        }
        _ => {
            let (_, raw) = value.to_bytes_be();
            PlutusBigInt::BigUInt(raw.into())
        }
    }
}

fn from_plutus_integer(value: &PlutusBigInt) -> BigInt {
    match value {
        PlutusBigInt::Int(x) => BigInt::from(i128::from(*x.deref())),
        PlutusBigInt::BigUInt(bytes) => {
            let raw: Vec<u8> = bytes.clone().into();
            BigInt::from_bytes_be(Sign::Plus, &raw)
        }
        PlutusBigInt::BigNInt(bytes) => {
            let raw: Vec<u8> = bytes.clone().into();
            -BigInt::from_bytes_be(Sign::Plus, &raw) - BigInt::from(1)
        }
    }
}

fn plutus_array(items: Vec<PlutusData>) -> MaybeIndefArray<PlutusData> {
    if items.is_empty() {
        MaybeIndefArray::Def(items)
    } else {
        MaybeIndefArray::Indef(items)
    }
}

fn plutus_constr(ix: u64, fields: Vec<PlutusData>) -> PlutusData {
    // NOTE: see https://github.com/input-output-hk/plutus/blob/9538fc9829426b2ecb0628d352e2d7af96ec8204/plutus-core/plutus-core/src/PlutusCore/Data.hs#L139-L155
    let fields = plutus_array(fields);

    if ix < 7 {
        PlutusData::Constr(Constr {
            tag: 121 + ix,
            any_constructor: None,
            fields,
        })
    } else if ix < 128 {
        PlutusData::Constr(Constr {
            tag: 1280 + ix - 7,
            any_constructor: None,
            fields,
        })
    } else {
        PlutusData::Constr(Constr {
            tag: 102,
            any_constructor: Some(ix),
            fields,
        })
    }
}

impl TryFrom<&Data> for PlutusData {
    type Error = ModelError;

    fn try_from(value: &Data) -> Result<Self, Self::Error> {
        let out = match value {
            Data::Integer(x) => PlutusData::BigInt(plutus_integer(x)),
            Data::ByteString(x) => PlutusData::BoundedBytes(x.clone().into()),
            Data::List(items) => {
                let items = items
                    .iter()
                    .map(PlutusData::try_from)
                    .collect::<Result<Vec<_>, _>>()?;

                PlutusData::Array(plutus_array(items))
            }
            Data::Map(pairs) => {
                let pairs = pairs
                    .iter()
                    .map(|(k, v)| Ok((PlutusData::try_from(k)?, PlutusData::try_from(v)?)))
                    .collect::<Result<Vec<_>, ModelError>>()?;

                PlutusData::Map(KeyValuePairs::Def(pairs))
            }
            Data::Constructor { tag, fields } => {
                let ix = tag
                    .to_u64()
                    .ok_or_else(|| ModelError::ConstructorOutOfRange(tag.clone()))?;

                let fields = fields
                    .iter()
                    .map(PlutusData::try_from)
                    .collect::<Result<Vec<_>, _>>()?;

                plutus_constr(ix, fields)
            }
        };

        Ok(out)
    }
}

impl TryFrom<&PlutusData> for Data {
    type Error = ModelError;

    fn try_from(value: &PlutusData) -> Result<Self, Self::Error> {
        let out = match value {
            PlutusData::Constr(constr) => {
                let ix = constr
                    .constructor_value()
                    .ok_or(ModelError::UnknownConstructorTag(constr.tag))?;

                let fields = constr
                    .fields
                    .iter()
                    .map(Data::try_from)
                    .collect::<Result<Vec<_>, _>>()?;

                Data::Constructor {
                    tag: BigUint::from(ix),
                    fields,
                }
            }
            PlutusData::Map(kvs) => {
                let pairs = kvs
                    .iter()
                    .map(|(k, v)| Ok((Data::try_from(k)?, Data::try_from(v)?)))
                    .collect::<Result<Vec<_>, ModelError>>()?;

                Data::Map(pairs)
            }
            PlutusData::BigInt(x) => Data::Integer(from_plutus_integer(x)),
            PlutusData::BoundedBytes(x) => Data::ByteString(x.clone().into()),
            PlutusData::Array(items) => {
                let items = items
                    .iter()
                    .map(Data::try_from)
                    .collect::<Result<Vec<_>, _>>()?;

                Data::List(items)
            }
        };

        Ok(out)
    }
}

#[derive(Serialize)]
struct MapEntry<'a> {
    k: &'a Data,
    v: &'a Data,
}

/// Serializes using the detailed JSON schema understood by cardano tooling.
impl Serialize for Data {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;

        match self {
            Data::Integer(x) => map.serialize_entry("int", &BigIntJson(x))?,
            Data::ByteString(x) => map.serialize_entry("bytes", &hex::encode(x))?,
            Data::List(items) => map.serialize_entry("list", items)?,
            Data::Map(pairs) => {
                let entries: Vec<_> = pairs.iter().map(|(k, v)| MapEntry { k, v }).collect();
                map.serialize_entry("map", &entries)?;
            }
            Data::Constructor { tag, fields } => {
                map.serialize_entry("constructor", &BigUintJson(tag))?;
                map.serialize_entry("fields", fields)?;
            }
        }

        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Data {
        Data::constr(
            0,
            vec![
                Data::constr(1, vec![]),
                Data::map(vec![
                    (Data::integer(1), Data::bytes(vec![2])),
                    (Data::bytes(vec![3]), Data::integer(4)),
                ]),
                Data::list(vec![Data::integer(42)]),
            ],
        )
    }

    #[test]
    fn constructor_tags_follow_plutus_encoding() {
        let cases = [
            (0, 121, None),
            (6, 127, None),
            (7, 1280, None),
            (127, 1400, None),
            (128, 102, Some(128)),
        ];

        for (ix, tag, any) in cases {
            let plutus = PlutusData::try_from(&Data::constr(ix, vec![])).unwrap();

            let PlutusData::Constr(constr) = &plutus else {
                panic!("expected a constructor");
            };

            assert_eq!(constr.tag, tag);
            assert_eq!(constr.any_constructor, any);
            assert_eq!(Data::try_from(&plutus).unwrap(), Data::constr(ix, vec![]));
        }
    }

    #[test]
    fn constructor_tag_out_of_range() {
        let data = Data::Constructor {
            tag: BigUint::from(u64::MAX) + 1u32,
            fields: vec![],
        };

        assert!(matches!(
            PlutusData::try_from(&data),
            Err(ModelError::ConstructorOutOfRange(_))
        ));
    }

    #[test]
    fn unknown_constructor_tag_is_an_error() {
        let plutus = PlutusData::Constr(Constr {
            tag: 200,
            any_constructor: None,
            fields: MaybeIndefArray::Def(vec![]),
        });

        assert!(matches!(
            Data::try_from(&plutus),
            Err(ModelError::UnknownConstructorTag(200))
        ));

        let nested = PlutusData::Array(MaybeIndefArray::Indef(vec![plutus]));

        assert!(matches!(
            Data::try_from(&nested),
            Err(ModelError::UnknownConstructorTag(200))
        ));
    }

    #[test]
    fn known_cbor_vectors() {
        assert_eq!(Data::constr(0, vec![]).to_cbor_hex().unwrap(), "d87980");
        assert_eq!(Data::integer(1).to_cbor_hex().unwrap(), "01");
        assert_eq!(
            Data::list(vec![Data::integer(1)]).to_cbor_hex().unwrap(),
            "9f01ff"
        );
        assert_eq!(Data::bytes(vec![0xca, 0xfe]).to_cbor_hex().unwrap(), "42cafe");
    }

    #[test]
    fn cbor_round_trip() {
        let data = sample();
        let cbor = data.to_cbor_hex().unwrap();
        assert_eq!(Data::from_cbor_hex(&cbor).unwrap(), data);
    }

    #[test]
    fn wide_integers_survive_plutus_conversion() {
        let values = [
            "18446744073709551616",
            "-18446744073709551617",
            "9223372036854775808",
            "-9223372036854775809",
            "123456789012345678901234567890",
        ];

        for value in values {
            let data = Data::Integer(value.parse().unwrap());
            let plutus = PlutusData::try_from(&data).unwrap();
            assert_eq!(Data::try_from(&plutus).unwrap(), data, "{value}");
        }
    }

    #[test]
    fn invalid_cbor_hex() {
        assert!(matches!(
            Data::from_cbor_hex("zz"),
            Err(ModelError::InvalidHex(_))
        ));
        assert!(matches!(
            Data::from_cbor_hex("ff"),
            Err(ModelError::CborDecode(_))
        ));
    }

    #[test]
    fn detailed_json_schema() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "constructor": 0,
                "fields": [
                    { "constructor": 1, "fields": [] },
                    { "map": [
                        { "k": { "int": 1 }, "v": { "bytes": "02" } },
                        { "k": { "bytes": "03" }, "v": { "int": 4 } },
                    ]},
                    { "list": [{ "int": 42 }] },
                ]
            })
        );
    }
}
