use std::str::FromStr;

use num_bigint::BigInt;

use utxodump::cardano::{decode_dump, DecodeError, DumpDecoder};
use utxodump::prelude::*;
use utxodump_testing::*;

fn address() -> Address {
    Address::from_bech32(ADDRESS).unwrap()
}

#[test]
fn sample_dump() {
    let utxos = decode_dump(SAMPLE_DUMP, address(), None).unwrap();

    assert_eq!(utxos.len(), 3);

    let refs: Vec<_> = utxos.iter().map(|x| x.reference.to_string()).collect();

    assert_eq!(
        refs,
        vec![
            format!("{SAMPLE_TX}#0"),
            format!("{SAMPLE_TX}#1"),
            format!("{SAMPLE_TX_2}#2"),
        ]
    );

    assert!(utxos.iter().all(|x| x.address.as_str() == ADDRESS));

    assert_eq!(utxos[0].value, Value::lovelace(10_000_000u64));
    assert_eq!(utxos[0].datum, None);

    assert_eq!(
        utxos[1].value.quantity_of(&TestAsset::Hosky.policy(), &TestAsset::Hosky.name()),
        Some(&BigInt::from(100))
    );
    assert_eq!(
        utxos[1].datum,
        Some(Datum::Hash(DatumHash::from_str(SAMPLE_DATUM_HASH).unwrap()))
    );

    assert_eq!(
        utxos[2].value.quantity_of(&TestAsset::Snek.policy(), &TestAsset::Snek.name()),
        Some(&BigInt::from(5))
    );
    assert_eq!(utxos[2].datum, Some(Datum::Inline(sample_inline_datum())));
}

#[test]
fn random_dumps_decode_back() {
    for seed in 0..32 {
        let (dump, expected) = random_dump(seed, 20, &address());

        let decoded = DumpDecoder::new(address()).decode(&dump).unwrap();

        assert_eq!(decoded, expected, "seed {seed}");
    }
}

#[test]
fn parallel_matches_sequential() {
    let (dump, _) = random_dump(99, 200, &address());

    let sequential = DumpDecoder::new(address()).decode(&dump).unwrap();
    let parallel = DumpDecoder::new(address())
        .parallel(true)
        .decode(&dump)
        .unwrap();

    assert_eq!(sequential, parallel);
}

#[test]
fn reference_script_is_shared() {
    let script = ReferenceScript::from_hex("820158").unwrap();
    let (dump, expected) = random_dump(3, 5, &TestAddress::Carol.address());

    let decoded = decode_dump(&dump, TestAddress::Carol.address(), Some(script.clone())).unwrap();

    assert_eq!(decoded, with_reference_script(expected, script));
}

#[test]
fn inline_datum_survives_cbor() {
    let utxos = decode_dump(SAMPLE_DUMP, address(), None).unwrap();

    let Some(Datum::Inline(datum)) = &utxos[2].datum else {
        panic!("expected an inline datum");
    };

    let cbor = datum.to_cbor_hex().unwrap();

    assert_eq!(&Data::from_cbor_hex(&cbor).unwrap(), datum);
}

#[test]
fn json_view() {
    let utxos = decode_dump(SAMPLE_DUMP, address(), None).unwrap();
    let json = serde_json::to_value(&utxos).unwrap();

    assert_eq!(json[0]["value"]["lovelace"], 10_000_000);
    assert_eq!(json[1]["datum"]["hash"], SAMPLE_DATUM_HASH);
    assert_eq!(json[2]["datum"]["inline"]["constructor"], 0);
    assert_eq!(json[2]["datum"]["inline"]["fields"][1]["int"], -42);
}

#[test]
fn broken_line_is_reported() {
    let mut dump = SAMPLE_DUMP.to_string();
    dump.push_str(&format!(
        "{SAMPLE_TX}     3        1 lovelace + TxOutDatumInline BabbageEraOnwardsConway (ScriptDataWeird 1)\n"
    ));

    let err = decode_dump(&dump, address(), None).unwrap_err();

    assert!(matches!(err, DecodeError::Line { line: 6, .. }));
    assert!(matches!(
        err.root_cause(),
        DecodeError::UnknownDiscriminator { token, .. } if token == "ScriptDataWeird"
    ));

    let err = Error::from(err);
    assert!(err.to_string().starts_with("decode error"));
}
