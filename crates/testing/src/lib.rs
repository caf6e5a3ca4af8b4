use std::{fmt::Write as _, str::FromStr, sync::Arc};

use num_bigint::BigInt;
use pallas::crypto::hash::Hash;
use rand::{rngs::StdRng, Rng, SeedableRng};

use utxodump_core::*;

/// A Shelley address with only a payment part, handy as a default.
pub const ADDRESS: &str = "addr1vx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzers66hrl8";

pub const ADDRESS_TEST_VECTORS: [&str; 3] = [
    // a Shelley address with both payment and stake parts
    "addr1q9dhugez3ka82k2kgh7r2lg0j7aztr8uell46kydfwu3vk6n8w2cdu8mn2ha278q6q25a9rc6gmpfeekavuargcd32vsvxhl7e",
    // a Shelley address with only payment part
    ADDRESS,
    // a Shelley script address
    "addr1w9jx45flh83z6wuqypyash54mszwmdj8r64fydafxtfc6jgrw4rm3",
];

#[derive(Clone, Copy, Debug)]
pub enum TestAddress {
    Alice,
    Bob,
    Carol,
}

impl TestAddress {
    pub fn as_str(&self) -> &'static str {
        ADDRESS_TEST_VECTORS[*self as usize]
    }

    pub fn address(&self) -> Address {
        Address::from_bech32(self.as_str()).unwrap()
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestAsset {
    Hosky,
    Snek,
    NikePig,
}

impl TestAsset {
    pub fn all() -> [Self; 3] {
        [TestAsset::Hosky, TestAsset::Snek, TestAsset::NikePig]
    }

    pub fn policy_hex(&self) -> &'static str {
        match self {
            TestAsset::Hosky => "a0028f350aaabe0545fdcb56b039bfb08e4bb4d8c4d7c3c7d481c235",
            TestAsset::Snek => "279c909f348e533da5808898f87f9a14bb2c3dfbbacccd631d927a3f",
            TestAsset::NikePig => "c881c20e49dbaca3ff6cef365969354150983230c39520b917f5cf7c",
        }
    }

    pub fn ticker(&self) -> &'static str {
        match self {
            TestAsset::Hosky => "HOSKY",
            TestAsset::Snek => "SNEK",
            TestAsset::NikePig => "NIKEPIG",
        }
    }

    pub fn name(&self) -> Vec<u8> {
        self.ticker().as_bytes().to_vec()
    }

    pub fn policy(&self) -> PolicyId {
        Hash::from_str(self.policy_hex()).unwrap()
    }
}

pub const SAMPLE_TX: &str = "39a7a284c2a0948189dc45dec670211cd4d72f7b66c5726c08d9b3df11e44d58";
pub const SAMPLE_TX_2: &str = "64d3b2fddfb4a947ab51977af6e80df610ffcbd03f966a7275a9aaccfae56160";
pub const SAMPLE_DATUM_HASH: &str =
    "923918e403bf43c34b4ef6b48eb2ee04babed17320d8d1b9ff9ad086e86f44ec";

/// Three outputs: lovelace only, an asset with a datum hash, an asset with an
/// inline datum (see [`sample_inline_datum`]).
pub const SAMPLE_DUMP: &str = r#"                           TxHash                                 TxIx        Amount
--------------------------------------------------------------------------------------
39a7a284c2a0948189dc45dec670211cd4d72f7b66c5726c08d9b3df11e44d58     0        10000000 lovelace + TxOutDatumNone
39a7a284c2a0948189dc45dec670211cd4d72f7b66c5726c08d9b3df11e44d58     1        1500000 lovelace + 100 a0028f350aaabe0545fdcb56b039bfb08e4bb4d8c4d7c3c7d481c235.484f534b59 + TxOutDatumHash ScriptDataInBabbageEra "923918e403bf43c34b4ef6b48eb2ee04babed17320d8d1b9ff9ad086e86f44ec"
64d3b2fddfb4a947ab51977af6e80df610ffcbd03f966a7275a9aaccfae56160     2        2000000 lovelace + 5 279c909f348e533da5808898f87f9a14bb2c3dfbbacccd631d927a3f.534e454b + TxOutDatumInline BabbageEraOnwardsConway (ScriptDataConstructor 0 [ScriptDataBytes "\222\173\190\239",ScriptDataNumber (-42),ScriptDataMap [(ScriptDataBytes "k, v",ScriptDataList [])]])
"#;

/// The datum carried by the last output of [`SAMPLE_DUMP`].
pub fn sample_inline_datum() -> Data {
    Data::constr(
        0,
        vec![
            Data::bytes(vec![0xde, 0xad, 0xbe, 0xef]),
            Data::integer(-42),
            Data::map(vec![(Data::bytes(b"k, v".to_vec()), Data::list(vec![]))]),
        ],
    )
}

const CONTROL_NAMES: [&str; 32] = [
    "NUL", "SOH", "STX", "ETX", "EOT", "ENQ", "ACK", "a", "b", "t", "n", "v", "f", "r", "SO", "SI",
    "DLE", "DC1", "DC2", "DC3", "DC4", "NAK", "SYN", "ETB", "CAN", "EM", "SUB", "ESC", "FS", "GS",
    "RS", "US",
];

/// Escapes bytes the way Haskell's `show` prints a `ByteString`, without the
/// surrounding quotes.
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::new();

    for (i, byte) in bytes.iter().copied().enumerate() {
        let next = bytes.get(i + 1).copied();

        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0..=31 => {
                out.push('\\');
                out.push_str(CONTROL_NAMES[byte as usize]);

                if byte == 14 && next == Some(b'H') {
                    out.push_str("\\&");
                }
            }
            32..=126 => out.push(byte as char),
            127 => out.push_str("\\DEL"),
            _ => {
                let _ = write!(out, "\\{byte}");

                if next.is_some_and(|x| x.is_ascii_digit()) {
                    out.push_str("\\&");
                }
            }
        }
    }

    out
}

fn render_integer(value: &BigInt, out: &mut String) {
    if value.sign() == num_bigint::Sign::Minus {
        let _ = write!(out, "({value})");
    } else {
        let _ = write!(out, "{value}");
    }
}

fn render_items<'a>(items: impl Iterator<Item = &'a Data>, out: &mut String) {
    out.push('[');

    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push(',');
        }

        render_into(item, out);
    }

    out.push(']');
}

fn render_into(data: &Data, out: &mut String) {
    match data {
        Data::Integer(x) => {
            out.push_str("ScriptDataNumber ");
            render_integer(x, out);
        }
        Data::ByteString(x) => {
            let _ = write!(out, "ScriptDataBytes \"{}\"", escape_bytes(x));
        }
        Data::List(items) => {
            out.push_str("ScriptDataList ");
            render_items(items.iter(), out);
        }
        Data::Map(pairs) => {
            out.push_str("ScriptDataMap [");

            for (i, (key, value)) in pairs.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }

                out.push('(');
                render_into(key, out);
                out.push(',');
                render_into(value, out);
                out.push(')');
            }

            out.push(']');
        }
        Data::Constructor { tag, fields } => {
            let _ = write!(out, "ScriptDataConstructor {tag} ");
            render_items(fields.iter(), out);
        }
    }
}

/// Renders a value the way `cardano-cli` shows script data.
pub fn render_data(data: &Data) -> String {
    let mut out = String::new();
    render_into(data, &mut out);
    out
}

/// Renders an output as one line of the `query utxo` table.
pub fn render_line(utxo: &Utxo) -> String {
    let mut out = format!(
        "{}     {}        {} lovelace",
        utxo.reference.0, utxo.reference.1, utxo.value.lovelace
    );

    for (policy, name, quantity) in utxo.value.assets() {
        if name.is_empty() {
            let _ = write!(out, " + {quantity} {policy}");
        } else {
            let _ = write!(out, " + {quantity} {policy}.{}", hex::encode(name));
        }
    }

    match &utxo.datum {
        None => out.push_str(" + TxOutDatumNone"),
        Some(Datum::Hash(x)) => {
            let _ = write!(out, " + TxOutDatumHash ScriptDataInBabbageEra \"{x}\"");
        }
        Some(Datum::Inline(x)) => {
            let _ = write!(
                out,
                " + TxOutDatumInline BabbageEraOnwardsConway ({})",
                render_data(x)
            );
        }
    }

    out
}

/// Renders a full dump, header included.
pub fn render_dump(utxos: &[Utxo]) -> String {
    let mut out = String::from(
        "                           TxHash                                 TxIx        Amount\n",
    );

    out.push_str(&"-".repeat(86));
    out.push('\n');

    for utxo in utxos {
        out.push_str(&render_line(utxo));
        out.push('\n');
    }

    out
}

fn random_integer(rng: &mut impl Rng) -> BigInt {
    let small = BigInt::from(rng.random::<i64>());

    if rng.random_bool(0.2) {
        small * BigInt::from(rng.random::<u64>())
    } else {
        small
    }
}

fn random_bytes(rng: &mut impl Rng, max: usize) -> Vec<u8> {
    let len = rng.random_range(0..=max);
    (0..len).map(|_| rng.random::<u8>()).collect()
}

fn random_data_with(rng: &mut impl Rng, depth: usize) -> Data {
    let kinds = if depth == 0 { 2 } else { 5 };

    match rng.random_range(0..kinds) {
        0 => Data::Integer(random_integer(rng)),
        1 => Data::bytes(random_bytes(rng, 12)),
        2 => {
            let len = rng.random_range(0..4);
            Data::list((0..len).map(|_| random_data_with(rng, depth - 1)).collect())
        }
        3 => {
            let len = rng.random_range(0..3);

            Data::map(
                (0..len)
                    .map(|_| {
                        let key = random_data_with(rng, depth - 1);
                        let value = random_data_with(rng, depth - 1);
                        (key, value)
                    })
                    .collect(),
            )
        }
        _ => {
            let tag = rng.random_range(0..10);
            let len = rng.random_range(0..4);

            Data::constr(
                tag,
                (0..len).map(|_| random_data_with(rng, depth - 1)).collect(),
            )
        }
    }
}

/// Builds a random value nested at most `depth` levels, reproducible from
/// `seed`.
pub fn random_data(seed: u64, depth: usize) -> Data {
    let mut rng = StdRng::seed_from_u64(seed);
    random_data_with(&mut rng, depth)
}

fn random_utxo(rng: &mut impl Rng, address: &Address, index: u32) -> Utxo {
    let mut value = Value::lovelace(rng.random_range(1_000_000u64..100_000_000));

    for asset in TestAsset::all() {
        if rng.random_bool(0.5) {
            value.add_asset(asset.policy(), asset.name(), rng.random_range(1..1_000_000i64));
        }
    }

    if rng.random_bool(0.3) {
        let policy = TestAsset::Snek.policy();
        value.add_asset(policy, random_bytes(rng, 8), -rng.random_range(1..100i64));
    }

    let datum = match rng.random_range(0..3) {
        0 => None,
        1 => Some(Datum::Hash(Hash::new(rng.random()))),
        _ => Some(Datum::Inline(random_data_with(rng, 3))),
    };

    Utxo {
        reference: TxoRef(Hash::new(rng.random()), index),
        address: address.clone(),
        value,
        datum,
        reference_script: None,
    }
}

/// Builds `count` random outputs plus the dump that lists them.
pub fn random_dump(seed: u64, count: u32, address: &Address) -> (String, Vec<Utxo>) {
    let mut rng = StdRng::seed_from_u64(seed);

    let utxos: Vec<_> = (0..count)
        .map(|index| random_utxo(&mut rng, address, index))
        .collect();

    (render_dump(&utxos), utxos)
}

/// Attaches the same script to every output, as the decoder does.
pub fn with_reference_script(utxos: Vec<Utxo>, script: ReferenceScript) -> Vec<Utxo> {
    let script = Arc::new(script);

    utxos
        .into_iter()
        .map(|utxo| Utxo {
            reference_script: Some(script.clone()),
            ..utxo
        })
        .collect()
}
