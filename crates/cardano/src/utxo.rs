use std::{str::FromStr, sync::Arc};

use num_bigint::{BigInt, BigUint};
use rayon::prelude::*;
use tracing::{debug, trace, warn};

use utxodump_core::{
    Address, Data, Datum, DatumHash, PolicyId, ReferenceScript, TxHash, TxoIdx, TxoRef, Utxo,
    Value,
};

use crate::data::{decode_data, Step, CONTINUATION};
use crate::tokenize::{datum_tokens, tokenize_line};
use crate::DecodeError;

pub const DATUM_INLINE: &str = "TxOutDatumInline";
pub const DATUM_HASH: &str = "TxOutDatumHash";
pub const DATUM_NONE: &str = "TxOutDatumNone";
pub const INLINE_SCRIPT: &str = "InlineScript";

const LOVELACE_UNIT: &str = "lovelace";
const HEADER_MARKER: &str = "TxHash";

fn column<'a>(
    columns: &'a [String],
    index: usize,
    name: &'static str,
) -> Result<&'a str, DecodeError> {
    columns
        .get(index)
        .map(String::as_str)
        .ok_or(DecodeError::MissingColumn {
            column: name,
            index,
        })
}

fn is_datum_hash(token: &str) -> bool {
    token.len() == 64 && token.chars().all(|c| c.is_ascii_hexdigit())
}

/// Decodes the inline datum whose marker sits at `marker`.
///
/// Returns the datum and the index of the first column after it.
fn inline_datum(columns: &[String], marker: usize) -> Result<(Data, usize), DecodeError> {
    // era label, e.g. `BabbageEraOnwardsConway`
    column(columns, marker + 1, "datum era")?;

    let offset = marker + 2;
    let pieces = datum_tokens(&columns[offset.min(columns.len())..], offset);
    let tokens: Vec<_> = pieces.iter().map(|(_, piece)| piece.as_str()).collect();

    let decoded = match decode_data(&tokens, 0)? {
        Step::Value(x) => x,
        Step::End => {
            return Err(DecodeError::Underrun {
                index: 0,
                context: "inline datum",
            })
        }
    };

    let last = decoded.consumed - 1;

    if decoded.pending > 0 {
        return Err(DecodeError::UnbalancedClosers { index: last });
    }

    let origin = pieces[last].0;

    // the datum must end at a column boundary
    if let Some((next_origin, piece)) = pieces.get(decoded.consumed) {
        if *next_origin == origin {
            return Err(DecodeError::TrailingToken {
                token: piece.clone(),
                index: decoded.consumed,
            });
        }
    }

    trace!(pieces = decoded.consumed, "decoded inline datum");

    Ok((decoded.data, origin + 1))
}

/// Scans forward from `from` for the datum hash, skipping era labels.
fn datum_hash(columns: &[String], from: usize) -> Result<(DatumHash, usize), DecodeError> {
    for (index, token) in columns.iter().enumerate().skip(from) {
        if token == CONTINUATION {
            break;
        }

        let unquoted = token.trim_matches('"');

        if is_datum_hash(unquoted) {
            let hash = DatumHash::from_str(&unquoted.to_ascii_lowercase()).map_err(|_| {
                DecodeError::MalformedColumn {
                    column: "datum hash",
                    token: token.clone(),
                    index,
                }
            })?;

            return Ok((hash, index + 1));
        }
    }

    Err(DecodeError::MissingDatumHash { index: from })
}

/// Adds the `<quantity> <policy>.<name>` entry at `at` to `value`.
///
/// Returns the index of the first column after the entry.
fn asset_entry(columns: &[String], at: usize, value: &mut Value) -> Result<usize, DecodeError> {
    let raw = column(columns, at, "asset quantity")?;

    let quantity = raw
        .parse::<BigInt>()
        .map_err(|_| DecodeError::UnknownContinuation {
            token: raw.to_string(),
            index: at,
        })?;

    let unit = column(columns, at + 1, "asset")?;

    let malformed = || DecodeError::MalformedAsset {
        token: unit.to_string(),
        index: at + 1,
    };

    let (policy, name) = unit.split_once('.').unwrap_or((unit, ""));

    let policy = PolicyId::from_str(policy).map_err(|_| malformed())?;
    let name = hex::decode(name).map_err(|_| malformed())?;

    value.add_asset(policy, name, quantity);

    Ok(at + 2)
}

fn check_header(lines: &[(usize, &str)]) -> Result<(), DecodeError> {
    let (title, rule) = match lines {
        [] => return Err(DecodeError::MissingHeader),
        [title] => (*title, None),
        [title, rule, ..] => (*title, Some(*rule)),
    };

    let (line, text) = title;

    if !text.contains(HEADER_MARKER) {
        return Err(DecodeError::MalformedHeader {
            line,
            text: text.to_string(),
        });
    }

    let Some((line, text)) = rule else {
        return Err(DecodeError::MissingHeader);
    };

    let text = text.trim();

    if text.is_empty() || !text.chars().all(|c| c == '-') {
        return Err(DecodeError::MalformedHeader {
            line,
            text: text.to_string(),
        });
    }

    Ok(())
}

/// Turns the text table printed by `cardano-cli query utxo` into outputs.
///
/// The dump doesn't say which address was queried, nor does it print
/// reference scripts, so both are supplied up front and stamped onto every
/// decoded output.
#[derive(Debug, Clone)]
pub struct DumpDecoder {
    address: Address,
    reference_script: Option<Arc<ReferenceScript>>,
    parallel: bool,
}

impl DumpDecoder {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            reference_script: None,
            parallel: false,
        }
    }

    pub fn with_reference_script(self, script: ReferenceScript) -> Self {
        Self {
            reference_script: Some(Arc::new(script)),
            ..self
        }
    }

    /// Decode lines on the rayon thread pool. Output order is unaffected.
    pub fn parallel(self, enabled: bool) -> Self {
        Self {
            parallel: enabled,
            ..self
        }
    }

    /// Decodes a single record line (no header).
    pub fn decode_line(&self, line: &str) -> Result<Utxo, DecodeError> {
        let columns = tokenize_line(line);
        trace!(?columns, "tokenized line");

        let raw = column(&columns, 0, "tx hash")?;
        let hash = TxHash::from_str(raw).map_err(|_| DecodeError::MalformedColumn {
            column: "tx hash",
            token: raw.to_string(),
            index: 0,
        })?;

        let raw = column(&columns, 1, "tx index")?;
        let index = raw
            .parse::<TxoIdx>()
            .map_err(|_| DecodeError::MalformedColumn {
                column: "tx index",
                token: raw.to_string(),
                index: 1,
            })?;

        let raw = column(&columns, 2, "lovelace")?;
        let lovelace = raw
            .parse::<BigUint>()
            .map_err(|source| DecodeError::MalformedInteger {
                token: raw.to_string(),
                index: 2,
                source,
            })?;

        let unit = column(&columns, 3, "unit")?;

        if unit != LOVELACE_UNIT {
            return Err(DecodeError::UnexpectedToken {
                expected: LOVELACE_UNIT,
                token: unit.to_string(),
                index: 3,
            });
        }

        let mut value = Value::lovelace(lovelace);
        let mut datum = None;
        let mut cursor = 4;

        while let Some(token) = columns.get(cursor) {
            if token != CONTINUATION {
                warn!(index = cursor, %token, "ignoring trailing tokens");
                break;
            }

            let key = column(&columns, cursor + 1, "continuation")?;

            match key {
                DATUM_INLINE => {
                    let (data, next) = inline_datum(&columns, cursor + 1)
                        .map_err(|err| err.in_datum(cursor + 1))?;

                    datum = Some(Datum::Inline(data));
                    cursor = next;
                }
                DATUM_HASH => {
                    let (hash, next) = datum_hash(&columns, cursor + 2)?;

                    datum = Some(Datum::Hash(hash));
                    cursor = next;
                }
                DATUM_NONE => {
                    datum = None;
                    cursor += 2;
                }
                INLINE_SCRIPT => {
                    debug!(index = cursor + 1, "inline script marker, skipping rest of line");
                    break;
                }
                _ => {
                    cursor = asset_entry(&columns, cursor + 1, &mut value)?;
                }
            }
        }

        let utxo = Utxo {
            reference: TxoRef(hash, index),
            address: self.address.clone(),
            value,
            datum,
            reference_script: self.reference_script.clone(),
        };

        debug!(reference = %utxo.reference, "decoded utxo");

        Ok(utxo)
    }

    /// Decodes a full dump: two header lines followed by one output per line.
    /// Blank lines are skipped; outputs keep the order of their lines.
    pub fn decode(&self, dump: &str) -> Result<Vec<Utxo>, DecodeError> {
        let lines: Vec<_> = dump
            .lines()
            .enumerate()
            .map(|(i, text)| (i + 1, text))
            .collect();

        check_header(&lines)?;

        let records: Vec<_> = lines
            .into_iter()
            .skip(2)
            .filter(|(_, text)| !text.trim().is_empty())
            .collect();

        debug!(records = records.len(), parallel = self.parallel, "decoding dump");

        let decode = |(line, text): &(usize, &str)| {
            self.decode_line(text)
                .map_err(|err| err.in_line(*line, text))
        };

        if self.parallel {
            records.par_iter().map(decode).collect()
        } else {
            records.iter().map(decode).collect()
        }
    }
}

/// Shorthand for a one-off [`DumpDecoder::decode`].
pub fn decode_dump(
    dump: &str,
    address: Address,
    reference_script: Option<ReferenceScript>,
) -> Result<Vec<Utxo>, DecodeError> {
    let decoder = DumpDecoder::new(address);

    let decoder = match reference_script {
        Some(script) => decoder.with_reference_script(script),
        None => decoder,
    };

    decoder.decode(dump)
}
