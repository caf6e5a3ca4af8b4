//! Recursive decoder for the `ScriptData` values found in inline datums.
//!
//! The dump prints datums with Haskell's derived `Show`, e.g.
//!
//! ```text
//! ScriptDataConstructor 0 [ScriptDataNumber 1,ScriptDataBytes "\STX"]
//! ```
//!
//! Once split into tokens (see [`crate::tokenize::datum_tokens`]) the only
//! structural hint left is the run of `]` characters at the end of the last
//! token of each list or map. Decoding never mutates the tokens: each step
//! reports how many of the closers on its last token are still waiting to be
//! claimed by an enclosing list, map or constructor.

use num_bigint::{BigInt, BigUint};

use utxodump_core::Data;

use crate::tokenize::{datum_tokens, tokenize_line};
use crate::DecodeError;

pub const CONSTRUCTOR: &str = "ScriptDataConstructor";
pub const LIST: &str = "ScriptDataList";
pub const MAP: &str = "ScriptDataMap";
pub const NUMBER: &str = "ScriptDataNumber";
pub const BYTES: &str = "ScriptDataBytes";

/// Separates the entries of a utxo line (assets, datum).
pub const CONTINUATION: &str = "+";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub data: Data,

    /// Tokens read, counting from the discriminator.
    pub consumed: usize,

    /// `]` closers on the last token that belong to enclosing structures.
    pub pending: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Nothing left to decode: end of input or a `+` continuation.
    End,
    Value(Decoded),
}

/// Strips the trailing run of `)` / `]` from a token, returning what's left
/// and how many `]` the run held.
///
/// A byte-string literal always ends in `"`, so closers inside it are never
/// counted.
fn split_closers(token: &str) -> (&str, usize) {
    let body = token.trim_end_matches([')', ']']);
    let brackets = token[body.len()..].chars().filter(|c| *c == ']').count();

    (body, brackets)
}

fn token_at<S: AsRef<str>>(tokens: &[S], at: usize) -> Option<&str> {
    tokens
        .get(at)
        .map(|token| token.as_ref())
        .filter(|token| *token != CONTINUATION)
}

fn argument<'a, S: AsRef<str>>(
    tokens: &'a [S],
    at: usize,
    context: &'static str,
) -> Result<&'a str, DecodeError> {
    token_at(tokens, at).ok_or(DecodeError::Underrun { index: at, context })
}

fn expect_value(step: Step, index: usize, context: &'static str) -> Result<Decoded, DecodeError> {
    match step {
        Step::Value(x) => Ok(x),
        Step::End => Err(DecodeError::Underrun { index, context }),
    }
}

/// Recognizes a body with no elements: a token made only of closers.
fn empty_body<S: AsRef<str>>(tokens: &[S], at: usize) -> Option<usize> {
    let (body, brackets) = split_closers(token_at(tokens, at)?);

    (body.is_empty() && brackets > 0).then(|| brackets - 1)
}

/// Decodes list elements starting at `at` until one of them closes the list.
///
/// Returns the elements, the tokens consumed and the closers left for the
/// enclosing structure.
fn decode_list_body<S: AsRef<str>>(
    tokens: &[S],
    at: usize,
    context: &'static str,
) -> Result<(Vec<Data>, usize, usize), DecodeError> {
    if let Some(pending) = empty_body(tokens, at) {
        return Ok((vec![], 1, pending));
    }

    let mut items = vec![];
    let mut cursor = at;

    loop {
        let item = expect_value(decode_data(tokens, cursor)?, cursor, context)?;

        items.push(item.data);
        cursor += item.consumed;

        if item.pending > 0 {
            return Ok((items, cursor - at, item.pending - 1));
        }
    }
}

fn decode_map_body<S: AsRef<str>>(
    tokens: &[S],
    at: usize,
) -> Result<(Vec<(Data, Data)>, usize, usize), DecodeError> {
    if let Some(pending) = empty_body(tokens, at) {
        return Ok((vec![], 1, pending));
    }

    let mut pairs = vec![];
    let mut cursor = at;

    loop {
        let key = expect_value(decode_data(tokens, cursor)?, cursor, "map key")?;

        if key.pending > 0 {
            return Err(DecodeError::DanglingMapKey { index: cursor });
        }

        cursor += key.consumed;

        let value = expect_value(decode_data(tokens, cursor)?, cursor, "map value")?;
        cursor += value.consumed;

        pairs.push((key.data, value.data));

        if value.pending > 0 {
            return Ok((pairs, cursor - at, value.pending - 1));
        }
    }
}

fn decode_constructor<S: AsRef<str>>(tokens: &[S], at: usize) -> Result<Decoded, DecodeError> {
    let raw = argument(tokens, at + 1, "constructor tag")?;

    let tag = raw
        .parse::<BigUint>()
        .map_err(|source| DecodeError::MalformedInteger {
            token: raw.to_string(),
            index: at + 1,
            source,
        })?;

    let (fields, consumed, pending) = decode_list_body(tokens, at + 2, "constructor fields")?;

    Ok(Decoded {
        data: Data::Constructor { tag, fields },
        consumed: consumed + 2,
        pending,
    })
}

fn decode_number<S: AsRef<str>>(tokens: &[S], at: usize) -> Result<Decoded, DecodeError> {
    let raw = argument(tokens, at + 1, "number")?;
    let (body, pending) = split_closers(raw);

    let value = body
        .parse::<BigInt>()
        .map_err(|source| DecodeError::MalformedInteger {
            token: raw.to_string(),
            index: at + 1,
            source,
        })?;

    Ok(Decoded {
        data: Data::Integer(value),
        consumed: 2,
        pending,
    })
}

fn decode_bytes<S: AsRef<str>>(tokens: &[S], at: usize) -> Result<Decoded, DecodeError> {
    let raw = argument(tokens, at + 1, "byte string")?;
    let (body, pending) = split_closers(raw);

    let literal = body
        .strip_prefix('"')
        .and_then(|x| x.strip_suffix('"'))
        .ok_or_else(|| DecodeError::MalformedBytes {
            token: raw.to_string(),
            index: at + 1,
        })?;

    let bytes = crate::escape::decode_escaped(literal)
        .map_err(|source| DecodeError::InvalidBytes { index: at + 1, source })?;

    Ok(Decoded {
        data: Data::ByteString(bytes),
        consumed: 2,
        pending,
    })
}

/// Decodes one value starting at token `at`.
///
/// Running off the end of the tokens, or landing on a `+`, yields
/// [`Step::End`] instead of a value; enclosing structures turn that into an
/// underrun error.
pub fn decode_data<S: AsRef<str>>(tokens: &[S], at: usize) -> Result<Step, DecodeError> {
    let Some(discriminator) = token_at(tokens, at) else {
        return Ok(Step::End);
    };

    let decoded = match discriminator {
        CONSTRUCTOR => decode_constructor(tokens, at)?,
        LIST => {
            let (items, consumed, pending) = decode_list_body(tokens, at + 1, "list")?;

            Decoded {
                data: Data::List(items),
                consumed: consumed + 1,
                pending,
            }
        }
        MAP => {
            let (pairs, consumed, pending) = decode_map_body(tokens, at + 1)?;

            Decoded {
                data: Data::Map(pairs),
                consumed: consumed + 1,
                pending,
            }
        }
        NUMBER => decode_number(tokens, at)?,
        BYTES => decode_bytes(tokens, at)?,
        x => {
            return Err(DecodeError::UnknownDiscriminator {
                token: x.to_string(),
                index: at,
            })
        }
    };

    Ok(Step::Value(decoded))
}

/// Decodes a token stream that holds exactly one value, no more and no less.
pub fn parse_data<S: AsRef<str>>(tokens: &[S]) -> Result<Data, DecodeError> {
    let decoded = expect_value(decode_data(tokens, 0)?, 0, "datum")?;

    if decoded.pending > 0 {
        return Err(DecodeError::UnbalancedClosers {
            index: decoded.consumed - 1,
        });
    }

    if let Some(extra) = tokens.get(decoded.consumed) {
        return Err(DecodeError::TrailingToken {
            token: extra.as_ref().to_string(),
            index: decoded.consumed,
        });
    }

    Ok(decoded.data)
}

/// Decodes a datum from the text `cardano-cli` prints for it.
pub fn parse_data_text(text: &str) -> Result<Data, DecodeError> {
    let columns = tokenize_line(text);

    let tokens: Vec<_> = datum_tokens(&columns, 0)
        .into_iter()
        .map(|(_, piece)| piece)
        .collect();

    parse_data(&tokens)
}
