//! Decoder for byte-string literals printed with Haskell's `show`.
//!
//! Bytes 0-31 print as control mnemonics (`\NUL`, `\SOH`, ... with the short
//! C forms `\a` to `\r` for 7-13), printable ASCII prints as itself, 127 is
//! `\DEL` and everything above is a backslash followed by the decimal value.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown byte escape at {remaining:?}")]
pub struct EscapeError {
    pub remaining: String,
}

/// Control characters indexed by byte value.
const CONTROL: [&str; 32] = [
    "NUL", "SOH", "STX", "ETX", "EOT", "ENQ", "ACK", "a", "b", "t", "n", "v", "f", "r", "SO", "SI",
    "DLE", "DC1", "DC2", "DC3", "DC4", "NAK", "SYN", "ETB", "CAN", "EM", "SUB", "ESC", "FS", "GS",
    "RS", "US",
];

/// Mnemonics that `show` never prints but `read` accepts.
const CONTROL_ALIASES: [(&str, u8); 8] = [
    ("BEL", 7),
    ("BS", 8),
    ("HT", 9),
    ("LF", 10),
    ("VT", 11),
    ("FF", 12),
    ("CR", 13),
    ("SP", 32),
];

enum Escape {
    Byte(u8, usize),
    Empty,
}

fn named_escape(rest: &str) -> Option<(u8, usize)> {
    let table = CONTROL
        .iter()
        .enumerate()
        .map(|(byte, name)| (*name, byte as u8))
        .chain(CONTROL_ALIASES)
        .chain([("DEL", 127), ("\\", b'\\'), ("\"", b'"'), ("'", b'\'')]);

    table
        .filter(|(name, _)| rest.starts_with(name))
        .max_by_key(|(name, _)| name.len())
        .map(|(name, byte)| (byte, name.len()))
}

fn numeric_escape(rest: &str) -> Option<Result<(u8, usize), ()>> {
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();

    if digits == 0 {
        return None;
    }

    let parsed = rest[..digits].parse::<u8>().map(|byte| (byte, digits));

    Some(parsed.map_err(|_| ()))
}

/// Matches the escape that starts right after a backslash. `None` means the
/// backslash doesn't start any known escape.
fn match_escape(rest: &str) -> Option<Result<Escape, ()>> {
    if rest.starts_with('&') {
        return Some(Ok(Escape::Empty));
    }

    if let Some(numeric) = numeric_escape(rest) {
        return Some(numeric.map(|(byte, len)| Escape::Byte(byte, len)));
    }

    named_escape(rest).map(|(byte, len)| Ok(Escape::Byte(byte, len)))
}

/// Decodes the contents of a byte-string literal, without the surrounding
/// quotes, into raw bytes.
///
/// A backslash that doesn't start a known escape stands for itself, as do
/// bare double quotes. Decimal escapes above 255 and characters outside
/// printable ASCII are rejected.
pub fn decode_escaped(literal: &str) -> Result<Vec<u8>, EscapeError> {
    let mut out = Vec::with_capacity(literal.len());
    let mut rest = literal;

    let fail = |rest: &str| EscapeError {
        remaining: rest.to_string(),
    };

    while let Some(ch) = rest.chars().next() {
        if ch == '\\' {
            match match_escape(&rest[1..]) {
                Some(Ok(Escape::Byte(byte, len))) => {
                    out.push(byte);
                    rest = &rest[1 + len..];
                    continue;
                }
                Some(Ok(Escape::Empty)) => {
                    rest = &rest[2..];
                    continue;
                }
                Some(Err(())) => return Err(fail(rest)),
                None => (),
            }
        }

        if !(' '..='~').contains(&ch) {
            return Err(fail(rest));
        }

        out.push(ch as u8);
        rest = &rest[1..];
    }

    Ok(out)
}
