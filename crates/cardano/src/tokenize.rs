//! Quote-aware splitting of dump lines.
//!
//! Byte-string literals are printed between double quotes and may contain
//! the same characters the dump uses as delimiters (spaces between columns,
//! commas between list items). Before splitting, every delimiter found inside
//! a quoted region is swapped for a placeholder from the Unicode private-use
//! area; the placeholder is swapped back on each resulting token.

const SPACE_PLACEHOLDER: char = '\u{E000}';
const COMMA_PLACEHOLDER: char = '\u{E001}';

/// Replaces `target` with `replacement`, but only inside double-quoted
/// regions. A quote preceded by an unescaped backslash doesn't open or close
/// a region.
pub fn replace_between_quotes(input: &str, target: char, replacement: char) -> String {
    let mut out = String::with_capacity(input.len());

    let mut escaped = false;
    let mut quoted = false;

    for ch in input.chars() {
        let ch = if quoted && ch == target {
            replacement
        } else {
            ch
        };

        let unescaped_quote = ch == '"' && !escaped;

        quoted = if quoted {
            !unescaped_quote
        } else {
            unescaped_quote
        };

        out.push(ch);
        escaped = ch == '\\' && !escaped;
    }

    out
}

/// Splits a dump line into its whitespace separated columns.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let protected = replace_between_quotes(line, ' ', SPACE_PLACEHOLDER);

    protected
        .split_whitespace()
        .map(|x| replace_between_quotes(x, SPACE_PLACEHOLDER, ' '))
        .collect()
}

/// Splits a column on commas that sit outside byte-string literals.
pub fn split_commas(token: &str) -> Vec<String> {
    let protected = replace_between_quotes(token, ',', COMMA_PLACEHOLDER);

    protected
        .split(',')
        .filter(|x| !x.is_empty())
        .map(|x| replace_between_quotes(x, COMMA_PLACEHOLDER, ','))
        .collect()
}

/// Removes the tuple / list openers and the tuple closers that Haskell's
/// `show` wraps around values.
///
/// List closers (`]`) are left in place: they carry the nesting information
/// the data decoder relies on.
pub fn unwrap_piece(piece: &str) -> &str {
    piece
        .trim_start_matches(|c| c == '(' || c == '[')
        .trim_end_matches(')')
}

/// Turns the columns that follow an inline datum marker into the token stream
/// the data decoder expects.
///
/// Each piece is paired with the index of the column it came from so callers
/// can resume scanning columns after the datum.
pub fn datum_tokens<S: AsRef<str>>(columns: &[S], offset: usize) -> Vec<(usize, String)> {
    columns
        .iter()
        .enumerate()
        .flat_map(|(i, column)| {
            split_commas(column.as_ref())
                .into_iter()
                .map(move |piece| (offset + i, unwrap_piece(&piece).to_string()))
        })
        .filter(|(_, piece)| !piece.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_only_inside_quotes() {
        assert_eq!(
            replace_between_quotes(r#"a b "c d" e"#, ' ', '_'),
            r#"a b "c_d" e"#
        );
    }

    #[test]
    fn escaped_quote_does_not_toggle() {
        let input = r#""a\" b" c"#;
        assert_eq!(replace_between_quotes(input, ' ', '_'), r#""a\"_b" c"#);
    }

    #[test]
    fn escaped_backslash_before_quote_closes() {
        let input = r#""a\\" b"#;
        assert_eq!(replace_between_quotes(input, ' ', '_'), input);
    }

    #[test]
    fn idempotent_without_target() {
        let input = r#"ScriptDataBytes "abc""#;
        assert_eq!(replace_between_quotes(input, ',', '_'), input);
    }

    #[test]
    fn empty_input() {
        assert_eq!(replace_between_quotes("", ' ', '_'), "");
        assert!(tokenize_line("").is_empty());
        assert!(split_commas("").is_empty());
    }

    #[test]
    fn tokenize_keeps_quoted_spaces() {
        let tokens = tokenize_line(r#"abc   0  10 lovelace + "x y  z"   +"#);

        assert_eq!(
            tokens,
            vec!["abc", "0", "10", "lovelace", "+", r#""x y  z""#, "+"]
        );
    }

    #[test]
    fn commas_inside_literals_survive() {
        let pieces = split_commas(r#"1,ScriptDataBytes,"a,b","#);
        assert_eq!(pieces, vec!["1", "ScriptDataBytes", r#""a,b""#]);
    }

    #[test]
    fn unwrap_keeps_list_closers() {
        assert_eq!(unwrap_piece("[(ScriptDataNumber"), "ScriptDataNumber");
        assert_eq!(unwrap_piece("[]"), "]");
        assert_eq!(unwrap_piece("42]])"), "42]]");
        assert_eq!(unwrap_piece("4)]"), "4)]");
        assert_eq!(unwrap_piece(r#""a)")"#), r#""a)""#);
    }

    #[test]
    fn datum_tokens_track_columns() {
        let columns = [
            "(ScriptDataConstructor",
            "0",
            "[ScriptDataNumber",
            "1,ScriptDataBytes",
            r#""\STX"])"#,
            "+",
        ];

        let tokens = datum_tokens(&columns, 10);

        assert_eq!(
            tokens,
            vec![
                (10, "ScriptDataConstructor".to_string()),
                (11, "0".to_string()),
                (12, "ScriptDataNumber".to_string()),
                (13, "1".to_string()),
                (13, "ScriptDataBytes".to_string()),
                (14, r#""\STX"]"#.to_string()),
                (15, "+".to_string()),
            ]
        );
    }
}
