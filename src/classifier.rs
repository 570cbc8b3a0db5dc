//! Lexical category predicates.
//!
//! Every predicate answers whether a whole candidate run is a complete
//! instance of its category. The lexer calls [`classify`] after each appended
//! character, so a predicate must reject prefixes (`"ab` is not a string,
//! `#note` without its newline is not a comment).

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::TokenKind;

/// Stand-in character for end of input, treated as whitespace.
pub const EOF_MARKER: char = '\u{1a}';

pub const RESERVED_WORDS: &[&str] = &[
    "int", "void", "if", "else", "while", "return", "write", "print", "continue", "break",
    "binary", "decimal", "val",
];

pub const SYMBOLS: &[&str] = &[
    "(", ")", "{", "}", "[", "]", ",", ";", "+", "-", "*", "/", "==", "!=", ">", ">=", "<", "<=",
    "&&", "||", "=", ".", "%", "=>",
];

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern"));

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("number pattern"));

static META_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#|//)[^\n]*\n$").expect("meta statement pattern"));

/// Classify a run, checking categories in precedence order.
pub fn classify(run: &str) -> Option<TokenKind> {
    if run.is_empty() {
        return None;
    }
    if is_meta_statement(run) {
        Some(TokenKind::MetaStatement)
    } else if is_reserved_word(run) {
        Some(TokenKind::ReservedWord)
    } else if is_identifier(run) {
        Some(TokenKind::Identifier)
    } else if is_number(run) {
        Some(TokenKind::Number)
    } else if is_string(run) {
        Some(TokenKind::StringLiteral)
    } else if is_symbol(run) {
        Some(TokenKind::Symbol)
    } else if is_space(run) {
        Some(TokenKind::Space)
    } else {
        None
    }
}

/// `#...` or `//...` terminated by a newline.
pub fn is_meta_statement(run: &str) -> bool {
    META_STATEMENT.is_match(run)
}

/// Whether a run has started a comment and must be read to end of line.
pub fn is_comment_prefix(run: &str) -> bool {
    run.starts_with('#') || run.starts_with("//")
}

pub fn is_reserved_word(run: &str) -> bool {
    RESERVED_WORDS.contains(&run)
}

pub fn is_identifier(run: &str) -> bool {
    IDENTIFIER.is_match(run)
}

pub fn is_number(run: &str) -> bool {
    NUMBER.is_match(run)
}

pub fn is_string(run: &str) -> bool {
    run.len() >= 2 && run.starts_with('"') && run.ends_with('"')
}

pub fn is_symbol(run: &str) -> bool {
    SYMBOLS.contains(&run)
}

pub fn is_space(run: &str) -> bool {
    !run.is_empty()
        && run
            .chars()
            .all(|ch| matches!(ch, ' ' | '\t' | '\r' | '\n' | EOF_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_words_win_over_identifiers() {
        assert_eq!(classify("val"), Some(TokenKind::ReservedWord));
        assert_eq!(classify("else"), Some(TokenKind::ReservedWord));
        assert_eq!(classify("value"), Some(TokenKind::Identifier));
        assert_eq!(classify("map"), Some(TokenKind::Identifier));
    }

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("x"));
        assert!(is_identifier("_1"));
        assert!(is_identifier("row2col"));
        assert!(!is_identifier("2x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_numbers_are_integers_only() {
        assert_eq!(classify("42"), Some(TokenKind::Number));
        assert_eq!(classify("4.2"), None);
        assert_eq!(classify("4a"), None);
    }

    #[test]
    fn test_strings_need_both_quotes() {
        assert!(is_string("\"\""));
        assert!(is_string("\"a b\""));
        assert!(!is_string("\""));
        assert!(!is_string("\"abc"));
    }

    #[test]
    fn test_symbols() {
        for symbol in ["=>", "==", "<=", ">=", "!=", "&&", "||", "%"] {
            assert_eq!(classify(symbol), Some(TokenKind::Symbol), "{symbol}");
        }
        assert_eq!(classify("!"), None);
        assert_eq!(classify("&"), None);
        assert_eq!(classify("=>="), None);
    }

    #[test]
    fn test_meta_statements_require_newline() {
        assert_eq!(classify("# header\n"), Some(TokenKind::MetaStatement));
        assert_eq!(classify("// note\n"), Some(TokenKind::MetaStatement));
        assert_eq!(classify("//\n"), Some(TokenKind::MetaStatement));
        assert_eq!(classify("# header"), None);
        assert_eq!(classify("#\n"), Some(TokenKind::MetaStatement));
        assert_eq!(classify("/"), Some(TokenKind::Symbol));
        assert_eq!(classify("//"), None);
    }

    #[test]
    fn test_space() {
        assert_eq!(classify(" \t\r\n"), Some(TokenKind::Space));
        assert_eq!(classify(&EOF_MARKER.to_string()), Some(TokenKind::Space));
        assert_eq!(classify(" x"), None);
    }
}
