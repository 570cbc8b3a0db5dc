// tests/lexer_tests.rs

use rdd_translate::ast::TokenKind;
use rdd_translate::lexer::{LexError, Lexer};

fn kinds(source: &str) -> Vec<(String, TokenKind)> {
    Lexer::for_source(source)
        .map(|token| token.unwrap())
        .filter(|token| token.kind != TokenKind::Space)
        .map(|token| (token.text, token.kind))
        .collect()
}

// ============================================================================
// Categories
// ============================================================================

#[test]
fn test_pipeline_tokens() {
    let tokens = kinds("sc.range(0,100).map(x => x * 2).collect()");
    let texts: Vec<&str> = tokens.iter().map(|(text, _)| text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "sc", ".", "range", "(", "0", ",", "100", ")", ".", "map", "(", "x", "=>", "x", "*",
            "2", ")", ".", "collect", "(", ")"
        ]
    );
    assert_eq!(tokens[0].1, TokenKind::Identifier);
    assert_eq!(tokens[4].1, TokenKind::Number);
    assert_eq!(tokens[12].1, TokenKind::Symbol);
}

#[test]
fn test_reserved_words() {
    let tokens = kinds("val if else value");
    assert_eq!(
        tokens,
        vec![
            ("val".to_string(), TokenKind::ReservedWord),
            ("if".to_string(), TokenKind::ReservedWord),
            ("else".to_string(), TokenKind::ReservedWord),
            ("value".to_string(), TokenKind::Identifier),
        ]
    );
}

#[test]
fn test_string_literal() {
    let tokens = kinds("\"id as _1\")");
    assert_eq!(tokens[0], ("\"id as _1\"".to_string(), TokenKind::StringLiteral));
    assert_eq!(tokens[1], (")".to_string(), TokenKind::Symbol));
}

// ============================================================================
// Longest match
// ============================================================================

#[test]
fn test_longest_match_operators() {
    let texts: Vec<String> = kinds("a>=b<c!=d==e=f")
        .into_iter()
        .map(|(text, _)| text)
        .collect();
    assert_eq!(texts, vec!["a", ">=", "b", "<", "c", "!=", "d", "==", "e", "=", "f"]);
}

#[test]
fn test_number_then_identifier_split() {
    let texts: Vec<String> = kinds("p._2").into_iter().map(|(text, _)| text).collect();
    assert_eq!(texts, vec!["p", ".", "_2"]);

    let texts: Vec<String> = kinds("1.x").into_iter().map(|(text, _)| text).collect();
    assert_eq!(texts, vec!["1", ".", "x"]);
}

#[test]
fn test_slash_is_a_symbol_outside_comments() {
    let texts: Vec<String> = kinds("a / b").into_iter().map(|(text, _)| text).collect();
    assert_eq!(texts, vec!["a", "/", "b"]);
}

// ============================================================================
// Comments and whitespace
// ============================================================================

#[test]
fn test_comments_are_meta_statements() {
    let tokens = kinds("# header\nsc // trailing @ junk\n.x");
    assert_eq!(tokens[0], ("# header\n".to_string(), TokenKind::MetaStatement));
    assert_eq!(tokens[1], ("sc".to_string(), TokenKind::Identifier));
    assert_eq!(
        tokens[2],
        ("// trailing @ junk\n".to_string(), TokenKind::MetaStatement)
    );
    assert_eq!(tokens[3].0, ".");
}

#[test]
fn test_comment_on_last_line_without_newline() {
    let tokens = kinds("x # done");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1], ("# done".to_string(), TokenKind::MetaStatement));
}

#[test]
fn test_whitespace_tokens_are_kept() {
    let all: Vec<TokenKind> = Lexer::for_source("a \t\nb")
        .map(|token| token.unwrap().kind)
        .collect();
    assert_eq!(
        all,
        vec![
            TokenKind::Identifier,
            TokenKind::Space,
            TokenKind::Space,
            TokenKind::Identifier
        ]
    );
}

#[test]
fn test_line_numbers() {
    let tokens: Vec<_> = Lexer::for_source("sc\n.range\n\n(")
        .map(|token| token.unwrap())
        .filter(|token| !token.kind.is_trivia())
        .collect();
    let lines: Vec<usize> = tokens.iter().map(|token| token.line).collect();
    assert_eq!(lines, vec![1, 2, 2, 4]);
}

#[test]
fn test_empty_input() {
    let mut lexer = Lexer::for_source("");
    assert_eq!(lexer.next_token().unwrap(), None);
    assert!(Lexer::for_source("").tokenize().unwrap().is_empty());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unrecognized_character_is_fatal() {
    let err = Lexer::for_source("x @ y\nz").tokenize().unwrap_err();
    match err {
        LexError::Unrecognized { text, line } => {
            assert!(text.starts_with('@'), "{text}");
            assert_eq!(line, 1);
        }
    }
}

#[test]
fn test_unterminated_string_is_fatal() {
    let err = Lexer::for_source("ok\n\"open").tokenize().unwrap_err();
    assert_eq!(
        err,
        LexError::Unrecognized {
            text: "\"open".to_string(),
            line: 2
        }
    );
}

#[test]
fn test_lone_bang_is_fatal() {
    assert!(Lexer::for_source("a ! b").tokenize().is_err());
}
