use std::iter::Fuse;
use std::str::Chars;

use thiserror::Error;
use tracing::trace;

use crate::ast::{Token, TokenKind};
use crate::classifier::{classify, is_comment_prefix};

/// Scanning failure. Fatal to the translation unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A run reached end of line (or input) without ever matching a category
    #[error("line {line}: not a valid token: `{text}`")]
    Unrecognized { text: String, line: usize },
}

/// Anything the translator can pull tokens from.
pub trait TokenSource {
    /// `Ok(None)` marks end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError>;
}

/// Longest-match tokenizer over a character stream.
///
/// The run is reclassified after every character. Once the run stops
/// matching while a shorter prefix did match, the prefix is the token and the
/// last character goes back into a single pushback slot.
pub struct Lexer<I: Iterator<Item = char>> {
    chars: Fuse<I>,
    pushback: Option<char>,
    line: usize,
}

impl<'a> Lexer<Chars<'a>> {
    pub fn for_source(source: &'a str) -> Self {
        Lexer::new(source.chars())
    }
}

impl<I: Iterator<Item = char>> Lexer<I> {
    pub fn new(chars: I) -> Self {
        Lexer {
            chars: chars.fuse(),
            pushback: None,
            line: 1,
        }
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.pushback.take().or_else(|| self.chars.next())?;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn unread(&mut self, ch: char) {
        if ch == '\n' {
            self.line -= 1;
        }
        self.pushback = Some(ch);
    }

    /// Scan the next token, including whitespace and comments.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let line = self.line;
        let mut run = String::new();
        // Byte length and kind of the longest prefix that classified so far
        let mut found: Option<(usize, TokenKind)> = None;

        loop {
            let ch = match self.next_char() {
                None => return self.finish_at_eof(run, found, line),
                Some('\n') => return self.finish_at_newline(run, found, line),
                Some(ch) => ch,
            };

            run.push(ch);
            match classify(&run) {
                Some(kind) => found = Some((run.len(), kind)),
                None => {
                    if let Some((len, kind)) = found
                        && !is_comment_prefix(&run)
                    {
                        self.unread(ch);
                        run.truncate(len);
                        return Ok(Some(Self::emit(run, kind, line)));
                    }
                }
            }
        }
    }

    fn finish_at_newline(
        &mut self,
        mut run: String,
        found: Option<(usize, TokenKind)>,
        line: usize,
    ) -> Result<Option<Token>, LexError> {
        match found {
            Some((len, kind)) if !is_comment_prefix(&run) => {
                // The newline starts the next token
                self.unread('\n');
                run.truncate(len);
                Ok(Some(Self::emit(run, kind, line)))
            }
            _ => {
                run.push('\n');
                match classify(&run) {
                    Some(kind) => Ok(Some(Self::emit(run, kind, line))),
                    None => Err(LexError::Unrecognized {
                        text: run.trim_end().to_string(),
                        line,
                    }),
                }
            }
        }
    }

    fn finish_at_eof(
        &mut self,
        mut run: String,
        found: Option<(usize, TokenKind)>,
        line: usize,
    ) -> Result<Option<Token>, LexError> {
        if run.is_empty() {
            return Ok(None);
        }
        // A comment on the last line needs no trailing newline
        if is_comment_prefix(&run) {
            return Ok(Some(Self::emit(run, TokenKind::MetaStatement, line)));
        }
        match found {
            Some((len, kind)) => {
                run.truncate(len);
                Ok(Some(Self::emit(run, kind, line)))
            }
            None => Err(LexError::Unrecognized { text: run, line }),
        }
    }

    fn emit(text: String, kind: TokenKind, line: usize) -> Token {
        trace!(line, %kind, text = ?text, "scanned token");
        Token::new(text, kind, line)
    }

    /// Scan the whole input eagerly.
    pub fn tokenize(self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }
}

impl<I: Iterator<Item = char>> Iterator for Lexer<I> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

impl<I: Iterator<Item = char>> TokenSource for Lexer<I> {
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        Lexer::next_token(self)
    }
}

/// Pre-scanned tokens, as produced by [`Lexer::tokenize`].
impl TokenSource for std::vec::IntoIter<Token> {
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        Ok(self.next())
    }
}

#[cfg(test)]
fn texts(source: &str) -> Vec<String> {
    Lexer::for_source(source)
        .map(|token| token.unwrap())
        .filter(|token| token.kind != TokenKind::Space)
        .map(|token| token.text)
        .collect()
}

#[test]
fn test_pipeline_head() {
    assert_eq!(
        texts("sc.range(1,10)"),
        vec!["sc", ".", "range", "(", "1", ",", "10", ")"]
    );
}

#[test]
fn test_arrow_and_equals() {
    assert_eq!(texts("x => x == 1"), vec!["x", "=>", "x", "==", "1"]);
    assert_eq!(texts("a=b"), vec!["a", "=", "b"]);
    assert_eq!(texts("a<=b>=c!=d"), vec!["a", "<=", "b", ">=", "c", "!=", "d"]);
}

#[test]
fn test_comment_runs_to_end_of_line() {
    let mut lexer = Lexer::for_source("// map it\nx");
    let comment = lexer.next_token().unwrap().unwrap();
    assert_eq!(comment.kind, TokenKind::MetaStatement);
    assert_eq!(comment.text, "// map it\n");
    let ident = lexer.next_token().unwrap().unwrap();
    assert_eq!(ident.text, "x");
    assert_eq!(ident.line, 2);
    assert_eq!(lexer.next_token().unwrap(), None);
}
