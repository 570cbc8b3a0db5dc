use std::fmt;

/// Lexical category of a scanned character run.
///
/// A run that matches no category has no kind at all; the classifier reports
/// that as `None` and the lexer never produces a token for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Line comment or meta statement, newline-terminated
    ///
    /// # Examples
    /// ```text
    /// # import org.apache.spark._
    /// // build the pipeline
    /// ```
    MetaStatement,

    /// Member of the fixed reserved-word set
    ///
    /// # Examples
    /// ```text
    /// val
    /// if
    /// else
    /// ```
    ReservedWord,

    /// Letter or underscore, followed by letters, digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// sc
    /// range
    /// row_1
    /// ```
    Identifier,

    /// Unsigned integer literal
    ///
    /// # Examples
    /// ```text
    /// 0
    /// 1000
    /// ```
    Number,

    /// Double-quoted string, quotes included
    StringLiteral,

    /// Punctuation or operator from the fixed symbol set
    ///
    /// # Examples
    /// ```text
    /// (
    /// =>
    /// <=
    /// ```
    Symbol,

    /// Spaces, tabs, line breaks
    Space,
}

impl TokenKind {
    /// Kinds the translator skips while looking for the next grammar token.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Space | TokenKind::MetaStatement)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::MetaStatement => "meta statement",
            TokenKind::ReservedWord => "reserved word",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Symbol => "symbol",
            TokenKind::Space => "whitespace",
        };
        f.write_str(name)
    }
}

/// A classified run of source characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    /// 1-based line the token starts on
    pub line: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind, line: usize) -> Self {
        Token {
            text: text.into(),
            kind,
            line,
        }
    }

    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }
}
