//! Recursive-descent translator for the pipeline grammar.
//!
//! ```text
//! Program := 'sc' '.' 'range' '(' Number ',' Number ')' MapOps 'collect' '(' ')'
//! MapOps  := ( '.' 'map' '(' UDF ')' )* '.'
//! UDF     := Identifier '=>' Body
//! ```
//!
//! Transformation bodies are handed to the expression compiler
//! (see [`crate::compiler`]). Text is appended to the output as each
//! production matches; a [`Translation`] only exists once the whole unit
//! has matched.

use thiserror::Error;
use tracing::debug;

use crate::ast::{Token, TokenKind};
use crate::compiler::SemanticError;
use crate::config::{RANGE_COLUMN_ALIAS, TranslatorConfig};
use crate::lexer::{LexError, Lexer, TokenSource};
use crate::output::{OutputAssembler, Translation};

/// An expected token or production did not match the lookahead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: expected {expected}, found {found}")]
pub struct SyntaxError {
    pub expected: String,
    pub found: String,
    pub line: usize,
}

/// Why a translation unit failed. Every variant is fatal to the unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("lexical error: {0}")]
    Lexical(#[from] LexError),

    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("semantic error: {0}")]
    Semantic(#[from] SemanticError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Semantic,
}

impl TranslateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslateError::Lexical(_) => ErrorKind::Lexical,
            TranslateError::Syntax(_) => ErrorKind::Syntax,
            TranslateError::Semantic(_) => ErrorKind::Semantic,
        }
    }
}

/// Translation context for one unit: token source, lookahead and output.
pub struct Translator<S: TokenSource> {
    tokens: S,
    current: Option<Token>,
    /// Line of the most recent grammar token, for end-of-input errors
    line: usize,
    config: TranslatorConfig,
    output: OutputAssembler,
}

impl<S: TokenSource> Translator<S> {
    pub fn new(tokens: S, config: TranslatorConfig) -> Self {
        Translator {
            tokens,
            current: None,
            line: 1,
            config,
            output: OutputAssembler::new(),
        }
    }

    /// Translate the whole unit.
    pub fn run(mut self) -> Result<Translation, TranslateError> {
        self.advance()?;
        self.program()?;
        Ok(self.output.finish())
    }

    /// Move the lookahead to the next grammar token, skipping whitespace and
    /// comments.
    pub(crate) fn advance(&mut self) -> Result<(), TranslateError> {
        loop {
            match self.tokens.next_token()? {
                Some(token) if token.kind.is_trivia() => continue,
                next => {
                    if let Some(token) = &next {
                        self.line = token.line;
                    }
                    self.current = next;
                    return Ok(());
                }
            }
        }
    }

    pub(crate) fn check(&self, text: &str) -> bool {
        self.current.as_ref().is_some_and(|token| token.is(text))
    }

    pub(crate) fn check_kind(&self, kind: TokenKind) -> bool {
        self.current.as_ref().is_some_and(|token| token.kind == kind)
    }

    pub(crate) fn current_symbol(&self) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|token| token.kind == TokenKind::Symbol)
            .map(|token| token.text.as_str())
    }

    /// Take the lookahead, whatever it is.
    pub(crate) fn bump(&mut self, expected: &str) -> Result<Token, TranslateError> {
        match self.current.take() {
            Some(token) => {
                self.advance()?;
                Ok(token)
            }
            None => Err(self.unexpected(expected)),
        }
    }

    pub(crate) fn expect(&mut self, text: &str) -> Result<Token, TranslateError> {
        if self.check(text) {
            self.bump(text)
        } else {
            Err(self.unexpected(format!("`{}`", text)))
        }
    }

    pub(crate) fn expect_kind(
        &mut self,
        kind: TokenKind,
        expected: &str,
    ) -> Result<Token, TranslateError> {
        if self.check_kind(kind) {
            self.bump(expected)
        } else {
            Err(self.unexpected(expected))
        }
    }

    pub(crate) fn unexpected(&self, expected: impl Into<String>) -> TranslateError {
        match &self.current {
            Some(token) => self.unexpected_token(expected, token),
            None => SyntaxError {
                expected: expected.into(),
                found: "end of input".to_string(),
                line: self.line,
            }
            .into(),
        }
    }

    pub(crate) fn unexpected_token(
        &self,
        expected: impl Into<String>,
        token: &Token,
    ) -> TranslateError {
        SyntaxError {
            expected: expected.into(),
            found: format!("`{}`", token.text.trim_end()),
            line: token.line,
        }
        .into()
    }

    /// Program := 'sc' '.' 'range' '(' Number ',' Number ')' MapOps 'collect' '(' ')'
    fn program(&mut self) -> Result<(), TranslateError> {
        self.expect("sc")?;
        self.output.push_str(&self.config.namespace);
        self.expect(".")?;
        self.expect("range")?;
        self.expect("(")?;
        let start = self.expect_kind(TokenKind::Number, "range start")?;
        self.expect(",")?;
        let end = self.expect_kind(TokenKind::Number, "range end")?;
        self.expect(")")?;
        self.output.push_str(&format!(
            ".range({},{}){}",
            start.text, end.text, RANGE_COLUMN_ALIAS
        ));

        self.map_ops()?;

        self.expect("collect")?;
        self.expect("(")?;
        self.expect(")")?;
        self.output.push_str("collect()");

        if self.current.is_some() {
            return Err(self.unexpected("end of input"));
        }
        debug!(
            transformations = self.output.symbol_table_count(),
            "pipeline translated"
        );
        Ok(())
    }

    /// Consumes every `.map(...)` stage and the `.` before `collect`.
    fn map_ops(&mut self) -> Result<(), TranslateError> {
        loop {
            self.expect(".")?;
            self.output.push_str(self.config.layout.separator());
            if self.check("collect") {
                return Ok(());
            }

            self.expect("map")?;
            self.expect("(")?;
            self.output.push_str("selectExpr(");
            self.udf()?;
            self.expect(")")?;
            self.output.push_str(")");
        }
    }

    /// UDF := Identifier '=>' Body
    fn udf(&mut self) -> Result<(), TranslateError> {
        let parameter = self.expect_kind(TokenKind::Identifier, "lambda parameter")?;
        self.expect("=>")?;
        let (text, symbols) = self.compile_body(&parameter.text)?;
        self.output.push_str(&text);
        self.output.push_symbol_table(symbols);
        Ok(())
    }
}

/// Translate `source` with the default configuration.
pub fn translate(source: &str) -> Result<Translation, TranslateError> {
    translate_with(source, &TranslatorConfig::default())
}

/// Scan the whole unit first, so a lexical error anywhere in the input is
/// reported before any grammar matching happens.
pub fn translate_with(
    source: &str,
    config: &TranslatorConfig,
) -> Result<Translation, TranslateError> {
    let tokens = Lexer::for_source(source).tokenize()?;
    debug!(tokens = tokens.len(), "scanned translation unit");
    Translator::new(tokens.into_iter(), config.clone()).run()
}

/// Translate a character stream. The stream is drained and scanned before
/// any grammar matching, like [`translate_with`].
pub fn translate_chars<I: Iterator<Item = char>>(
    chars: I,
    config: &TranslatorConfig,
) -> Result<Translation, TranslateError> {
    let tokens = Lexer::new(chars).tokenize()?;
    debug!(tokens = tokens.len(), "scanned character stream");
    Translator::new(tokens.into_iter(), config.clone()).run()
}
