//! Expression compiler for transformation bodies.
//!
//! Turns the body of one `.map(p => ...)` into the argument list of a
//! `selectExpr` call. The parameter `p` is aliased to the first positional
//! column `_1`, `p.f` becomes the column `f`, and every `val` binding becomes
//! a text fragment spliced wherever the bound name is referenced.
//!
//! # Two emission modes
//!
//! The terminal expression of a body is written straight into the current
//! column. The right-hand side of a `val` binding is not: its tokens are
//! pushed onto an [`ExpressionStack`], and once the expression is complete
//! the stack is unwound right to left into the binding's substitution text.
//!
//! ```text
//! x => { val y = x * 2; (y, x % 3) }
//!
//! stack for y:   Identifier(x) Operator(*) Number(2)
//! symbols:       x -> <parameter>, y -> "_1 * 2"
//! output:        "_1 * 2 as _1", "_1 % 3 as _2"
//! ```

use std::mem;

use thiserror::Error;
use tracing::debug;

use crate::ast::{BinOp, Token, TokenKind};
use crate::lexer::TokenSource;
use crate::parser::{TranslateError, Translator};
use crate::symbols::{Binding, SymbolTable};

/// The first positional column; every bare parameter reference renders as it.
pub const PARAMETER_COLUMN: &str = "_1";

/// Misuse of names inside a transformation body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("`{0}` used before declaration")]
    UndeclaredName(String),

    #[error("numeric literal `{0}` in a field access")]
    NumericField(String),

    #[error("field access on `{0}`, which is not the transformation parameter")]
    FieldOnBinding(String),

    #[error("`{0}` is the transformation parameter and cannot be rebound")]
    ParameterRebound(String),

    #[error("`{0}` is already bound in this transformation")]
    DuplicateBinding(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuation {
    Open,
    Close,
    Dot,
}

/// Pieces of `if (cond) a else b`, rendered as `if(cond, a, b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conditional {
    /// `if (`
    If,
    /// The `)` closing the condition
    Then,
    Else,
    /// End of the else branch; has no source token
    End,
}

/// One consumed token of a binding's right-hand side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackEntry {
    Identifier(String),
    Number(String),
    Operator(BinOp),
    Punctuation(Punctuation),
    Conditional(Conditional),
}

impl StackEntry {
    /// Text for entries that need no symbol lookup.
    pub fn verbatim(&self) -> String {
        match self {
            StackEntry::Identifier(text) | StackEntry::Number(text) => text.clone(),
            StackEntry::Operator(op) => format!(" {} ", op.symbol()),
            StackEntry::Punctuation(Punctuation::Open) => "(".to_string(),
            StackEntry::Punctuation(Punctuation::Close) => ")".to_string(),
            StackEntry::Punctuation(Punctuation::Dot) => ".".to_string(),
            StackEntry::Conditional(Conditional::If) => "if(".to_string(),
            StackEntry::Conditional(Conditional::Then | Conditional::Else) => ", ".to_string(),
            StackEntry::Conditional(Conditional::End) => ")".to_string(),
        }
    }

    fn is_arithmetic(entry: Option<&StackEntry>) -> bool {
        matches!(entry, Some(StackEntry::Operator(op)) if op.is_arithmetic())
    }

    fn is_dot(entry: Option<&StackEntry>) -> bool {
        matches!(entry, Some(StackEntry::Punctuation(Punctuation::Dot)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpressionStack {
    entries: Vec<StackEntry>,
}

impl ExpressionStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: StackEntry) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<StackEntry> {
        self.entries.pop()
    }

    pub fn peek(&self) -> Option<&StackEntry> {
        self.entries.last()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pop every entry and assemble the substitution text, resolving names
    /// against `symbols`. Returns the text and whether it has a top-level
    /// arithmetic operator.
    ///
    /// An identifier whose left neighbour is `.` is a field name and stays
    /// as is. An identifier whose right neighbour is `.` qualifies that field
    /// and must be the parameter; it renders nothing.
    pub fn unwind(&mut self, symbols: &SymbolTable) -> Result<(String, bool), SemanticError> {
        let mut pieces = Vec::with_capacity(self.entries.len());
        let mut right: Option<StackEntry> = None;
        let mut depth = 0usize;
        let mut compound = false;

        while let Some(entry) = self.pop() {
            let piece = match &entry {
                StackEntry::Identifier(field) if StackEntry::is_dot(self.peek()) => field.clone(),
                StackEntry::Identifier(qualifier) if StackEntry::is_dot(right.as_ref()) => {
                    match symbols.lookup(qualifier) {
                        Some(Binding::Parameter) => String::new(),
                        Some(Binding::Expression { .. }) => {
                            return Err(SemanticError::FieldOnBinding(qualifier.clone()));
                        }
                        None => return Err(SemanticError::UndeclaredName(qualifier.clone())),
                    }
                }
                StackEntry::Identifier(name) => {
                    let spliced = StackEntry::is_arithmetic(self.peek())
                        || StackEntry::is_arithmetic(right.as_ref());
                    substitute(symbols, name, spliced)?
                }
                StackEntry::Punctuation(Punctuation::Dot) => String::new(),
                StackEntry::Operator(op) => {
                    if depth == 0 && op.is_arithmetic() {
                        compound = true;
                    }
                    entry.verbatim()
                }
                StackEntry::Punctuation(Punctuation::Close)
                | StackEntry::Conditional(Conditional::End) => {
                    depth += 1;
                    entry.verbatim()
                }
                StackEntry::Punctuation(Punctuation::Open)
                | StackEntry::Conditional(Conditional::If) => {
                    depth = depth.saturating_sub(1);
                    entry.verbatim()
                }
                StackEntry::Number(_)
                | StackEntry::Conditional(Conditional::Then | Conditional::Else) => {
                    entry.verbatim()
                }
            };
            pieces.push(piece);
            right = Some(entry);
        }

        pieces.reverse();
        Ok((pieces.concat(), compound))
    }
}

/// Render a bare name reference. `spliced` means an arithmetic operator sits
/// next to the reference, so compound substitutions get parentheses.
fn substitute(symbols: &SymbolTable, name: &str, spliced: bool) -> Result<String, SemanticError> {
    match symbols.lookup(name) {
        Some(Binding::Parameter) => Ok(PARAMETER_COLUMN.to_string()),
        Some(Binding::Expression { text, compound }) if *compound && spliced => {
            Ok(format!("({})", text))
        }
        Some(Binding::Expression { text, .. }) => Ok(text.clone()),
        None => Err(SemanticError::UndeclaredName(name.to_string())),
    }
}

/// Column-expression text of one transformation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledExpression {
    current: String,
    columns: Vec<String>,
}

impl CompiledExpression {
    pub fn push_str(&mut self, text: &str) {
        self.current.push_str(text);
    }

    pub fn parenthesize_current(&mut self) {
        self.current = format!("({})", self.current);
    }

    pub fn finish_column(&mut self) {
        self.columns.push(mem::take(&mut self.current));
    }

    /// Number of finished columns.
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    /// `"e1 as _1", "e2 as _2", ...`
    pub fn render(&self) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| format!("\"{} as _{}\"", column, index + 1))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Translation state scoped to one transformation body.
#[derive(Debug)]
pub(crate) struct BodyState {
    pub(crate) symbols: SymbolTable,
    pub(crate) stack: ExpressionStack,
    pub(crate) compiled: CompiledExpression,
    /// Set while a `val` right-hand side is being collected on the stack
    pub(crate) in_binding: bool,
    /// The last direct emission was an arithmetic operator
    after_operator: bool,
}

impl BodyState {
    pub(crate) fn new(parameter: &str) -> Self {
        BodyState {
            symbols: SymbolTable::with_parameter(parameter),
            stack: ExpressionStack::new(),
            compiled: CompiledExpression::default(),
            in_binding: false,
            after_operator: false,
        }
    }

    fn emit(&mut self, entry: StackEntry) {
        if self.in_binding {
            self.stack.push(entry);
            return;
        }
        self.after_operator = StackEntry::is_arithmetic(Some(&entry));
        self.compiled.push_str(&entry.verbatim());
    }

    fn emit_text(&mut self, text: &str) {
        self.after_operator = false;
        self.compiled.push_str(text);
    }
}

impl<S: TokenSource> Translator<S> {
    /// Body := '{' ComplexExpr '}' | SimpleExpr
    pub(crate) fn compile_body(
        &mut self,
        parameter: &str,
    ) -> Result<(String, SymbolTable), TranslateError> {
        let mut body = BodyState::new(parameter);

        if self.check("{") {
            self.advance()?;
            self.complex_expr(&mut body)?;
            self.expect("}")?;
        } else {
            self.simple_expr(&mut body)?;
        }

        let text = body.compiled.render();
        debug!(parameter, columns = body.compiled.arity(), text = %text, "compiled transformation");
        Ok((text, body.symbols))
    }

    fn complex_expr(&mut self, body: &mut BodyState) -> Result<(), TranslateError> {
        while self.check("val") {
            self.assign_expr(body)?;
            if self.check(";") {
                self.advance()?;
            }
        }
        self.simple_expr(body)
    }

    /// AssignExpr := 'val' Identifier '=' PureExpr
    fn assign_expr(&mut self, body: &mut BodyState) -> Result<(), TranslateError> {
        self.expect("val")?;
        let name = self.expect_kind(TokenKind::Identifier, "binding name")?;
        self.expect("=")?;

        body.stack.clear();
        body.in_binding = true;
        self.pure_expr(body)?;
        body.in_binding = false;

        let (text, compound) = body.stack.unwind(&body.symbols)?;
        debug!(name = %name.text, text = %text, "bound name");
        body.symbols.bind(name.text, text, compound)?;
        Ok(())
    }

    /// SimpleExpr := '(' TupleExpr ')' | PureExpr
    fn simple_expr(&mut self, body: &mut BodyState) -> Result<(), TranslateError> {
        if !self.check("(") {
            self.pure_expr(body)?;
            body.compiled.finish_column();
            return Ok(());
        }

        self.advance()?;
        self.pure_expr(body)?;
        let mut arity = 1;
        while self.check(",") {
            self.advance()?;
            body.compiled.finish_column();
            self.pure_expr(body)?;
            arity += 1;
        }
        self.expect(")")?;

        // `(x + 1) * 2` groups a single expression rather than forming a tuple
        if arity == 1 && self.current_arithmetic().is_some() {
            body.compiled.parenthesize_current();
            body.after_operator = false;
            self.operator_tail(body)?;
        }
        body.compiled.finish_column();
        Ok(())
    }

    /// PureExpr := Primary (Op Primary)*
    fn pure_expr(&mut self, body: &mut BodyState) -> Result<(), TranslateError> {
        self.primary(body)?;
        self.operator_tail(body)
    }

    /// Primary := Operand
    ///          | '(' PureExpr ')'
    ///          | 'if' '(' PureExpr Comp PureExpr ')' PureExpr 'else' PureExpr
    fn primary(&mut self, body: &mut BodyState) -> Result<(), TranslateError> {
        if self.check_kind(TokenKind::Identifier) || self.check_kind(TokenKind::Number) {
            self.operand(body)
        } else if self.check("(") {
            self.advance()?;
            body.emit(StackEntry::Punctuation(Punctuation::Open));
            self.pure_expr(body)?;
            self.expect(")")?;
            body.emit(StackEntry::Punctuation(Punctuation::Close));
            Ok(())
        } else if self.check("if") {
            self.conditional(body)
        } else {
            Err(self.unexpected("expression"))
        }
    }

    /// Operator chains are consumed iteratively, one primary per operator.
    fn operator_tail(&mut self, body: &mut BodyState) -> Result<(), TranslateError> {
        while let Some(op) = self.current_arithmetic() {
            self.advance()?;
            body.emit(StackEntry::Operator(op));
            self.primary(body)?;
        }
        Ok(())
    }

    fn conditional(&mut self, body: &mut BodyState) -> Result<(), TranslateError> {
        self.expect("if")?;
        self.expect("(")?;
        body.emit(StackEntry::Conditional(Conditional::If));

        self.pure_expr(body)?;
        let op = self
            .current_comparison()
            .ok_or_else(|| self.unexpected("comparison operator"))?;
        self.advance()?;
        body.emit(StackEntry::Operator(op));
        self.pure_expr(body)?;

        self.expect(")")?;
        body.emit(StackEntry::Conditional(Conditional::Then));
        self.pure_expr(body)?;

        self.expect("else")?;
        body.emit(StackEntry::Conditional(Conditional::Else));
        self.pure_expr(body)?;

        body.emit(StackEntry::Conditional(Conditional::End));
        Ok(())
    }

    /// (Identifier | Number) ('.' Identifier)?
    fn operand(&mut self, body: &mut BodyState) -> Result<(), TranslateError> {
        let token = self.bump("expression")?;

        if self.check(".") {
            self.advance()?;
            let field = self.bump("field name")?;
            return self.field_access(body, token, field);
        }

        match token.kind {
            TokenKind::Number => body.emit(StackEntry::Number(token.text)),
            _ if body.in_binding => body.emit(StackEntry::Identifier(token.text)),
            _ => {
                let spliced = body.after_operator || self.current_arithmetic().is_some();
                let text = substitute(&body.symbols, &token.text, spliced)?;
                body.emit_text(&text);
            }
        }
        Ok(())
    }

    /// `p.f` renders as the column `f`; only the parameter has fields.
    fn field_access(
        &mut self,
        body: &mut BodyState,
        qualifier: Token,
        field: Token,
    ) -> Result<(), TranslateError> {
        match (qualifier.kind, field.kind) {
            (TokenKind::Number, _) => {
                let literal = format!("{}.{}", qualifier.text, field.text);
                Err(SemanticError::NumericField(literal).into())
            }
            (_, TokenKind::Number) => Err(SemanticError::NumericField(field.text).into()),
            (_, TokenKind::Identifier) if body.in_binding => {
                body.emit(StackEntry::Identifier(qualifier.text));
                body.emit(StackEntry::Punctuation(Punctuation::Dot));
                body.emit(StackEntry::Identifier(field.text));
                Ok(())
            }
            (_, TokenKind::Identifier) => match body.symbols.lookup(&qualifier.text) {
                Some(Binding::Parameter) => {
                    body.emit_text(&field.text);
                    Ok(())
                }
                Some(Binding::Expression { .. }) => {
                    Err(SemanticError::FieldOnBinding(qualifier.text).into())
                }
                None => Err(SemanticError::UndeclaredName(qualifier.text).into()),
            },
            _ => Err(self.unexpected_token("field name", &field)),
        }
    }

    fn current_arithmetic(&self) -> Option<BinOp> {
        self.current_symbol().and_then(BinOp::arithmetic)
    }

    fn current_comparison(&self) -> Option<BinOp> {
        self.current_symbol().and_then(BinOp::comparison)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SymbolTable {
        let mut symbols = SymbolTable::with_parameter("x");
        symbols.bind("y", "_1 + 1", true).unwrap();
        symbols.bind("z", "_2", false).unwrap();
        symbols
    }

    fn stack(entries: Vec<StackEntry>) -> ExpressionStack {
        let mut stack = ExpressionStack::new();
        for entry in entries {
            stack.push(entry);
        }
        stack
    }

    fn ident(name: &str) -> StackEntry {
        StackEntry::Identifier(name.to_string())
    }

    #[test]
    fn test_unwind_rewrites_bare_parameter() {
        let mut entries = stack(vec![
            ident("x"),
            StackEntry::Operator(BinOp::Multiply),
            StackEntry::Number("2".to_string()),
        ]);
        let (text, compound) = entries.unwind(&table()).unwrap();
        assert_eq!(text, "_1 * 2");
        assert!(compound);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_unwind_field_access_keeps_field_name() {
        let mut entries = stack(vec![
            ident("x"),
            StackEntry::Punctuation(Punctuation::Dot),
            ident("_2"),
            StackEntry::Operator(BinOp::Add),
            StackEntry::Number("1".to_string()),
        ]);
        let (text, _) = entries.unwind(&table()).unwrap();
        assert_eq!(text, "_2 + 1");
    }

    #[test]
    fn test_unwind_parenthesizes_compound_binding_next_to_operator() {
        let mut entries = stack(vec![
            ident("y"),
            StackEntry::Operator(BinOp::Multiply),
            ident("z"),
        ]);
        let (text, _) = entries.unwind(&table()).unwrap();
        assert_eq!(text, "(_1 + 1) * _2");
    }

    #[test]
    fn test_unwind_conditional_is_not_compound() {
        let mut entries = stack(vec![
            StackEntry::Conditional(Conditional::If),
            ident("x"),
            StackEntry::Operator(BinOp::GreaterThan),
            StackEntry::Number("3".to_string()),
            StackEntry::Conditional(Conditional::Then),
            ident("x"),
            StackEntry::Operator(BinOp::Add),
            StackEntry::Number("1".to_string()),
            StackEntry::Conditional(Conditional::Else),
            StackEntry::Number("0".to_string()),
            StackEntry::Conditional(Conditional::End),
        ]);
        let (text, compound) = entries.unwind(&table()).unwrap();
        assert_eq!(text, "if(_1 > 3, _1 + 1, 0)");
        assert!(!compound);
    }

    #[test]
    fn test_unwind_rejects_undeclared_and_field_on_binding() {
        let mut undeclared = stack(vec![ident("w")]);
        assert_eq!(
            undeclared.unwind(&table()),
            Err(SemanticError::UndeclaredName("w".to_string()))
        );

        let mut field_on_binding = stack(vec![
            ident("y"),
            StackEntry::Punctuation(Punctuation::Dot),
            ident("a"),
        ]);
        assert_eq!(
            field_on_binding.unwind(&table()),
            Err(SemanticError::FieldOnBinding("y".to_string()))
        );
    }

    #[test]
    fn test_render_columns() {
        let mut compiled = CompiledExpression::default();
        compiled.push_str("_1");
        compiled.finish_column();
        compiled.push_str("_1 + 1");
        compiled.finish_column();
        assert_eq!(compiled.arity(), 2);
        assert_eq!(compiled.render(), "\"_1 as _1\", \"_1 + 1 as _2\"");
    }
}
