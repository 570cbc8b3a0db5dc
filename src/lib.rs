pub mod ast;
pub mod classifier;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod symbols;

pub use ast::{BinOp, Token, TokenKind};
pub use compiler::SemanticError;
pub use config::{Layout, TranslatorConfig};
pub use lexer::{LexError, Lexer, TokenSource};
pub use output::Translation;
pub use parser::{
    ErrorKind, SyntaxError, TranslateError, Translator, translate, translate_chars,
    translate_with,
};
pub use symbols::{Binding, SymbolTable};
