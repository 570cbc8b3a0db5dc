//! # Pipeline source model
//!
//! Lexical tokens and operators shared by the lexer, the translator and the
//! expression compiler.
//!
//! ## Accepted input
//!
//! ```text
//! sc.range(1,10)
//!   .map(x => { val y = x * 2; (x, y + 1) })
//!   .map(p => if (p._1 > 5) p._2 else 0)
//!   .collect()
//! ```
//!
//! - **[tokens]** - Tokens and their lexical kinds
//! - **[operators]** - Arithmetic and comparison operators
pub mod operators;
pub mod tokens;

pub use operators::BinOp;
pub use tokens::{Token, TokenKind};
