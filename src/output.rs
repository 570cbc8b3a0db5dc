//! Output assembly for translated pipelines.
//!
//! The translator appends text as productions match; nothing is handed out
//! until the unit has fully matched, at which point the assembler turns into
//! an immutable [`Translation`].
//!
//! # Examples
//!
//! ```
//! use rdd_translate::translate;
//!
//! let translation = translate("sc.range(1,10).map(x => x + 1).collect()").unwrap();
//!
//! assert!(translation.text().contains(".selectExpr(\"_1 + 1 as _1\")"));
//! assert_eq!(translation.symbol_tables().len(), 1);
//! ```

use std::fmt;

use serde_json::{Value, json};

use crate::symbols::SymbolTable;

/// Accumulates output text and symbol tables during one translation.
#[derive(Debug, Default)]
pub(crate) struct OutputAssembler {
    text: String,
    symbol_tables: Vec<SymbolTable>,
}

impl OutputAssembler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn push_symbol_table(&mut self, table: SymbolTable) {
        self.symbol_tables.push(table);
    }

    pub(crate) fn symbol_table_count(&self) -> usize {
        self.symbol_tables.len()
    }

    pub(crate) fn finish(self) -> Translation {
        Translation {
            text: self.text,
            symbol_tables: self.symbol_tables,
        }
    }
}

/// A successfully translated pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    text: String,
    symbol_tables: Vec<SymbolTable>,
}

impl Translation {
    /// The translated program text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// One table per `.map(...)`, in pipeline order.
    pub fn symbol_tables(&self) -> &[SymbolTable] {
        &self.symbol_tables
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Numbered listing of every symbol table.
    pub fn symbol_report(&self) -> String {
        self.symbol_tables
            .iter()
            .enumerate()
            .map(|(index, table)| format!("Symbol Table {}:\n{}", index + 1, table))
            .collect()
    }

    pub fn to_json(&self) -> Value {
        json!({
            "output": self.text,
            "symbol_tables": self
                .symbol_tables
                .iter()
                .map(SymbolTable::to_json)
                .collect::<Vec<_>>(),
        })
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
