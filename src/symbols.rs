//! Per-transformation symbol tables.

use std::fmt;

use serde_json::{Map, Value, json};

use crate::compiler::SemanticError;

/// What a bound name stands for inside one transformation body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// The lambda parameter; references render as the first positional column
    Parameter,
    /// A `val` binding, stored as ready-to-insert column-expression text
    Expression {
        text: String,
        /// Has a top-level arithmetic operator, so it needs parentheses when
        /// spliced next to another operator
        compound: bool,
    },
}

/// Bound names of one transformation, in binding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    entries: Vec<(String, Binding)>,
}

impl SymbolTable {
    /// Start a table whose only entry is the lambda parameter.
    pub fn with_parameter(name: impl Into<String>) -> Self {
        SymbolTable {
            entries: vec![(name.into(), Binding::Parameter)],
        }
    }

    pub fn parameter(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, binding)| *binding == Binding::Parameter)
            .map(|(name, _)| name.as_str())
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.entries
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, binding)| binding)
    }

    /// Record a `val` binding. The parameter entry is never overwritten and
    /// a name can only be bound once per body.
    pub fn bind(
        &mut self,
        name: impl Into<String>,
        text: impl Into<String>,
        compound: bool,
    ) -> Result<(), SemanticError> {
        let name = name.into();
        match self.lookup(&name) {
            Some(Binding::Parameter) => Err(SemanticError::ParameterRebound(name)),
            Some(Binding::Expression { .. }) => Err(SemanticError::DuplicateBinding(name)),
            None => {
                self.entries.push((
                    name,
                    Binding::Expression {
                        text: text.into(),
                        compound,
                    },
                ));
                Ok(())
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.entries
            .iter()
            .map(|(name, binding)| (name.as_str(), binding))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `{"parameter": "x", "bindings": {"y": "_1 + 1"}}`
    pub fn to_json(&self) -> Value {
        let bindings: Map<String, Value> = self
            .iter()
            .filter_map(|(name, binding)| match binding {
                Binding::Parameter => None,
                Binding::Expression { text, .. } => {
                    Some((name.to_string(), Value::String(text.clone())))
                }
            })
            .collect();

        json!({
            "parameter": self.parameter(),
            "bindings": bindings,
        })
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, binding) in self.iter() {
            match binding {
                Binding::Parameter => writeln!(f, "key: {}, val: <parameter>", name)?,
                Binding::Expression { text, .. } => writeln!(f, "key: {}, val: {}", name, text)?,
            }
        }
        Ok(())
    }
}
