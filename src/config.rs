//! Translator configuration.

/// Identifier `sc` is replaced with by default.
pub const DEFAULT_NAMESPACE: &str = "spark";

/// Appended to `range(a,b)` so the generated `id` column becomes `_1`.
pub const RANGE_COLUMN_ALIAS: &str = ".selectExpr(\"id as _1\")";

/// How chained calls after `range(...)` are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One call per line, indented under the receiver
    #[default]
    Stacked,
    /// Everything on one line
    Inline,
}

impl Layout {
    /// Text placed before each chained call, including the dot.
    pub fn separator(self) -> &'static str {
        match self {
            Layout::Stacked => "\n     .",
            Layout::Inline => ".",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorConfig {
    pub namespace: String,
    pub layout: Layout,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig {
            namespace: DEFAULT_NAMESPACE.to_string(),
            layout: Layout::default(),
        }
    }
}

impl TranslatorConfig {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}
