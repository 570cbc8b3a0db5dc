/// Binary operators accepted inside a transformation body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Modulo (`%`)
    Modulo,

    // Comparison, only valid inside an `if` condition
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
}

impl BinOp {
    pub fn arithmetic(text: &str) -> Option<Self> {
        match text {
            "+" => Some(BinOp::Add),
            "-" => Some(BinOp::Subtract),
            "*" => Some(BinOp::Multiply),
            "%" => Some(BinOp::Modulo),
            _ => None,
        }
    }

    pub fn comparison(text: &str) -> Option<Self> {
        match text {
            "==" => Some(BinOp::Equal),
            "!=" => Some(BinOp::NotEqual),
            "<" => Some(BinOp::LessThan),
            ">" => Some(BinOp::GreaterThan),
            "<=" => Some(BinOp::LessEqual),
            ">=" => Some(BinOp::GreaterEqual),
            _ => None,
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinOp::Add | BinOp::Subtract | BinOp::Multiply | BinOp::Modulo
        )
    }

    /// Source spelling; the column-expression syntax uses the same symbols.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Subtract => "-",
            BinOp::Multiply => "*",
            BinOp::Modulo => "%",
            BinOp::Equal => "==",
            BinOp::NotEqual => "!=",
            BinOp::LessThan => "<",
            BinOp::GreaterThan => ">",
            BinOp::LessEqual => "<=",
            BinOp::GreaterEqual => ">=",
        }
    }
}
