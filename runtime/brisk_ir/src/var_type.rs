//! Declared types of macro-language variables.

use std::fmt;

/// The type a symbol is declared with.
///
/// A symbol only ever holds values of its declared type unless it is flagged
/// polymorphic, in which case the type follows the last assignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VarType {
    Int,
    Float,
    Str,
    List,
}

impl VarType {
    /// The name the macro language uses for this type (`typeof` result).
    pub const fn as_str(self) -> &'static str {
        match self {
            VarType::Int => "integer",
            VarType::Float => "float",
            VarType::Str => "string",
            VarType::List => "list",
        }
    }

    /// Whether values of this type are numeric.
    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self, VarType::Int | VarType::Float)
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
