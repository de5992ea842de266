//! Validated SQL identifiers.

use crate::error::{GatewayError, GatewayResult, IdentifierKind};
use std::fmt;

/// A table, column, or database name that matches `[A-Za-z_][A-Za-z0-9_]*`.
///
/// The only way to build one is [`Identifier::parse`], so any value of this
/// type is safe to place (quoted) in an identifier position of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Validate `value` as an identifier used in the given position.
    pub fn parse(kind: IdentifierKind, value: impl Into<String>) -> GatewayResult<Self> {
        let value = value.into();
        if is_valid_identifier(&value) {
            Ok(Self(value))
        } else {
            Err(GatewayError::invalid_identifier(kind, value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check `value` against `^[A-Za-z_][A-Za-z0-9_]*$` (ASCII only).
pub fn is_valid_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
