use std::fmt;
use std::path::Path;

use crate::engine::errors::MergeError;

/// A quoted SQL identifier. Embedded double quotes are doubled on render.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(String);

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.replace('"', "\"\""))
    }
}

/// A single-quoted string literal. Embedded single quotes are doubled on render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal(String);

impl Literal {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Paths reach the engine as text, so they must be valid UTF-8.
    pub fn path(path: &Path) -> Result<Self, MergeError> {
        path.to_str()
            .map(Self::new)
            .ok_or_else(|| MergeError::InvalidQuery(format!("non UTF-8 path: {}", path.display())))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.0.replace('\'', "''"))
    }
}

/// Writes items separated by `, `.
pub(crate) fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
