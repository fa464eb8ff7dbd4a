use std::fmt;
use std::path::Path;

use super::ident::{Ident, Literal, write_list};
use crate::engine::errors::MergeError;

/// Something a query can read rows from.
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
    ParquetFile(Literal),
    /// Several files scanned as one relation.
    ParquetList(Vec<Literal>),
    Table(Ident),
}

impl Relation {
    pub fn parquet_file(path: &Path) -> Result<Self, MergeError> {
        Ok(Relation::ParquetFile(Literal::path(path)?))
    }

    pub fn parquet_list<P: AsRef<Path>>(paths: &[P]) -> Result<Self, MergeError> {
        if paths.is_empty() {
            return Err(MergeError::InvalidQuery("empty file list".into()));
        }
        let literals = paths
            .iter()
            .map(|p| Literal::path(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Relation::ParquetList(literals))
    }

    pub fn table(name: impl Into<String>) -> Self {
        Relation::Table(Ident::new(name))
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::ParquetFile(path) => write!(f, "read_parquet({})", path),
            Relation::ParquetList(paths) => {
                f.write_str("read_parquet([")?;
                write_list(f, paths)?;
                f.write_str("])")
            }
            Relation::Table(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Projection {
    #[default]
    All,
    Columns(Vec<Ident>),
}

impl Projection {
    /// An empty column list selects every column.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        if names.is_empty() {
            Projection::All
        } else {
            Projection::Columns(names.iter().map(|n| Ident::new(n.as_ref())).collect())
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::All => f.write_str("*"),
            Projection::Columns(cols) => write_list(f, cols),
        }
    }
}

/// Shape of the merge key. A composite key is compared as a tuple.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyShape {
    Single(Ident),
    Composite(Vec<Ident>),
}

impl KeyShape {
    pub fn from_columns<S: AsRef<str>>(columns: &[S]) -> Result<Self, MergeError> {
        match columns {
            [] => Err(MergeError::InvalidQuery("key column list is empty".into())),
            [single] => Ok(KeyShape::Single(Ident::new(single.as_ref()))),
            many => Ok(KeyShape::Composite(
                many.iter().map(|c| Ident::new(c.as_ref())).collect(),
            )),
        }
    }

    pub fn columns(&self) -> &[Ident] {
        match self {
            KeyShape::Single(col) => std::slice::from_ref(col),
            KeyShape::Composite(cols) => cols,
        }
    }

    /// `"a" IS NOT NULL AND "b" IS NOT NULL`
    pub(crate) fn not_null(&self) -> NotNull<'_> {
        NotNull(self)
    }
}

impl fmt::Display for KeyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyShape::Single(col) => write!(f, "{}", col),
            KeyShape::Composite(cols) => {
                f.write_str("(")?;
                write_list(f, cols)?;
                f.write_str(")")
            }
        }
    }
}

pub(crate) struct NotNull<'a>(&'a KeyShape);

impl fmt::Display for NotNull<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, col) in self.0.columns().iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{} IS NOT NULL", col)?;
        }
        Ok(())
    }
}
