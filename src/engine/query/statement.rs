use std::fmt;

use super::ident::{Ident, Literal};
use super::relation::{KeyShape, Projection, Relation};

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Keeps rows whose key is not a member of `keys`. Written as
    /// `(k IN (...)) IS NOT TRUE` so rows with a NULL key survive.
    AntiJoin { key: KeyShape, keys: Relation },
    KeyNotNull(KeyShape),
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::AntiJoin { key, keys } => {
                write!(f, "({key} IN (SELECT {key} FROM {keys})) IS NOT TRUE")
            }
            Filter::KeyNotNull(key) => write!(f, "{}", key.not_null()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    distinct: bool,
    projection: Projection,
    from: Relation,
    filter: Option<Filter>,
}

impl Select {
    pub fn from(relation: Relation) -> Self {
        Self {
            distinct: false,
            projection: Projection::All,
            from: relation,
            filter: None,
        }
    }

    pub fn project(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn excluding(mut self, key: KeyShape, keys: Relation) -> Self {
        self.filter = Some(Filter::AntiJoin { key, keys });
        self
    }

    pub fn with_non_null(mut self, key: KeyShape) -> Self {
        self.filter = Some(Filter::KeyNotNull(key));
        self
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        write!(f, "{} FROM {}", self.projection, self.from)?;
        if let Some(filter) = &self.filter {
            write!(f, " WHERE {}", filter)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Parquet,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Parquet => f.write_str("'parquet'"),
        }
    }
}

/// Streams a query result straight into a file.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyTo {
    pub query: Select,
    pub target: Literal,
    pub format: FileFormat,
}

impl fmt::Display for CopyTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "COPY ({}) TO {} (FORMAT {})",
            self.query, self.target, self.format
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTempTable {
    pub name: Ident,
    pub query: Select,
}

impl fmt::Display for CreateTempTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE OR REPLACE TEMP TABLE {} AS {}", self.name, self.query)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropTable(pub Ident);

impl fmt::Display for DropTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DROP TABLE IF EXISTS {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountRows(pub Relation);

impl fmt::Display for CountRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT COUNT(1) FROM {}", self.0)
    }
}

/// Returns one `(column_name, column_type, ...)` row per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe(pub Relation);

impl fmt::Display for Describe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DESCRIBE SELECT * FROM {}", self.0)
    }
}

/// Session-level engine setting.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    MemoryLimit(Literal),
    Threads(usize),
    TempDirectory(Literal),
    /// Passed through untouched; the engine validates it.
    Raw(String),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::MemoryLimit(limit) => write!(f, "SET memory_limit = {}", limit),
            Directive::Threads(n) => write!(f, "SET threads = {}", n),
            Directive::TempDirectory(path) => write!(f, "SET temp_directory = {}", path),
            Directive::Raw(stmt) => f.write_str(stmt),
        }
    }
}
