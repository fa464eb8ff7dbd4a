use duckdb::{Connection, params};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRow {
    pub tenant: i64,
    pub id: Option<i64>,
    pub payload: String,
}

/// Writes small parquet fixtures with a `(tenant, id, payload)` schema.
pub struct ParquetFactory {
    rows: Vec<FixtureRow>,
}

impl ParquetFactory {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn with_ids(mut self, ids: &[i64]) -> Self {
        self.rows.extend(ids.iter().map(|&id| FixtureRow {
            tenant: 1,
            id: Some(id),
            payload: format!("row-{}", id),
        }));
        self
    }

    pub fn with_keys(mut self, keys: &[(i64, i64)]) -> Self {
        self.rows.extend(keys.iter().map(|&(tenant, id)| FixtureRow {
            tenant,
            id: Some(id),
            payload: format!("row-{}-{}", tenant, id),
        }));
        self
    }

    pub fn with_null_id(mut self) -> Self {
        self.rows.push(FixtureRow {
            tenant: 1,
            id: None,
            payload: "row-null".into(),
        });
        self
    }

    pub fn create(self, path: &Path) -> PathBuf {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE fixture (tenant BIGINT, id BIGINT, payload VARCHAR)")
            .unwrap();
        for row in &self.rows {
            conn.execute(
                "INSERT INTO fixture VALUES (?, ?, ?)",
                params![row.tenant, row.id, row.payload],
            )
            .unwrap();
        }
        conn.execute_batch(&format!(
            "COPY fixture TO {} (FORMAT 'parquet')",
            quoted(path)
        ))
        .unwrap();
        path.to_path_buf()
    }

    /// Writes one file per id group as `<dir>/<n>.parquet`, n starting at 1.
    pub fn create_many(dir: &Path, groups: &[&[i64]]) -> Vec<PathBuf> {
        std::fs::create_dir_all(dir).unwrap();
        groups
            .iter()
            .enumerate()
            .map(|(i, ids)| {
                ParquetFactory::new()
                    .with_ids(ids)
                    .create(&dir.join(format!("{}.parquet", i + 1)))
            })
            .collect()
    }
}

fn quoted(path: &Path) -> String {
    format!("'{}'", path.to_str().unwrap().replace('\'', "''"))
}

/// Sorted non-null ids of a parquet file.
pub fn read_ids(path: &Path) -> Vec<i64> {
    read_rows(path).into_iter().filter_map(|r| r.id).collect()
}

/// All rows of a parquet fixture, ordered by tenant then id (NULL ids first).
pub fn read_rows(path: &Path) -> Vec<FixtureRow> {
    let conn = Connection::open_in_memory().unwrap();
    let mut stmt = conn
        .prepare(&format!(
            "SELECT tenant, id, payload FROM read_parquet({}) ORDER BY tenant, id NULLS FIRST",
            quoted(path)
        ))
        .unwrap();
    stmt.query_map([], |row| {
        Ok(FixtureRow {
            tenant: row.get(0)?,
            id: row.get(1)?,
            payload: row.get(2)?,
        })
    })
    .unwrap()
    .map(|r| r.unwrap())
    .collect()
}

/// Values of one BIGINT column of a parquet file, sorted ascending.
pub fn read_column(path: &Path, column: &str) -> Vec<i64> {
    let conn = Connection::open_in_memory().unwrap();
    let mut stmt = conn
        .prepare(&format!(
            "SELECT \"{}\" FROM read_parquet({}) ORDER BY 1",
            column.replace('"', "\"\""),
            quoted(path)
        ))
        .unwrap();
    stmt.query_map([], |row| row.get::<_, i64>(0))
        .unwrap()
        .map(|r| r.unwrap())
        .collect()
}
