use duckdb::Connection;
use std::fmt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use super::options::EngineOptions;
use crate::engine::errors::MergeError;
use crate::engine::query::{CountRows, Describe, Relation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
}

/// One configured engine instance bound to one scratch directory.
///
/// Field order matters: the connection is dropped before the scratch
/// directory is removed, on every exit path including unwinding.
pub struct Session {
    conn: Connection,
    scratch: TempDir,
}

impl Session {
    pub fn open(options: &EngineOptions) -> Result<Self, MergeError> {
        let root = options
            .scratch_root
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let scratch = tempfile::Builder::new()
            .prefix("duck_merge-scratch-")
            .tempdir_in(&root)
            .map_err(|source| MergeError::ScratchDir {
                path: root.clone(),
                source,
            })?;
        info!(target: "duck_merge::session", scratch = %scratch.path().display(), "Created scratch directory");

        let conn = Connection::open_in_memory().map_err(MergeError::EngineUnavailable)?;
        for directive in options.directives(scratch.path())? {
            debug!(target: "duck_merge::sql", sql = %directive, "Applying engine directive");
            conn.execute_batch(&directive.to_string())
                .map_err(MergeError::EngineUnavailable)?;
        }

        Ok(Self { conn, scratch })
    }

    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    pub fn execute<S: fmt::Display>(&self, statement: &S) -> duckdb::Result<()> {
        let sql = statement.to_string();
        debug!(target: "duck_merge::sql", sql = %sql, "Executing statement");
        self.conn.execute_batch(&sql)
    }

    pub fn count_rows(&self, relation: Relation) -> duckdb::Result<u64> {
        let sql = CountRows(relation).to_string();
        debug!(target: "duck_merge::sql", sql = %sql, "Counting rows");
        let count = self.conn.query_row(&sql, [], |row| row.get::<_, i64>(0))?;
        Ok(count.max(0) as u64)
    }

    pub fn describe(&self, relation: Relation) -> duckdb::Result<Vec<ColumnInfo>> {
        let sql = Describe(relation).to_string();
        debug!(target: "duck_merge::sql", sql = %sql, "Describing relation");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(ColumnInfo {
                name: row.get(0)?,
                data_type: row.get(1)?,
            })
        })?;
        rows.collect()
    }

    /// Buffer memory the engine reports as in use, if it can tell.
    pub fn engine_memory_mb(&self) -> Option<u64> {
        self.conn
            .query_row(
                "SELECT CAST(COALESCE(SUM(memory_usage_bytes), 0) AS BIGINT) FROM duckdb_memory()",
                [],
                |row| row.get::<_, i64>(0),
            )
            .ok()
            .map(|bytes| bytes.max(0) as u64 / (1024 * 1024))
    }

    /// Closes the connection, then removes the scratch directory.
    pub fn close(self) -> Result<(), MergeError> {
        let Session { conn, scratch } = self;
        let scratch_path: PathBuf = scratch.path().to_path_buf();

        if let Err((conn, e)) = conn.close() {
            warn!(target: "duck_merge::session", error = %e, "Connection did not close cleanly");
            drop(conn);
        }

        scratch.close().map_err(|source| MergeError::ScratchDir {
            path: scratch_path.clone(),
            source,
        })?;
        info!(target: "duck_merge::session", scratch = %scratch_path.display(), "Removed scratch directory");
        Ok(())
    }
}
