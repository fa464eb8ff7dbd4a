use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::engine::errors::MergeError;
use crate::engine::query::{CreateTempTable, Ident, KeyShape, Projection, Relation, Select};
use crate::engine::session::Session;
use crate::shared::path::list_data_files;

/// Temp table holding the distinct incoming keys for one session.
pub const KEY_TABLE: &str = "incoming_keys";

/// Materialized set of incoming keys, scoped to the session that loaded it.
#[derive(Debug, Clone, Serialize)]
pub struct KeySet {
    pub table: String,
    pub key_columns: Vec<String>,
    pub cardinality: u64,
    pub source_files: Vec<PathBuf>,
}

impl KeySet {
    pub fn relation(&self) -> Relation {
        Relation::table(self.table.as_str())
    }

    pub fn shape(&self) -> Result<KeyShape, MergeError> {
        KeyShape::from_columns(&self.key_columns)
    }
}

/// Projects the key columns of every incoming file into one temp table.
/// Called once per session; the handle is reused for every file merged.
pub fn load_keys(
    session: &Session,
    incoming_dir: &Path,
    key_columns: &[String],
    extension: &str,
) -> Result<KeySet, MergeError> {
    let key = KeyShape::from_columns(key_columns)?;

    let files = list_data_files(incoming_dir, extension)?;
    if files.is_empty() {
        return Err(MergeError::NoIncomingData(incoming_dir.to_path_buf()));
    }
    let incoming = Relation::parquet_list(&files)?;

    let available: Vec<String> = session
        .describe(incoming.clone())
        .map_err(MergeError::query(incoming_dir))?
        .into_iter()
        .map(|c| c.name)
        .collect();
    let missing: Vec<String> = key_columns
        .iter()
        .filter(|k| !available.iter().any(|a| a.eq_ignore_ascii_case(k)))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(MergeError::SchemaMismatch { missing, available });
    }

    let create = CreateTempTable {
        name: Ident::new(KEY_TABLE),
        query: Select::from(incoming)
            .project(Projection::from_names(key_columns))
            .distinct()
            .with_non_null(key),
    };
    session
        .execute(&create)
        .map_err(MergeError::query(incoming_dir))?;

    let cardinality = session
        .count_rows(Relation::table(KEY_TABLE))
        .map_err(MergeError::query(incoming_dir))?;
    if cardinality == 0 {
        return Err(MergeError::NoIncomingData(incoming_dir.to_path_buf()));
    }

    info!(
        target: "duck_merge::keys",
        dir = %incoming_dir.display(),
        files = files.len(),
        cardinality,
        "Loaded incoming key set"
    );

    Ok(KeySet {
        table: KEY_TABLE.to_string(),
        key_columns: key_columns.to_vec(),
        cardinality,
        source_files: files,
    })
}
