use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::engine::errors::MergeError;
use crate::engine::keys::KeySet;
use crate::engine::query::{
    CopyTo, CreateTempTable, DropTable, FileFormat, Ident, Literal, Projection, Relation, Select,
};
use crate::engine::session::Session;

/// Temp table an existing file is copied into under [`MergeStrategy::Staged`].
pub const STAGE_TABLE: &str = "existing_stage";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Anti-join straight from the existing file into the output file.
    #[default]
    Direct,
    /// Materialize the existing file into a temp table first, then anti-join
    /// from the table and drop it.
    Staged,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeResult {
    pub source: PathBuf,
    pub output: PathBuf,
    pub surviving_rows: u64,
    pub elapsed_ms: u64,
}

/// Rewrites `existing_file` into `output_path`, keeping only rows whose key
/// is not in `key_set`. Neither the source file nor the key set is touched.
pub fn merge_file(
    session: &Session,
    key_set: &KeySet,
    existing_file: &Path,
    output_path: &Path,
    columns: &Projection,
    strategy: MergeStrategy,
) -> Result<MergeResult, MergeError> {
    let started = Instant::now();
    let key = key_set.shape()?;
    let target = Literal::path(output_path)?;
    let source = Relation::parquet_file(existing_file)?;

    if output_path.exists() {
        debug!(target: "duck_merge::merge", output = %output_path.display(), "Removing stale output");
        fs::remove_file(output_path)?;
    }

    let rewrite = |from: Relation| CopyTo {
        query: Select::from(from)
            .project(columns.clone())
            .excluding(key.clone(), key_set.relation()),
        target: target.clone(),
        format: FileFormat::Parquet,
    };

    match strategy {
        MergeStrategy::Direct => session
            .execute(&rewrite(source))
            .map_err(MergeError::query(existing_file))?,
        MergeStrategy::Staged => {
            let stage = Ident::new(STAGE_TABLE);
            session
                .execute(&CreateTempTable {
                    name: stage.clone(),
                    query: Select::from(source),
                })
                .map_err(MergeError::query(existing_file))?;

            let copied = session.execute(&rewrite(Relation::Table(stage.clone())));
            // The stage table must not outlive this file, even when the copy failed.
            if let Err(e) = session.execute(&DropTable(stage)) {
                warn!(target: "duck_merge::merge", error = %e, "Failed to drop stage table");
            }
            copied.map_err(MergeError::query(existing_file))?;
        }
    }

    let surviving_rows = session
        .count_rows(Relation::ParquetFile(target))
        .map_err(MergeError::query(existing_file))?;

    let result = MergeResult {
        source: existing_file.to_path_buf(),
        output: output_path.to_path_buf(),
        surviving_rows,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        target: "duck_merge::merge",
        source = %result.source.display(),
        output = %result.output.display(),
        rows = result.surviving_rows,
        elapsed_ms = result.elapsed_ms,
        "Rewrote existing file"
    );
    Ok(result)
}
