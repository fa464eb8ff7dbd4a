use std::path::PathBuf;

use crate::engine::merge::MergeStrategy;
use crate::engine::session::EngineOptions;

/// Everything one run needs. Not modified once the run starts.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub existing_dir: PathBuf,
    pub incoming_dir: PathBuf,
    /// Run label; also names the output directory.
    pub label: String,
    /// Files rewritten per iteration; `None` or `Some(0)` means all of them.
    pub max_files: Option<usize>,
    pub iterations: usize,
    pub key_columns: Vec<String>,
    /// Output columns; empty keeps every column.
    pub columns: Vec<String>,
    pub file_extension: String,
    /// Parent of the output directory; OS temp dir when unset.
    pub output_root: Option<PathBuf>,
    pub retain_output: bool,
    pub strategy: MergeStrategy,
    /// Independent sessions merging files in parallel.
    pub workers: usize,
    pub engine: EngineOptions,
}

impl MergeConfig {
    pub fn new(
        existing_dir: impl Into<PathBuf>,
        incoming_dir: impl Into<PathBuf>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            existing_dir: existing_dir.into(),
            incoming_dir: incoming_dir.into(),
            label: label.into(),
            max_files: None,
            iterations: 1,
            key_columns: vec!["id".to_string()],
            columns: Vec::new(),
            file_extension: "parquet".to_string(),
            output_root: None,
            retain_output: true,
            strategy: MergeStrategy::Direct,
            workers: 1,
            engine: EngineOptions::default(),
        }
    }

    pub fn file_cap(&self) -> Option<usize> {
        self.max_files.filter(|&cap| cap > 0)
    }
}
