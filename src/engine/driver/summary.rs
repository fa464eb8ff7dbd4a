use serde::Serialize;
use std::path::PathBuf;

use crate::engine::memory::MemorySample;
use crate::engine::merge::MergeResult;

#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub source: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IterationSummary {
    pub iteration: usize,
    pub results: Vec<MergeResult>,
    pub failures: Vec<FileFailure>,
    pub before: MemorySample,
    pub after: MemorySample,
    pub engine_memory_mb: Option<u64>,
}

impl IterationSummary {
    pub fn rows_surviving(&self) -> u64 {
        self.results.iter().map(|r| r.surviving_rows).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeRunSummary {
    pub label: String,
    pub output_dir: PathBuf,
    pub output_retained: bool,
    pub key_cardinality: u64,
    pub iterations: Vec<IterationSummary>,
    pub start: MemorySample,
    pub keys_loaded: MemorySample,
    pub end: MemorySample,
}

impl MergeRunSummary {
    pub fn files_succeeded(&self) -> usize {
        self.iterations.iter().map(|i| i.results.len()).sum()
    }

    pub fn files_failed(&self) -> usize {
        self.iterations.iter().map(|i| i.failures.len()).sum()
    }

    pub fn files_processed(&self) -> usize {
        self.files_succeeded() + self.files_failed()
    }

    pub fn rows_surviving(&self) -> u64 {
        self.iterations.iter().map(|i| i.rows_surviving()).sum()
    }

    pub fn memory_samples(&self) -> Vec<&MemorySample> {
        let mut samples = vec![&self.start, &self.keys_loaded];
        for iteration in &self.iterations {
            samples.push(&iteration.before);
            samples.push(&iteration.after);
        }
        samples.push(&self.end);
        samples
    }
}
