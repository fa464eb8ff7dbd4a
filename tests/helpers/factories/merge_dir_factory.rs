use crate::engine::driver::MergeConfig;
use crate::engine::session::EngineOptions;
use std::fs;
use tempfile::{TempDir, tempdir};

use super::ParquetFactory;

/// Lays out `existing/` and `incoming/` directories plus scratch and output
/// roots inside one temp dir, and returns a config pointing at them.
pub struct MergeDirFactory {
    existing: Vec<Vec<i64>>,
    incoming: Vec<Vec<i64>>,
}

impl MergeDirFactory {
    pub fn new() -> Self {
        Self {
            existing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    pub fn with_existing(mut self, ids: &[i64]) -> Self {
        self.existing.push(ids.to_vec());
        self
    }

    pub fn with_incoming(mut self, ids: &[i64]) -> Self {
        self.incoming.push(ids.to_vec());
        self
    }

    pub fn create(self) -> (TempDir, MergeConfig) {
        let root = tempdir().unwrap();
        let existing = root.path().join("existing");
        let incoming = root.path().join("incoming");
        let scratch = root.path().join("scratch");
        let output = root.path().join("output");
        for dir in [&existing, &incoming, &scratch, &output] {
            fs::create_dir_all(dir).unwrap();
        }

        let existing_groups: Vec<&[i64]> = self.existing.iter().map(Vec::as_slice).collect();
        let incoming_groups: Vec<&[i64]> = self.incoming.iter().map(Vec::as_slice).collect();
        ParquetFactory::create_many(&existing, &existing_groups);
        ParquetFactory::create_many(&incoming, &incoming_groups);

        let mut config = MergeConfig::new(existing, incoming, "test.memory_limit");
        config.output_root = Some(output);
        config.engine = EngineOptions {
            memory_limit: Some("512MB".into()),
            threads: Some(2),
            directives: vec![],
            scratch_root: Some(scratch),
        };
        (root, config)
    }
}
