use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::shared::time::file_stamp;

/// Hands out collision-free output paths as `{stamp}_{seq}.{ext}`.
///
/// Each worker owns its namer, so `seq` is strictly increasing within the
/// worker's output directory.
#[derive(Debug)]
pub struct OutputNamer {
    dir: PathBuf,
    extension: String,
    sequence: u64,
}

impl OutputNamer {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            sequence: 0,
        }
    }

    pub fn next_path(&mut self) -> PathBuf {
        self.sequence += 1;
        self.dir.join(format!(
            "{}_{}.{}",
            file_stamp(Utc::now()),
            self.sequence,
            self.extension
        ))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn issued(&self) -> u64 {
        self.sequence
    }
}
