use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::merge_config::MergeConfig;
use super::phase::RunPhase;
use super::summary::FileFailure;
use crate::engine::errors::{MergeError, RunError};
use crate::engine::keys::{KeySet, load_keys};
use crate::engine::merge::{MergeResult, MergeStrategy, OutputNamer, merge_file};
use crate::engine::query::Projection;
use crate::engine::session::Session;

pub(crate) type FileOutcome = Result<MergeResult, FileFailure>;

/// A session with its own key set and output sequence. Workers never share
/// engine state.
pub(crate) struct Worker {
    id: usize,
    session: Session,
    key_set: KeySet,
    namer: OutputNamer,
}

impl Worker {
    pub(crate) fn open_session(config: &MergeConfig) -> Result<Session, RunError> {
        Session::open(&config.engine).map_err(|e| RunError::new(RunPhase::SessionOpen, e))
    }

    /// Loads the key set into `session`. On failure the session is released
    /// before the error is returned.
    pub(crate) fn with_keys(
        id: usize,
        session: Session,
        config: &MergeConfig,
        output_dir: &Path,
    ) -> Result<Self, RunError> {
        let key_set = match load_keys(
            &session,
            &config.incoming_dir,
            &config.key_columns,
            &config.file_extension,
        ) {
            Ok(key_set) => key_set,
            Err(e) => {
                if let Err(close_err) = session.close() {
                    close_err.log_error();
                }
                return Err(RunError::new(RunPhase::KeysLoaded, e));
            }
        };

        let namer_dir: PathBuf = if config.workers > 1 {
            let dir = output_dir.join(format!("worker-{}", id));
            fs::create_dir_all(&dir)
                .map_err(|e| RunError::new(RunPhase::KeysLoaded, MergeError::Io(e)))?;
            dir
        } else {
            output_dir.to_path_buf()
        };

        let namer = OutputNamer::new(namer_dir, config.file_extension.as_str());
        info!(
            target: "duck_merge::driver",
            worker = id,
            keys = key_set.cardinality,
            output = %namer.dir().display(),
            "Worker ready"
        );
        Ok(Self {
            id,
            session,
            key_set,
            namer,
        })
    }

    pub(crate) fn key_set(&self) -> &KeySet {
        &self.key_set
    }

    pub(crate) fn engine_memory_mb(&self) -> Option<u64> {
        self.session.engine_memory_mb()
    }

    /// Merges `files` in order. A failing file is recorded and skipped.
    pub(crate) fn process(
        &mut self,
        files: Vec<(usize, PathBuf)>,
        columns: &Projection,
        strategy: MergeStrategy,
    ) -> Vec<(usize, FileOutcome)> {
        files
            .into_iter()
            .map(|(index, file)| {
                info!(target: "duck_merge::driver", worker = self.id, file = %file.display(), "Processing existing file");
                let output = self.namer.next_path();
                let outcome = merge_file(
                    &self.session,
                    &self.key_set,
                    &file,
                    &output,
                    columns,
                    strategy,
                )
                .map_err(|e| {
                    e.log_error();
                    warn!(target: "duck_merge::driver", worker = self.id, file = %file.display(), "Skipping file");
                    FileFailure {
                        source: file.clone(),
                        error: e.to_string(),
                    }
                });
                (index, outcome)
            })
            .collect()
    }

    pub(crate) fn close(self) -> Result<(), MergeError> {
        info!(target: "duck_merge::driver", worker = self.id, files = self.namer.issued(), "Closing worker session");
        self.session.close()
    }
}
