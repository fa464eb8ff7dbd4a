use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error};

use crate::engine::driver::RunPhase;

/// Errors raised while opening a session, loading keys or rewriting files.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(#[source] duckdb::Error),

    #[error("Scratch directory could not be created under {path}: {source}")]
    ScratchDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No incoming data in {0}")]
    NoIncomingData(PathBuf),

    #[error("Key columns {missing:?} not found in incoming schema {available:?}")]
    SchemaMismatch {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("Query failed for {file}: {source}")]
    QueryExecution {
        file: PathBuf,
        #[source]
        source: duckdb::Error,
    },

    #[error("Invalid query input: {0}")]
    InvalidQuery(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MergeError {
    pub(crate) fn query(file: impl Into<PathBuf>) -> impl FnOnce(duckdb::Error) -> Self {
        let file = file.into();
        move |source| MergeError::QueryExecution { file, source }
    }

    pub fn log_error(&self) {
        match self {
            MergeError::EngineUnavailable(e) => {
                error!("Engine unavailable: {}", e);
                debug!("Engine error details: {:?}", e);
            }
            MergeError::ScratchDir { path, source } => {
                error!("Scratch directory failure under {}: {}", path.display(), source);
                debug!("Scratch directory error details: {:?}", source);
            }
            MergeError::NoIncomingData(dir) => {
                error!("No incoming data in {}", dir.display());
            }
            MergeError::SchemaMismatch { missing, available } => {
                error!("Key columns missing from incoming schema: {:?}", missing);
                debug!("Incoming schema columns: {:?}", available);
            }
            MergeError::QueryExecution { file, source } => {
                error!("Query failed for {}: {}", file.display(), source);
                debug!("Query error details: {:?}", source);
            }
            MergeError::InvalidQuery(e) => {
                error!("Invalid query input: {}", e);
            }
            MergeError::Io(e) => {
                error!("I/O error: {}", e);
                debug!("I/O error details: {:?}", e);
            }
        }
    }
}

/// A fatal failure, tagged with the phase the run was in.
#[derive(Debug, Error)]
#[error("merge run failed during {phase}: {source}")]
pub struct RunError {
    pub phase: RunPhase,
    #[source]
    pub source: MergeError,
}

impl RunError {
    pub fn new(phase: RunPhase, source: MergeError) -> Self {
        Self { phase, source }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}
