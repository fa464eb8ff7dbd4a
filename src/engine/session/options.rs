use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::engine::errors::MergeError;
use crate::engine::query::{Directive, Literal};

/// Engine tuning applied to every session, in a fixed order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Size with unit suffix, e.g. `5GB`.
    pub memory_limit: Option<String>,
    pub threads: Option<usize>,
    /// Extra raw directives, applied after the typed ones.
    #[serde(default)]
    pub directives: Vec<String>,
    /// Parent of the per-session scratch directory; OS temp dir when unset.
    pub scratch_root: Option<PathBuf>,
}

impl EngineOptions {
    /// Memory cap, thread count, raw directives, then the scratch directory.
    /// The scratch directory goes last so earlier settings cannot reset it.
    pub fn directives(&self, scratch_dir: &Path) -> Result<Vec<Directive>, MergeError> {
        let mut out = Vec::with_capacity(self.directives.len() + 3);
        if let Some(limit) = &self.memory_limit {
            out.push(Directive::MemoryLimit(Literal::new(limit.as_str())));
        }
        if let Some(threads) = self.threads {
            out.push(Directive::Threads(threads));
        }
        out.extend(self.directives.iter().cloned().map(Directive::Raw));
        out.push(Directive::TempDirectory(Literal::path(scratch_dir)?));
        Ok(out)
    }
}
