use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{info, warn};

/// The run's output directory. Removed on drop; kept by [`OutputDir::finish`]
/// when the run asked to retain it.
pub(crate) struct OutputDir {
    dir: TempDir,
    retain: bool,
}

impl OutputDir {
    pub(crate) fn create(root: Option<&Path>, label: &str, retain: bool) -> io::Result<Self> {
        let root = root.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir);
        let prefix = format!("{}_", dir_prefix(label));
        let dir = tempfile::Builder::new().prefix(&prefix).tempdir_in(&root)?;
        info!(target: "duck_merge::driver", dir = %dir.path().display(), retain, "Created output directory");
        Ok(Self { dir, retain })
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the directory path and whether it still exists.
    pub(crate) fn finish(self) -> (PathBuf, bool) {
        if self.retain {
            (self.dir.keep(), true)
        } else {
            let path = self.dir.path().to_path_buf();
            if let Err(e) = self.dir.close() {
                warn!(target: "duck_merge::driver", dir = %path.display(), error = %e, "Failed to remove output directory");
            }
            (path, false)
        }
    }
}

/// The label with dots and path separators flattened to `_`, so the output
/// directory is always a direct child of its root.
fn dir_prefix(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            '.' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}
