use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Returns an absolute version of the provided path without touching the filesystem.
/// Falls back to the original path if the current working directory cannot be resolved.
pub fn absolutize<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        return path.to_path_buf();
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Regular files directly inside `dir` with the given extension, sorted by
/// file name. A missing directory yields an empty list.
pub fn list_data_files(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let dir_str = dir.to_str().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("non UTF-8 directory: {}", dir.display()),
        )
    })?;
    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(dir_str.trim_end_matches('/')),
        glob::Pattern::escape(extension)
    );

    let entries = glob::glob(&pattern)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!(path = %e.path().display(), error = %e.error(), "Skipping unreadable entry"),
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
