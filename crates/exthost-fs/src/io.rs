//! Atomic I/O operations with file locking

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::{Error, NormalizedPath, Result};

/// Replace the file at `path` with `content` in a single rename.
///
/// The content is staged in a locked temporary file beside the target and
/// persisted over it. Missing parent directories are created.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let target = path.to_native();
    let dir = staging_dir(&target);
    fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

    let mut staged = NamedTempFile::new_in(&dir).map_err(|e| Error::io(&dir, e))?;
    let lock_failed = || Error::LockFailed {
        path: target.clone(),
    };
    staged.as_file().lock_exclusive().map_err(|_| lock_failed())?;

    if let Err(e) = staged.write_all(content) {
        return Err(Error::io(staged.path(), e));
    }
    if let Err(e) = staged.as_file().sync_all() {
        return Err(Error::io(staged.path(), e));
    }
    FileExt::unlock(staged.as_file()).map_err(|_| lock_failed())?;

    staged
        .persist(&target)
        .map_err(|e| Error::io(&target, e.error))?;
    tracing::debug!(path = %path, bytes = content.len(), "Wrote file");
    Ok(())
}

fn staging_dir(target: &Path) -> PathBuf {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Create `path` (and any missing parents) as a directory.
///
/// Returns `true` when the directory was created by this call and `false`
/// when it already existed.
pub fn ensure_dir(path: &NormalizedPath) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    let native_path = path.to_native();
    fs::create_dir_all(&native_path).map_err(|e| Error::io(&native_path, e))?;
    tracing::debug!(path = %path, "Created directory");
    Ok(true)
}

/// Last modification time of the file at `path`.
pub fn modified_time(path: &NormalizedPath) -> Result<SystemTime> {
    let native_path = path.to_native();
    fs::metadata(&native_path)
        .and_then(|meta| meta.modified())
        .map_err(|e| Error::io(&native_path, e))
}
