use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Deserialize;

use super::paths::TEMP_SUFFIX;
use crate::error::{OrigamiError, Result};

/// Write `content` to `path` through a sibling temp file and a rename.
///
/// Readers observe either the old file or the new one, never a partial write.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| OrigamiError::io_operation("create directory", parent.display(), e))?;
    }

    let temp = path.with_extension(match path.extension() {
        Some(ext) => format!("{}.{}", ext.to_string_lossy(), TEMP_SUFFIX),
        None => TEMP_SUFFIX.to_string(),
    });

    let write = || -> std::io::Result<()> {
        let mut file = fs::File::create(&temp)?;
        file.write_all(content)?;
        file.sync_all()?;
        fs::rename(&temp, path)
    };

    write().map_err(|e| {
        let _ = fs::remove_file(&temp);
        OrigamiError::io_operation("write", path.display(), e)
    })
}

#[derive(Deserialize)]
struct RevisionStamp {
    #[serde(default)]
    revision: u64,
}

/// Revision stamp of the log currently on disk.
///
/// A missing or unreadable document counts as revision 0, matching the empty
/// log that `load` returns for it.
pub(crate) fn read_revision(path: &Path) -> u64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str::<RevisionStamp>(&content).ok())
        .map(|stamp| stamp.revision)
        .unwrap_or(0)
}

/// Remove a file if it exists
pub(crate) fn remove_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(OrigamiError::io_operation("remove", path.display(), e)),
    }
}

/// Remove a directory tree if it exists
pub(crate) fn remove_dir_if_exists(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(OrigamiError::io_operation("remove", path.display(), e)),
    }
}
