//! Path resolution for the project root and fold store

use std::env;
use std::path::{Path, PathBuf};

/// Resolve the project root.
///
/// Falls back to the current working directory, or "." if that cannot be
/// determined.
pub fn resolve_root_path(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Resolve an explicit `--store` path against the root. Without one the
/// store lives in the root's default store directory.
pub fn resolve_store_path(root: &Path, store: Option<&Path>) -> Option<PathBuf> {
    store.map(|path| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    })
}
