//! Registered search locations
//!
//! Folders and files the host registers at runtime on top of the plug-in roots.

use crate::utils::path_key;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
struct Registered {
    folders: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

/// Append-only, case-insensitively deduplicated folder and file lists
#[derive(Debug, Default)]
pub struct SearchLocations {
    inner: RwLock<Registered>,
}

impl SearchLocations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a folder searched top-level only. Returns `false` when the
    /// folder does not exist or is already registered.
    pub fn add_folder(&self, folder: &Path) -> bool {
        if !folder.is_dir() {
            tracing::debug!("Ignoring search folder {}: not a directory", folder.display());
            return false;
        }
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        push_unique(&mut inner.folders, folder)
    }

    /// Register a single module file. Returns `false` when the file does not
    /// exist or is already registered.
    pub fn add_file(&self, file: &Path) -> bool {
        if !file.is_file() {
            tracing::debug!("Ignoring search file {}: not a file", file.display());
            return false;
        }
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        push_unique(&mut inner.files, file)
    }

    pub fn folders(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .folders
            .clone()
    }

    pub fn files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .files
            .clone()
    }
}

fn push_unique(list: &mut Vec<PathBuf>, path: &Path) -> bool {
    let key = path_key(path);
    if list.iter().any(|existing| path_key(existing) == key) {
        return false;
    }
    list.push(path.to_path_buf());
    true
}
