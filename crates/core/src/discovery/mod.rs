//! Candidate discovery
//!
//! Collects every file that could be the requested module from the plug-in
//! roots, the registered folders and files, and for script requests the
//! working directory. Directories are searched top-level only.

pub mod locations;

pub use locations::SearchLocations;

use crate::{error::Error, interfaces::SearchRootProvider, types::SearchName};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Enumerates candidate module files for one resolution call
pub struct CandidateEnumerator<'a> {
    roots: &'a dyn SearchRootProvider,
    locations: &'a SearchLocations,
    extensions: &'a [String],
}

impl<'a> CandidateEnumerator<'a> {
    pub fn new(
        roots: &'a dyn SearchRootProvider,
        locations: &'a SearchLocations,
        extensions: &'a [String],
    ) -> Self {
        Self {
            roots,
            locations,
            extensions,
        }
    }

    /// Flat, unordered candidate list. Duplicates across roots are kept; ranking
    /// sorts them out. Unreadable roots contribute nothing.
    pub fn enumerate(&self, search: &SearchName) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        for root in self.roots.plugin_install_roots() {
            self.scan_directory(&root, self.extensions, &mut candidates);
        }

        for folder in self.locations.folders() {
            self.scan_directory(&folder, self.extensions, &mut candidates);
        }

        candidates.extend(self.locations.files());

        if search.probably_script_origin() {
            if let Some(cwd) = self.roots.current_dir() {
                // Scripts only ever reference the primary extension
                let primary = &self.extensions[..self.extensions.len().min(1)];
                self.scan_directory(&cwd, primary, &mut candidates);
            }
        }

        tracing::debug!("Enumerated {} candidates for '{}'", candidates.len(), search);
        candidates
    }

    fn scan_directory(&self, dir: &Path, extensions: &[String], out: &mut Vec<PathBuf>) {
        let before = out.len();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) => {
                    let err = Error::EnumerationError {
                        root: dir.to_path_buf(),
                        source,
                    };
                    tracing::debug!("{}", err);
                    continue;
                }
            };

            if entry.file_type().is_file() && has_module_extension(entry.path(), extensions) {
                out.push(entry.into_path());
            }
        }

        tracing::trace!("{} yielded {} files", dir.display(), out.len() - before);
    }
}

pub fn has_module_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
