use crate::{
    interfaces::ModuleInspector,
    types::{ModuleVersion, SearchName},
    utils::{eq_ignore_case, find_ignore_case, path_key},
};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Everything the ranking comparator knows about one candidate file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSnapshot {
    pub path: PathBuf,
    /// File name without extension
    pub stem: String,
    pub exists: bool,
    /// Position of the search name inside the stem, ignoring case
    pub match_index: Option<usize>,
    /// Stem equals the search name
    pub exact_stem: bool,
    /// Declared header name equals the search name
    pub exact_header: bool,
    pub header_name: Option<String>,
    pub version: Option<ModuleVersion>,
    /// Located under the host's primary installation directory
    pub trusted: bool,
    pub modified: Option<SystemTime>,
    /// Input position of the first candidate with this stem
    pub group: usize,
    /// Input position of this candidate
    pub order: usize,
}

impl CandidateSnapshot {
    /// Capture the name-based facts. Header, version and mtime are left empty
    /// until `capture_metadata` is called.
    pub fn capture(path: PathBuf, order: usize, search: &SearchName, trusted_root: Option<&Path>) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let match_index = find_ignore_case(&stem, search.as_str());
        let exact_stem = eq_ignore_case(&stem, search.as_str());
        let trusted = trusted_root.is_some_and(|root| is_under(&path, root));
        let exists = path.is_file();

        Self {
            path,
            stem,
            exists,
            match_index,
            exact_stem,
            exact_header: false,
            header_name: None,
            version: None,
            trusted,
            modified: None,
            group: order,
            order,
        }
    }

    /// Read the header and modification time. Failures are logged and leave the
    /// fields empty, which loses the corresponding tie-break.
    pub fn capture_metadata(&mut self, search: &SearchName, inspector: &dyn ModuleInspector) {
        if !self.exists {
            return;
        }

        match inspector.read_header(&self.path) {
            Ok(header) => {
                self.exact_header = eq_ignore_case(&header.name, search.as_str());
                self.version = Some(header.version);
                self.header_name = Some(header.name);
            }
            Err(e) => {
                tracing::warn!("Ranking {} without header metadata: {}", self.path.display(), e);
            }
        }

        match std::fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => self.modified = Some(modified),
            Err(e) => {
                tracing::warn!("No modification time for {}: {}", self.path.display(), e);
            }
        }
    }

    pub fn stem_key(&self) -> String {
        self.stem.to_lowercase()
    }
}

fn is_under(path: &Path, root: &Path) -> bool {
    Path::new(&path_key(path)).starts_with(path_key(root))
}
