use crate::{types::ModuleHandle, utils::path_key};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Negative cache and result cache for one resolution context.
///
/// Both maps only ever grow. A path that failed to load stays failed, and the
/// outcome stored for a requested name, hit or miss, is the answer for the rest
/// of the process.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    results: HashMap<String, Option<ModuleHandle>>,
    failed_paths: HashSet<String>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_failed(&self, path: &Path) -> bool {
        self.failed_paths.contains(&path_key(path))
    }

    /// Returns `true` if the path was not already recorded
    pub fn record_failure(&mut self, path: &Path) -> bool {
        self.failed_paths.insert(path_key(path))
    }

    /// `Some(outcome)` when this exact requested name was resolved before
    pub fn try_get_cached_result(&self, requested_name: &str) -> Option<Option<ModuleHandle>> {
        self.results.get(requested_name).cloned()
    }

    /// Store the outcome for a requested name. The first stored outcome wins and
    /// is returned, so concurrent resolutions of one name agree.
    pub fn record_result(
        &mut self,
        requested_name: &str,
        outcome: Option<ModuleHandle>,
    ) -> Option<ModuleHandle> {
        self.results
            .entry(requested_name.to_string())
            .or_insert(outcome)
            .clone()
    }

    pub fn cached_results(&self) -> usize {
        self.results.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed_paths.len()
    }
}
