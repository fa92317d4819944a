//! Resolution contexts
//!
//! A context pairs a loader with its own result cache and negative cache. The
//! resolver holds two of them, normal and metadata-only, which never share
//! state: a file that cannot load for execution may still load for inspection.

use crate::{
    cache::ResolutionCache,
    error::Error,
    interfaces::{ModuleInspector, ModuleLoader},
    loaded_index::LoadedModuleIndex,
    types::{ContextKind, ModuleHandle, SearchName},
    utils::eq_ignore_case,
};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Outcome of trying one ranked candidate
#[derive(Debug)]
pub enum LoadAttempt {
    Loaded(ModuleHandle),
    /// The path failed before in this context; nothing was attempted
    KnownFailure,
    /// Header declares a different name or could not be read; not recorded
    Rejected,
    /// The physical load failed; the path is now recorded as failed
    Failed(Error),
}

pub struct ResolutionContext {
    loader: Box<dyn ModuleLoader>,
    cache: Mutex<ResolutionCache>,
}

impl ResolutionContext {
    pub fn new(loader: Box<dyn ModuleLoader>) -> Self {
        Self {
            loader,
            cache: Mutex::new(ResolutionCache::new()),
        }
    }

    pub fn kind(&self) -> ContextKind {
        self.loader.kind()
    }

    pub fn loaded_index(&self) -> LoadedModuleIndex {
        LoadedModuleIndex::snapshot(self.loader.as_ref())
    }

    // Cache contents stay consistent even if a holder panicked
    fn cache(&self) -> MutexGuard<'_, ResolutionCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn cached_result(&self, requested_name: &str) -> Option<Option<ModuleHandle>> {
        self.cache().try_get_cached_result(requested_name)
    }

    pub fn record_result(&self, requested_name: &str, outcome: Option<ModuleHandle>) -> Option<ModuleHandle> {
        self.cache().record_result(requested_name, outcome)
    }

    pub fn has_failed(&self, path: &Path) -> bool {
        self.cache().has_failed(path)
    }

    /// Number of paths recorded as failed in this context
    pub fn failed_count(&self) -> usize {
        self.cache().failed_count()
    }

    /// Try to load one ranked candidate.
    ///
    /// The cache lock is only held for the failed-path check and the failure
    /// record; header reads and the load itself run unlocked.
    pub fn try_load(&self, path: &Path, search: &SearchName, inspector: &dyn ModuleInspector) -> LoadAttempt {
        if self.has_failed(path) {
            tracing::trace!("Skipping {}: failed before ({})", path.display(), self.kind());
            return LoadAttempt::KnownFailure;
        }

        match inspector.read_header_name(path) {
            Ok(declared) if eq_ignore_case(&declared, search.as_str()) => {}
            Ok(declared) => {
                tracing::trace!("Rejecting {}: declares '{}', want '{}'", path.display(), declared, search);
                return LoadAttempt::Rejected;
            }
            Err(e) => {
                tracing::debug!("Rejecting {}: {}", path.display(), e);
                return LoadAttempt::Rejected;
            }
        }

        match self.loader.load(path) {
            Ok(module) => LoadAttempt::Loaded(module),
            Err(e) => {
                tracing::warn!("{} ({} context); not retrying", e, self.kind());
                self.cache().record_failure(path);
                LoadAttempt::Failed(e)
            }
        }
    }
}
