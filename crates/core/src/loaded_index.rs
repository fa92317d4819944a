//! Index over the modules already resident in one context

use crate::{
    interfaces::ModuleLoader,
    types::{ModuleHandle, SearchName},
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Snapshot of a context's loaded modules taken at the start of a resolution
#[derive(Debug, Clone, Default)]
pub struct LoadedModuleIndex {
    modules: Vec<ModuleHandle>,
}

impl LoadedModuleIndex {
    pub fn snapshot(loader: &dyn ModuleLoader) -> Self {
        Self {
            modules: loader.loaded_modules(),
        }
    }

    pub fn from_modules(modules: Vec<ModuleHandle>) -> Self {
        Self { modules }
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// First loaded module whose full name starts with `search + ","`.
    ///
    /// The separator keeps `Foo` from matching `FooBar`.
    pub fn already_loaded(&self, search: &SearchName) -> Option<ModuleHandle> {
        let prefix = format!("{},", search.as_str().to_lowercase());
        self.modules
            .iter()
            .find(|m| m.full_name().to_lowercase().starts_with(&prefix))
            .cloned()
    }

    /// Drop candidates whose file name matches a loaded module's file name.
    ///
    /// The same module is often installed under several roots; once one copy is
    /// resident, loading another would only conflict with it.
    pub fn remove_already_loaded(&self, candidates: Vec<PathBuf>) -> Vec<PathBuf> {
        let loaded_names: HashSet<String> = self
            .modules
            .iter()
            .filter(|m| !m.is_dynamic())
            .filter_map(|m| m.file_name())
            .map(|name| name.to_lowercase())
            .collect();

        if loaded_names.is_empty() {
            return candidates;
        }

        candidates
            .into_iter()
            .filter(|path| match file_name_key(path) {
                Some(name) => !loaded_names.contains(&name),
                None => true,
            })
            .collect()
    }
}

fn file_name_key(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
}
