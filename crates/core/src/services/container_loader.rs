//! Container-based module loader
//!
//! Loads module containers into one context and keeps track of what is resident.
//! The normal context verifies the payload and target architecture; the
//! metadata-only context is satisfied by a readable header.

use super::container;
use crate::{
    error::{Error, Result},
    interfaces::ModuleLoader,
    types::{ContextKind, LoadedModule, ModuleHandle, ModuleHeader},
    utils::path_key,
};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Implementation of ModuleLoader for module containers
#[derive(Debug)]
pub struct ContainerLoader {
    kind: ContextKind,
    arch: String,
    loaded: RwLock<Vec<ModuleHandle>>,
}

impl ContainerLoader {
    pub fn new(kind: ContextKind) -> Self {
        Self {
            kind,
            arch: std::env::consts::ARCH.to_string(),
            loaded: RwLock::new(Vec::new()),
        }
    }

    pub fn normal() -> Self {
        Self::new(ContextKind::Normal)
    }

    pub fn metadata_only() -> Self {
        Self::new(ContextKind::MetadataOnly)
    }

    /// Override the architecture modules must target to load normally
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    /// Make a module resident without loading it from disk
    pub fn register_module(&self, module: LoadedModule) -> ModuleHandle {
        let handle = Arc::new(LoadedModule {
            context: self.kind,
            ..module
        });
        self.loaded
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&handle));
        handle
    }

    fn resident(&self, path: &Path) -> Option<ModuleHandle> {
        let key = path_key(path);
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|m| m.location.as_deref().is_some_and(|loc| path_key(loc) == key))
            .cloned()
    }

    fn read_for_context(&self, path: &Path) -> Result<ModuleHeader> {
        match self.kind {
            ContextKind::MetadataOnly => {
                container::read_header(path).map_err(|e| Error::load(path, e))
            }
            ContextKind::Normal => {
                let (header, payload) =
                    container::read_container(path).map_err(|e| Error::load(path, e))?;

                if let Some(expected) = &header.checksum {
                    let actual = container::payload_checksum(&payload);
                    if !expected.eq_ignore_ascii_case(&actual) {
                        return Err(Error::load(
                            path,
                            format!("checksum mismatch (expected {expected}, found {actual})"),
                        ));
                    }
                }

                if let Some(arch) = &header.arch {
                    if !arch.eq_ignore_ascii_case(&self.arch) {
                        return Err(Error::load(
                            path,
                            format!("built for {arch}, host is {}", self.arch),
                        ));
                    }
                }

                Ok(header)
            }
        }
    }
}

impl ModuleLoader for ContainerLoader {
    fn kind(&self) -> ContextKind {
        self.kind
    }

    fn load(&self, path: &Path) -> Result<ModuleHandle> {
        if let Some(existing) = self.resident(path) {
            return Ok(existing);
        }

        let header = self.read_for_context(path)?;

        let mut loaded = self.loaded.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have loaded the same file while we were reading it
        let key = path_key(path);
        if let Some(existing) = loaded
            .iter()
            .find(|m| m.location.as_deref().is_some_and(|loc| path_key(loc) == key))
        {
            return Ok(Arc::clone(existing));
        }

        let handle = Arc::new(LoadedModule::from_file(&header, path, self.kind));
        loaded.push(Arc::clone(&handle));
        tracing::debug!("Loaded {} from {} ({})", handle, path.display(), self.kind);
        Ok(handle)
    }

    fn loaded_modules(&self) -> Vec<ModuleHandle> {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
