//! Configured search roots implementation
//!
//! Serves plug-in roots straight from configuration.

use crate::{config::ResolverConfig, interfaces::SearchRootProvider};
use std::path::PathBuf;

/// Implementation of SearchRootProvider backed by fixed lists
#[derive(Debug, Clone, Default)]
pub struct ConfiguredSearchRoots {
    plugin_roots: Vec<PathBuf>,
    primary_install_dir: Option<PathBuf>,
    working_dir: Option<PathBuf>,
}

impl ConfiguredSearchRoots {
    pub fn new(plugin_roots: Vec<PathBuf>) -> Self {
        Self {
            plugin_roots,
            ..Default::default()
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            plugin_roots: config.plugin_roots.clone(),
            primary_install_dir: config.primary_install_dir.clone(),
            working_dir: None,
        }
    }

    pub fn with_primary_install_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.primary_install_dir = Some(dir.into());
        self
    }

    /// Pin the directory searched for script requests instead of the process cwd
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl SearchRootProvider for ConfiguredSearchRoots {
    fn plugin_install_roots(&self) -> Vec<PathBuf> {
        self.plugin_roots.clone()
    }

    fn primary_install_dir(&self) -> Option<PathBuf> {
        self.primary_install_dir.clone()
    }

    fn current_dir(&self) -> Option<PathBuf> {
        match &self.working_dir {
            Some(dir) => Some(dir.clone()),
            None => std::env::current_dir().ok(),
        }
    }
}
