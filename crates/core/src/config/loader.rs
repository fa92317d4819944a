//! Configuration loader
//!
//! Resolves which config file applies: an explicit `MODRESOLVE_CONFIG`, else
//! the nearest `.modresolve.json` / `modresolve.json` walking up from a path.

use super::ResolverConfig;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "MODRESOLVE_CONFIG";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the current directory or environment
    pub fn load() -> Result<ResolverConfig> {
        match std::env::current_dir() {
            Ok(cwd) => Self::load_from_path(&cwd),
            Err(_) => Ok(ResolverConfig::default()),
        }
    }

    /// Load configuration applying to a specific path
    pub fn load_from_path(path: &Path) -> Result<ResolverConfig> {
        let explicit = std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from);
        Self::load_with_override(path, explicit.as_deref())
    }

    pub fn load_with_override(path: &Path, explicit: Option<&Path>) -> Result<ResolverConfig> {
        if let Some(explicit) = explicit {
            tracing::debug!("Loading config from {}", explicit.display());
            if !explicit.is_file() {
                return Err(Error::ConfigError(format!(
                    "config file {} does not exist",
                    explicit.display()
                )));
            }
            return ResolverConfig::load_from_file(explicit);
        }

        let start = if path.is_file() {
            path.parent().unwrap_or(path)
        } else {
            path
        };

        match ResolverConfig::find_config_file(start) {
            Some(found) => {
                tracing::debug!("Found config at: {:?}", found);
                ResolverConfig::load_from_file(&found)
            }
            None => {
                tracing::debug!("No config found above {:?}, using defaults", start);
                Ok(ResolverConfig::default())
            }
        }
    }
}
