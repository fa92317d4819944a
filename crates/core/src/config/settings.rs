use crate::{
    error::{Error, Result},
    ranking::{RankingPolicy, TieBreak},
    types::ModuleVersion,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAMES: [&str; 2] = [".modresolve.json", "modresolve.json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ResolverConfig {
    /// Simple name of the host's own module; requests for it never hit the disk
    pub host_module_name: String,
    pub host_module_version: ModuleVersion,

    /// Trusted installation directory, preferred when same-named candidates tie
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_install_dir: Option<PathBuf>,

    /// Plug-in install roots supplied by the host's package manager
    pub plugin_roots: Vec<PathBuf>,

    // Registered at construction, same as calling the register_* methods
    pub search_folders: Vec<PathBuf>,
    pub search_files: Vec<PathBuf>,

    /// Module file extensions without the dot; the first one is primary
    pub module_extensions: Vec<String>,

    /// Leading characters of the search name a candidate file name must contain
    pub prefix_match_len: usize,

    pub tie_break_order: Vec<TieBreak>,

    /// Append-only request log, only used when the file already exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics_log: Option<PathBuf>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            host_module_name: "Host".to_string(),
            host_module_version: ModuleVersion::default(),
            primary_install_dir: None,
            plugin_roots: Vec::new(),
            search_folders: Vec::new(),
            search_files: Vec::new(),
            module_extensions: vec!["dll".to_string(), "rhp".to_string()],
            prefix_match_len: 5,
            tie_break_order: RankingPolicy::default_order(),
            diagnostics_log: None,
        }
    }
}

impl ResolverConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.is_file() {
                    return Some(config_path);
                }
            }

            current = current.parent()?;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.host_module_name.trim().is_empty() {
            return Err(Error::ConfigError("host_module_name must not be empty".to_string()));
        }
        if self.module_extensions.is_empty() {
            return Err(Error::ConfigError(
                "module_extensions must list at least one extension".to_string(),
            ));
        }
        if let Some(ext) = self
            .module_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(Error::ConfigError(format!(
                "module extension '{ext}' must be non-empty and given without the dot"
            )));
        }
        if self.prefix_match_len == 0 {
            return Err(Error::ConfigError("prefix_match_len must be at least 1".to_string()));
        }
        RankingPolicy::new(self.tie_break_order.clone())?;
        Ok(())
    }

    pub fn ranking_policy(&self) -> Result<RankingPolicy> {
        RankingPolicy::new(self.tie_break_order.clone())
    }
}
