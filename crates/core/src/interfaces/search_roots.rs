//! Search root interface
//!
//! Supplies the directories the host's plug-in manager knows about.

use std::path::PathBuf;

/// Trait for the host's plug-in install locations
pub trait SearchRootProvider: Send + Sync {
    /// Plug-in install roots, searched top-level only
    fn plugin_install_roots(&self) -> Vec<PathBuf>;

    /// The host's own installation directory, preferred when versions tie
    fn primary_install_dir(&self) -> Option<PathBuf>;

    /// Directory searched for bare, script-style requests
    fn current_dir(&self) -> Option<PathBuf> {
        std::env::current_dir().ok()
    }
}
