//! Configuration management for modresolve

pub mod loader;
mod settings;

// Re-export main types
pub use loader::{CONFIG_ENV_VAR, ConfigLoader};
pub use settings::{CONFIG_FILE_NAMES, ResolverConfig};
