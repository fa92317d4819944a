//! Module loading interface
//!
//! One loader backs each resolution context.

use crate::error::Result;
use crate::types::{ContextKind, ModuleHandle};
use std::path::Path;

/// Trait for the physical load primitive of one context
pub trait ModuleLoader: Send + Sync {
    /// The context this loader loads into
    fn kind(&self) -> ContextKind;

    /// Load the file, failing with `Error::LoadError` when it is not a valid
    /// module for this context
    fn load(&self, path: &Path) -> Result<ModuleHandle>;

    /// Every module currently resident in this context
    fn loaded_modules(&self) -> Vec<ModuleHandle>;
}
