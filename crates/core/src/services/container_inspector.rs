//! Container-based module inspector
//!
//! Answers header questions for files in the container format.

use super::container;
use crate::{error::Result, interfaces::ModuleInspector, types::ModuleHeader};
use std::path::Path;

/// Implementation of ModuleInspector for module containers
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerInspector;

impl ContainerInspector {
    pub fn new() -> Self {
        Self
    }
}

impl ModuleInspector for ContainerInspector {
    fn is_loadable_module(&self, path: &Path) -> bool {
        container::has_magic(path)
    }

    fn read_header(&self, path: &Path) -> Result<ModuleHeader> {
        container::read_header(path)
    }
}
