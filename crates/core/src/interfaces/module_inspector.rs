//! Module inspection interface
//!
//! Cheap, header-only questions about a candidate file.

use crate::error::Result;
use crate::types::ModuleHeader;
use std::path::Path;

/// Trait for reading module metadata without loading the module
pub trait ModuleInspector: Send + Sync {
    /// Whether the file is a module container at all (native binaries are not)
    fn is_loadable_module(&self, path: &Path) -> bool;

    /// Read the declared name and version from the file header
    fn read_header(&self, path: &Path) -> Result<ModuleHeader>;

    /// Read only the declared simple name
    fn read_header_name(&self, path: &Path) -> Result<String> {
        self.read_header(path).map(|header| header.name)
    }
}
