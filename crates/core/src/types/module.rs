use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::version::ModuleVersion;
use crate::impl_case_insensitive_deserialize;

/// Which of the two independent resolution contexts a module belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    /// Modules loaded for execution
    Normal,
    /// Modules loaded for metadata inspection only
    MetadataOnly,
}

impl_case_insensitive_deserialize!(
    ContextKind,
    Normal => "normal",
    MetadataOnly => "metadata_only"
);

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKind::Normal => write!(f, "normal"),
            ContextKind::MetadataOnly => write!(f, "metadata-only"),
        }
    }
}

/// Metadata a module file declares about itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleHeader {
    pub name: String,
    pub version: ModuleVersion,
    /// Target architecture, if the module is architecture specific
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    /// md5 hex digest of the payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl ModuleHeader {
    pub fn new(name: impl Into<String>, version: ModuleVersion) -> Self {
        Self {
            name: name.into(),
            version,
            arch: None,
            checksum: None,
        }
    }
}

/// A module resident in one resolution context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedModule {
    pub name: String,
    pub version: ModuleVersion,
    /// `None` for modules generated in memory
    pub location: Option<PathBuf>,
    pub context: ContextKind,
}

/// Shared handle to a loaded module; identity is the `Arc` itself
pub type ModuleHandle = Arc<LoadedModule>;

impl LoadedModule {
    pub fn from_file(header: &ModuleHeader, location: &Path, context: ContextKind) -> Self {
        Self {
            name: header.name.clone(),
            version: header.version,
            location: Some(location.to_path_buf()),
            context,
        }
    }

    /// A module with no file behind it (the host itself, generated code)
    pub fn dynamic(name: impl Into<String>, version: ModuleVersion, context: ContextKind) -> Self {
        Self {
            name: name.into(),
            version,
            location: None,
            context,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.location.is_none()
    }

    /// Fully qualified name, e.g. `Foo, Version=1.0.0.0`
    pub fn full_name(&self) -> String {
        format!("{}, Version={}", self.name, self.version)
    }

    /// File name of the module's location, if it has one
    pub fn file_name(&self) -> Option<String> {
        self.location
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
    }
}

impl fmt::Display for LoadedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}
