use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared version of a module: `major.minor.build.revision`.
///
/// Missing trailing components parse as zero, so `"2.1"` equals `"2.1.0.0"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub revision: u32,
}

impl ModuleVersion {
    pub const fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }
}

impl FromStr for ModuleVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::VersionError("empty version".to_string()));
        }

        let mut parts = [0u32; 4];
        let mut count = 0;
        for part in trimmed.split('.') {
            if count == parts.len() {
                return Err(Error::VersionError(format!(
                    "'{trimmed}' has more than four components"
                )));
            }
            parts[count] = part
                .parse()
                .map_err(|e| Error::VersionError(format!("'{trimmed}': {e}")))?;
            count += 1;
        }

        let [major, minor, build, revision] = parts;
        Ok(Self::new(major, minor, build, revision))
    }
}

impl TryFrom<String> for ModuleVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ModuleVersion> for String {
    fn from(version: ModuleVersion) -> Self {
        version.to_string()
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}
