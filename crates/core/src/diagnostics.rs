//! Optional request/response log.
//!
//! Turned on by creating the log file before the resolver starts; the resolver
//! never creates it. Each resolution appends one tab-separated line.

use crate::types::{ContextKind, ModuleHandle, ResolutionRequest};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug)]
pub struct DiagnosticLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl DiagnosticLog {
    /// Open the log for appending if the file already exists
    pub fn open_if_present(path: &Path) -> Option<Self> {
        if !path.is_file() {
            return None;
        }

        match OpenOptions::new().append(true).open(path) {
            Ok(file) => {
                tracing::debug!("Diagnostics log enabled at {}", path.display());
                Some(Self {
                    path: path.to_path_buf(),
                    file: Mutex::new(file),
                })
            }
            Err(e) => {
                tracing::warn!("Cannot open diagnostics log {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn record(&self, request: &ResolutionRequest, context: ContextKind, outcome: Option<&ModuleHandle>) {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let result = match outcome {
            Some(module) => match &module.location {
                Some(location) => format!("{} @ {}", module.full_name(), location.display()),
                None => module.full_name(),
            },
            None => "unresolved".to_string(),
        };
        let line = format!(
            "{}\t{}\t{}\t{}\t{}\n",
            timestamp,
            context,
            request.requested_name,
            request.requesting_module.as_deref().unwrap_or("-"),
            result
        );

        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = file.write_all(line.as_bytes()) {
            tracing::warn!("Failed to write diagnostics log {}: {}", self.path.display(), e);
        }
    }
}
