use serde::Serialize;
use std::fmt;

use crate::error::{Error, Result};
use crate::impl_case_insensitive_deserialize;

/// One rule used to order candidates that share the same file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Declared module name equals the search name exactly
    ExactName,
    /// Higher declared version wins
    Version,
    /// Located under the host's primary installation directory
    TrustedRoot,
    /// Newer modification time wins
    Recency,
}

impl_case_insensitive_deserialize!(
    TieBreak,
    ExactName => "exact_name",
    Version => "version",
    TrustedRoot => "trusted_root",
    Recency => "recency"
);

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TieBreak::ExactName => "exact_name",
            TieBreak::Version => "version",
            TieBreak::TrustedRoot => "trusted_root",
            TieBreak::Recency => "recency",
        };
        write!(f, "{name}")
    }
}

/// Ordered tie-break chain for same-named candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingPolicy {
    tie_breaks: Vec<TieBreak>,
}

impl RankingPolicy {
    /// Build a policy, rejecting duplicate rules
    pub fn new(tie_breaks: Vec<TieBreak>) -> Result<Self> {
        for (i, rule) in tie_breaks.iter().enumerate() {
            if tie_breaks[..i].contains(rule) {
                return Err(Error::ConfigError(format!(
                    "tie-break rule '{rule}' listed more than once"
                )));
            }
        }
        Ok(Self { tie_breaks })
    }

    pub fn tie_breaks(&self) -> &[TieBreak] {
        &self.tie_breaks
    }

    pub fn default_order() -> Vec<TieBreak> {
        vec![
            TieBreak::ExactName,
            TieBreak::Version,
            TieBreak::TrustedRoot,
            TieBreak::Recency,
        ]
    }
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            tie_breaks: Self::default_order(),
        }
    }
}
