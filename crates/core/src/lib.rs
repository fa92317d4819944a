//! modresolve - fuzzy module resolution for plug-in hosts
//!
//! This crate provides functionality to:
//! - Find candidate module files across plug-in roots and registered locations
//! - Rank same-named and similarly-named candidates by how well they fit a request
//! - Load the best candidate into a normal or metadata-only context
//! - Cache outcomes per requested name and never retry files that failed to load
pub mod cache;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod interfaces;
pub mod loaded_index;
pub mod ranking;
pub mod resolver;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use config::{ConfigLoader, ResolverConfig};
pub use context::{LoadAttempt, ResolutionContext};
pub use interfaces::{ModuleInspector, ModuleLoader, SearchRootProvider};
pub use ranking::{CandidateSnapshot, FuzzyRanker, RankingPolicy, TieBreak};
pub use resolver::{Resolver, ResolverBuilder};
