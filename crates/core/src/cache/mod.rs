//! Per-context result and load-failure caching

pub mod resolution_cache;

// Re-export the main cache type
pub use resolution_cache::ResolutionCache;
