//! Fuzzy candidate ranking
//!
//! Ranking works in two phases: capture an immutable snapshot of everything the
//! ordering needs (existence, name match, header, mtime), then sort with a pure
//! comparator. No I/O happens while sorting.

pub mod fuzzy;
pub mod policy;
pub mod snapshot;

pub use fuzzy::{FuzzyRanker, compare_candidates};
pub use policy::{RankingPolicy, TieBreak};
pub use snapshot::CandidateSnapshot;
