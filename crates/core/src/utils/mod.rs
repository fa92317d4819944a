//! Small shared helpers

pub mod case;
pub mod serde_helpers;

pub use case::{contains_ignore_case, eq_ignore_case, find_ignore_case, path_key};
