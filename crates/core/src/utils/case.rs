//! Case-insensitive string and path comparisons.
//!
//! Module names and file paths are matched the way the host's loader matches
//! them, which ignores case everywhere.

use std::path::Path;

pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// Byte index of the first occurrence of `needle` in `haystack`, ignoring case.
///
/// The index refers to the lowercased haystack, which is what ranking compares.
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack.to_lowercase().find(&needle.to_lowercase())
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    find_ignore_case(haystack, needle).is_some()
}

/// Key used wherever paths are stored in case-insensitive sets.
pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}
