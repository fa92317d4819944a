pub mod formatter;

pub use formatter::{candidate_notes, print_candidates, print_module};
