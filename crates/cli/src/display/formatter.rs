use modresolve_core::{CandidateSnapshot, LoadedModule};
use std::time::UNIX_EPOCH;

pub fn print_module(module: &LoadedModule) {
    println!("✅ {}", module.full_name());
    match &module.location {
        Some(location) => println!("   📁 Location: {}", location.display()),
        None => println!("   🧩 In-memory module"),
    }
    println!("   🔧 Context: {}", module.context);
}

pub fn print_candidates(candidates: &[CandidateSnapshot]) {
    for (i, candidate) in candidates.iter().enumerate() {
        println!("{:>3}. {}", i + 1, candidate.path.display());

        match (&candidate.header_name, &candidate.version) {
            (Some(name), Some(version)) => println!("     📦 Header: {} {}", name, version),
            (Some(name), None) => println!("     📦 Header: {}", name),
            _ => {}
        }

        let notes = candidate_notes(candidate);
        if !notes.is_empty() {
            println!("     🏷️  {}", notes.join(", "));
        }
    }
}

/// Short labels for the facts that decided a candidate's position
pub fn candidate_notes(candidate: &CandidateSnapshot) -> Vec<String> {
    let mut notes = Vec::new();

    if !candidate.exists {
        notes.push("missing".to_string());
    }
    if candidate.exact_stem {
        notes.push("exact file name".to_string());
    } else if let Some(index) = candidate.match_index {
        notes.push(format!("name at offset {}", index));
    }
    if candidate.exact_header {
        notes.push("exact header name".to_string());
    }
    if candidate.trusted {
        notes.push("primary install".to_string());
    }
    if let Some(secs) = candidate
        .modified
        .and_then(|m| m.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
    {
        notes.push(format!("modified {}", secs));
    }

    notes
}
