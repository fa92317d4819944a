use anyhow::Result;
use tracing::debug;

use crate::cli::SearchArgs;
use crate::display::print_candidates;

pub fn rank_command(name: &str, search: &SearchArgs) -> Result<()> {
    let resolver = search.build_resolver()?;
    let request = search.request(name);
    let kind = search.context_kind();

    let ranked = resolver.candidates(&request, kind);
    debug!("{} ranked candidates for {}", ranked.len(), request);

    println!("📋 Candidates for: {} ({})", request.requested_name, kind);
    println!("{}", "=".repeat(80));

    if ranked.is_empty() {
        println!("ℹ️  No candidates found");
        return Ok(());
    }

    print_candidates(&ranked);
    Ok(())
}
