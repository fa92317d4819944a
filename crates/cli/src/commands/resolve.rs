use anyhow::Result;
use tracing::debug;

use crate::cli::SearchArgs;
use crate::display::print_module;

pub fn resolve_command(name: &str, search: &SearchArgs) -> Result<()> {
    let resolver = search.build_resolver()?;
    let request = search.request(name);
    let kind = search.context_kind();

    debug!("Resolving {} in the {} context", request, kind);

    println!("🔍 Resolving: {} ({})", request.requested_name, kind);
    println!("{}", "=".repeat(80));

    match resolver.resolve(&request, kind) {
        Some(module) => {
            print_module(&module);
            Ok(())
        }
        None => {
            println!("❌ Unresolved: {}", request.requested_name);
            std::process::exit(1);
        }
    }
}
