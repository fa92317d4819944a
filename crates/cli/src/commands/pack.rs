use anyhow::{Context, Result};
use modresolve_core::{ModuleHeader, ModuleVersion, services::container::write_container};
use std::fs;
use std::path::Path;
use tracing::info;

pub fn pack_command(name: &str, version: &str, arch: Option<&str>, payload: &Path, output: &Path) -> Result<()> {
    let version: ModuleVersion = version
        .parse()
        .with_context(|| format!("Invalid version '{}'", version))?;
    let bytes = fs::read(payload).with_context(|| format!("Failed to read payload {}", payload.display()))?;

    let mut header = ModuleHeader::new(name, version);
    header.arch = arch.map(str::to_string);

    let written = write_container(output, &header, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Wrote {} ({} payload bytes)", output.display(), bytes.len());

    println!("📦 Packed {} {} -> {}", written.name, written.version, output.display());
    if let Some(arch) = &written.arch {
        println!("   🖥️  Arch: {}", arch);
    }
    if let Some(checksum) = &written.checksum {
        println!("   🔒 Checksum: {}", checksum);
    }

    Ok(())
}
