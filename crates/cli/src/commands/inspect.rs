use anyhow::{Context, Result, bail};
use modresolve_core::services::container::{payload_checksum, read_container, read_header};
use std::path::Path;
use tracing::debug;

pub fn inspect_command(file: &Path, verify: bool) -> Result<()> {
    debug!("Inspecting {}", file.display());

    let header = if verify {
        let (header, payload) = read_container(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let actual = payload_checksum(&payload);
        match header.checksum.as_deref() {
            Some(expected) if expected != actual => {
                bail!("Checksum mismatch in {}: header says {}, payload is {}", file.display(), expected, actual)
            }
            Some(_) => debug!("Checksum verified"),
            None => eprintln!("⚠️  {} carries no checksum", file.display()),
        }
        header
    } else {
        read_header(file).with_context(|| format!("Failed to read {}", file.display()))?
    };

    println!("{}", serde_json::to_string_pretty(&header)?);
    Ok(())
}
