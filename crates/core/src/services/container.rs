//! On-disk module container format
//!
//! Layout: the 8-byte magic, a little-endian `u32` header length, the header as
//! JSON, then the payload. Headers can be read without touching the payload.

use crate::error::{Error, Result};
use crate::types::ModuleHeader;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub const MAGIC: &[u8; 8] = b"MODRES\x01\n";

// Guards against reading a garbage length from a truncated or foreign file
const MAX_HEADER_LEN: u32 = 64 * 1024;

/// Write a container, filling in the payload checksum. Returns the header as written.
pub fn write_container(path: &Path, header: &ModuleHeader, payload: &[u8]) -> Result<ModuleHeader> {
    let mut header = header.clone();
    header.checksum = Some(payload_checksum(payload));

    let json = serde_json::to_vec(&header)?;
    let len = u32::try_from(json.len())
        .ok()
        .filter(|len| *len <= MAX_HEADER_LEN)
        .ok_or_else(|| Error::ContainerError(format!("header too large: {} bytes", json.len())))?;

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(MAGIC)?;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&json)?;
    writer.write_all(payload)?;
    writer.flush()?;

    Ok(header)
}

/// Whether the file starts with the container magic
pub fn has_magic(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut magic = [0u8; 8];
    file.read_exact(&mut magic).is_ok() && &magic == MAGIC
}

/// Read only the header
pub fn read_header(path: &Path) -> Result<ModuleHeader> {
    let file = File::open(path).map_err(|e| Error::metadata(path, e))?;
    let mut reader = BufReader::new(file);
    read_header_from(&mut reader, path)
}

/// Read the header and the whole payload
pub fn read_container(path: &Path) -> Result<(ModuleHeader, Vec<u8>)> {
    let file = File::open(path).map_err(|e| Error::metadata(path, e))?;
    let mut reader = BufReader::new(file);
    let header = read_header_from(&mut reader, path)?;

    let mut payload = Vec::new();
    reader.read_to_end(&mut payload)?;
    Ok((header, payload))
}

pub fn payload_checksum(payload: &[u8]) -> String {
    format!("{:x}", md5::compute(payload))
}

fn read_header_from<R: Read>(reader: &mut R, path: &Path) -> Result<ModuleHeader> {
    let mut magic = [0u8; 8];
    reader
        .read_exact(&mut magic)
        .map_err(|_| Error::metadata(path, "file too short for a module container"))?;
    if &magic != MAGIC {
        return Err(Error::metadata(path, "not a module container"));
    }

    let mut len_bytes = [0u8; 4];
    reader
        .read_exact(&mut len_bytes)
        .map_err(|_| Error::metadata(path, "truncated header length"))?;
    let len = u32::from_le_bytes(len_bytes);
    if len > MAX_HEADER_LEN {
        return Err(Error::metadata(path, format!("header length {len} exceeds limit")));
    }

    let mut json = vec![0u8; len as usize];
    reader
        .read_exact(&mut json)
        .map_err(|_| Error::metadata(path, "truncated header"))?;

    serde_json::from_slice(&json).map_err(|e| Error::metadata(path, format!("invalid header: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModuleVersion;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_header() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("Foo.dll");
        let header = ModuleHeader::new("Foo", ModuleVersion::new(1, 2, 0, 0));

        let written = write_container(&path, &header, b"payload")?;
        assert_eq!(written.checksum.as_deref(), Some(payload_checksum(b"payload").as_str()));

        assert!(has_magic(&path));
        let read = read_header(&path)?;
        assert_eq!(read, written);

        let (_, payload) = read_container(&path)?;
        assert_eq!(payload, b"payload");
        Ok(())
    }

    #[test]
    fn test_native_file_is_not_a_container() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("native.dll");
        std::fs::write(&path, b"MZ\x90\x00\x03\x00\x00\x00\x04\x00")?;

        assert!(!has_magic(&path));
        let err = read_header(&path).unwrap_err();
        assert!(matches!(err, Error::MetadataReadError { .. }));
        Ok(())
    }

    #[test]
    fn test_truncated_header() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("broken.dll");
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&100u32.to_le_bytes());
        bytes.extend_from_slice(b"{\"name\"");
        std::fs::write(&path, bytes)?;

        assert!(has_magic(&path));
        assert!(read_header(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        assert!(!has_magic(Path::new("/definitely/not/here.dll")));
        assert!(read_header(Path::new("/definitely/not/here.dll")).is_err());
    }
}
