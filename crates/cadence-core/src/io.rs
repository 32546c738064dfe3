//! YAML document store primitives. Every entity in the data root is one YAML
//! file; writes go through a tempfile rename so a crashed writer never leaves
//! a half-written document behind for the next sweep or rollover to choke on.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Serialize a document to YAML and write it atomically, creating parent
/// directories as needed. Overwrites any existing document.
pub fn save_doc<T: Serialize>(path: &Path, doc: &T) -> Result<()> {
    let data = serde_yaml::to_string(doc)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Read a YAML document. `None` means the document was never written, which
/// the lazy store treats as "no data yet" rather than an error.
pub fn load_doc<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(path)?;
    Ok(Some(serde_yaml::from_str(&data)?))
}

/// Write a document only if none exists at `path`. Returns true if written.
pub fn save_doc_if_missing<T: Serialize>(path: &Path, doc: &T) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_doc(path, doc)?;
    Ok(true)
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}
