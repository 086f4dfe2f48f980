use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Reads a JSON document, returning `T::default()` for a missing or blank file.
pub(crate) fn read_or_default<T>(path: &Path) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
        Err(error) => return Err(StoreError::io(path, error)),
    };
    if raw.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&raw).map_err(|source| StoreError::json(path, source))
}

/// Writes `value` as indented JSON, creating parent directories.
pub(crate) fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StoreError::io(parent, source))?;
    }
    let mut body =
        serde_json::to_vec_pretty(value).map_err(|source| StoreError::json(path, source))?;
    body.push(b'\n');
    fs::write(path, body).map_err(|source| StoreError::io(path, source))
}
