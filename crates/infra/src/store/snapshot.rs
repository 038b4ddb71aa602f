//! JSON snapshot file for the whole store.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::{StoreError, Tables};

/// Read a snapshot. A missing file is an empty store.
pub fn load_snapshot(path: &Path) -> Result<Tables, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Tables::default()),
        Err(err) => Err(err.into()),
    }
}

/// Write a snapshot atomically (temp file + rename).
pub fn save_snapshot(path: &Path, tables: &Tables) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(tables)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_store() {
        let path = std::env::temp_dir().join(format!("eventstock-missing-{}.json", uuid::Uuid::new_v4()));
        assert_eq!(load_snapshot(&path).unwrap(), Tables::default());
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let path = std::env::temp_dir().join(format!("eventstock-bad-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, b"{ not json").unwrap();
        let err = load_snapshot(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
