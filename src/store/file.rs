//! On-disk snapshot format
//!
//! The whole store is one pretty-printed JSON document. Writes go to a
//! temporary file in the same directory which is then renamed over the
//! target, so a crash mid-write leaves the previous snapshot intact.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::StoreData;
use crate::errors::{ReqpadError, Result};

/// Read a snapshot; a missing file is an empty store
pub(crate) fn load(path: &Path) -> Result<StoreData> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no store file yet, starting empty");
        return Ok(StoreData::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ReqpadError::Store(format!("Failed to read {}: {}", path.display(), e)))?;

    if content.trim().is_empty() {
        return Ok(StoreData::default());
    }

    serde_json::from_str(&content)
        .map_err(|e| ReqpadError::Store(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Atomically replace the snapshot at `path`
pub(crate) fn save(path: &Path, data: &StoreData) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .map_err(|e| ReqpadError::Store(format!("Failed to create {}: {}", parent.display(), e)))?;

    let content = serde_json::to_string_pretty(data)?;

    let mut temp = NamedTempFile::new_in(parent)
        .map_err(|e| ReqpadError::Store(format!("Failed to create temp file: {}", e)))?;

    temp.write_all(content.as_bytes())
        .map_err(|e| ReqpadError::Store(format!("Failed to write store: {}", e)))?;

    temp.persist(path)
        .map_err(|e| ReqpadError::Store(format!("Failed to save store: {}", e)))?;

    // Saved requests can carry credentials in headers
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = fs::Permissions::from_mode(0o600);
        if let Err(e) = fs::set_permissions(path, permissions) {
            tracing::warn!(path = %path.display(), error = %e, "could not restrict store file permissions");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Collection;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let data = load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(data, StoreData::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut data = StoreData::default();
        let collection = Collection::new("Users", None);
        data.collections.insert(collection.id.clone(), collection);

        save(&path, &data).unwrap();
        assert_eq!(load(&path).unwrap(), data);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load(&path), Err(ReqpadError::Store(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        save(&path, &StoreData::default()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        save(&path, &StoreData::default()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
