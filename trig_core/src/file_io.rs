//! # File I/O Module
//!
//! Worksheet files and rendered output:
//! - **Atomic saves**: write to a `.tmp` sibling, fsync, rename over the target
//! - **Version validation**: refuse worksheets written by a newer schema
//!
//! ## File Format
//!
//! Worksheets are saved as `.tws` files containing pretty-printed JSON.
//! PDF and Typst output go through the same atomic write.
//!
//! ## Example
//!
//! ```rust,no_run
//! use trig_core::file_io::{load_worksheet, save_worksheet};
//! use trig_core::worksheet::Worksheet;
//! use std::path::Path;
//!
//! let mut sheet = Worksheet::new("Practice");
//! sheet.add_equations("5", 2)?;
//! save_worksheet(&sheet, Path::new("practice.tws"))?;
//!
//! let loaded = load_worksheet(Path::new("practice.tws"))?;
//! assert_eq!(loaded.len(), 2);
//! # Ok::<(), trig_core::errors::TrigError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{TrigError, TrigResult};
use crate::worksheet::{Worksheet, SCHEMA_VERSION};

/// Temporary sibling used while writing `path`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write bytes with atomic-replace semantics.
///
/// 1. Write to `<path>.tmp`
/// 2. Sync to disk (fsync)
/// 3. Rename over `path` (atomic on most filesystems)
///
/// An interrupted write never leaves a truncated `path` behind.
pub fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> TrigResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        TrigError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        TrigError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        TrigError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        TrigError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), bytes = bytes.len(), "file written");
    Ok(())
}

/// Save a worksheet as pretty-printed JSON with an atomic write.
pub fn save_worksheet(sheet: &Worksheet, path: &Path) -> TrigResult<()> {
    let json = serde_json::to_string_pretty(sheet)?;
    write_bytes_atomic(path, json.as_bytes())
}

/// Load a worksheet from a file.
///
/// # Returns
///
/// * `Ok(Worksheet)` - Successfully loaded worksheet
/// * `Err(TrigError::VersionMismatch)` - File version is incompatible
/// * `Err(TrigError::SerializationError)` - Invalid JSON
/// * `Err(TrigError::FileError)` - I/O error
pub fn load_worksheet(path: &Path) -> TrigResult<Worksheet> {
    let contents = fs::read_to_string(path)
        .map_err(|e| TrigError::file_error("read", path.display().to_string(), e.to_string()))?;

    let sheet: Worksheet = serde_json::from_str(&contents).map_err(|e| TrigError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&sheet.meta.version)?;

    debug!(path = %path.display(), problems = sheet.len(), "worksheet loaded");
    Ok(sheet)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> TrigResult<()> {
    let mismatch = || TrigError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions a newer minor may carry breaking changes
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;

    #[test]
    fn test_tmp_path_generation() {
        let path = Path::new("/path/to/sheet.tws");
        assert_eq!(tmp_path_for(path), Path::new("/path/to/sheet.tws.tmp"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.tws");

        let mut sheet = Worksheet::with_config("Roundtrip", GeneratorConfig::seeded(8));
        sheet.add_equations("1", 2).unwrap();
        sheet.add_equations("14", 1).unwrap();
        save_worksheet(&sheet, &path).unwrap();

        let loaded = load_worksheet(&path).unwrap();
        assert_eq!(loaded, sheet);
        assert_eq!(loaded.problems[2].solution_markup(), sheet.problems[2].solution_markup());
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atomic.tws");

        save_worksheet(&Worksheet::new("Atomic"), &path).unwrap();

        assert!(!tmp_path_for(&path).exists());
        assert!(path.exists());
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.tws");

        let mut sheet = Worksheet::new("Future");
        sheet.meta.version = "0.9.0".to_string();
        save_worksheet(&sheet, &path).unwrap();

        let err = load_worksheet(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_worksheet(&dir.path().join("absent.tws")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_missing_fields_render_not_available() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edited.tws");

        let mut sheet = Worksheet::with_config("Edited", GeneratorConfig::seeded(4));
        sheet.add_equations("2", 1).unwrap();
        let mut json: serde_json::Value = serde_json::to_value(&sheet).unwrap();
        let problem = json["problems"][0].as_object_mut().unwrap();
        problem.remove("equation");
        problem.remove("solution");
        fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();

        let loaded = load_worksheet(&path).unwrap();
        assert_eq!(loaded.problems[0].equation_markup(), crate::instance::NOT_AVAILABLE);
        assert_eq!(loaded.problems[0].solution_markup(), crate::instance::NOT_AVAILABLE);
    }
}
