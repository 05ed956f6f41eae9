//! # File I/O
//!
//! Project files (`.aqd`) and design results are human-readable JSON.
//! Writes are atomic: the JSON goes to a `.tmp` sibling, is synced to disk,
//! then renamed over the target, so an interrupted save never leaves a
//! half-written file behind.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hydro_core::calculations::flume_design::FlumeDesignInput;
//! use hydro_core::file_io::{load_project, save_project};
//! use hydro_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Engineer", "26-001", "Client", FlumeDesignInput::example());
//! save_project(&project, Path::new("aqueduct.aqd"))?;
//! let loaded = load_project(Path::new("aqueduct.aqd"))?;
//! assert_eq!(loaded.meta.job_id, "26-001");
//! # Ok::<(), hydro_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::calculations::flume_design::FlumeDesignResult;
use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Extension of project files
pub const PROJECT_EXTENSION: &str = "aqd";

/// Serialize `value` and write it to `path` atomically.
fn write_json_atomic<T: Serialize>(value: &T, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let mut tmp_file = File::create(tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), bytes = json.len(), "saved");
    Ok(())
}

/// Save a project atomically.
///
/// # Errors
///
/// * `SerializationError` - the project could not be encoded
/// * `FileError` - any I/O step failed; the target is left untouched
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    write_json_atomic(project, path)
}

/// Save a design result as JSON, with the same atomic write as projects.
pub fn save_result(result: &FlumeDesignResult, path: &Path) -> CalcResult<()> {
    write_json_atomic(result, path)
}

/// Load a project from a file.
///
/// # Returns
///
/// * `Ok(Project)` - Successfully loaded project
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let mut file =
        File::open(path).map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let project: Project = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&project.meta.version)?;
    debug!(path = %path.display(), job_id = %project.meta.job_id, "loaded project");

    Ok(project)
}

/// Check a file's schema version against [`SCHEMA_VERSION`].
///
/// Major versions must match. While the schema is 0.x, a file with a newer
/// minor version is rejected as well.
pub fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let parse = |v: &str| -> Option<Vec<u32>> { v.split('.').map(|p| p.parse().ok()).collect() };
    let (file_parts, current_parts) = match (parse(file_version), parse(SCHEMA_VERSION)) {
        (Some(f), Some(c)) if !f.is_empty() && !c.is_empty() => (f, c),
        _ => return Err(mismatch()),
    };

    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    if current_parts[0] == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::flume_design::{calculate, FlumeDesignInput};
    use crate::project::DesignSettings;
    use std::env::temp_dir;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("hydro_test_{name}.{PROJECT_EXTENSION}"))
    }

    fn project() -> Project {
        Project::new("Test Engineer", "TEST-001", "Test Client", FlumeDesignInput::example())
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_path("roundtrip");
        save_project(&project(), &path).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.meta.engineer, "Test Engineer");
        assert_eq!(loaded.meta.job_id, "TEST-001");
        assert_eq!(loaded.design.design_discharge, 20.0);
        assert_eq!(loaded.settings, DesignSettings::default());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let path = temp_path("atomic");
        save_project(&project(), &path).unwrap();

        let tmp = PathBuf::from(format!("{}.tmp", path.display()));
        assert!(!tmp.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_result() {
        let path = temp_dir().join("hydro_test_result.json");
        let result = calculate(&FlumeDesignInput::example(), &DesignSettings::default()).unwrap();
        save_result(&result, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["rise_check"]["passes"], serde_json::Value::Bool(true));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_project(Path::new("/nonexistent/hydro_missing.aqd")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_invalid_json() {
        let path = temp_path("invalid");
        fs::write(&path, "{ not json").unwrap();
        let err = load_project(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_newer_file_rejected() {
        let path = temp_path("newer");
        let mut p = project();
        p.meta.version = "0.9.0".to_string();
        save_project(&p, &path).unwrap();
        assert!(matches!(load_project(&path), Err(CalcError::VersionMismatch { .. })));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("abc").is_err());
    }
}
