//! JSON persistence for the case sequence.
//!
//! The whole repository is stored as one JSON document:
//!
//! ```json
//! { "cases": [ { "title": "...", "status": "active", ... } ] }
//! ```
//!
//! Saves write a sibling temp file and rename it over the data file while
//! holding [`DataLock`], so a crash mid-write never leaves a truncated file.

use crate::error::ErrorCode;
use crate::lock::{DataLock, LockError};
use crate::model::Case;
use crate::repository::ensure_unique;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("lock error: {0}")]
    Lock(#[from] LockError),

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid data in {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl StorageError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::StorageIo,
            Self::Lock(err) => err.code(),
            Self::Parse { .. } | Self::Invalid { .. } => ErrorCode::CorruptData,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedCases {
    #[serde(default)]
    cases: Vec<Case>,
}

/// Loads and saves the case sequence at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored cases. A missing file is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Io`] if the file exists but cannot be read.
    /// - [`StorageError::Parse`] if the JSON or a field value is malformed.
    /// - [`StorageError::Invalid`] if two stored cases share weak identity.
    pub fn load(&self) -> Result<Option<Vec<Case>>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no data file, starting empty");
                return Ok(None);
            }
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let parsed: SerializedCases =
            serde_json::from_str(&content).map_err(|source| StorageError::Parse {
                path: self.path.clone(),
                source,
            })?;

        ensure_unique(&parsed.cases).map_err(|err| StorageError::Invalid {
            path: self.path.clone(),
            reason: err.to_string(),
        })?;

        info!(path = %self.path.display(), cases = parsed.cases.len(), "loaded cases");
        Ok(Some(parsed.cases))
    }

    /// Replace the stored cases with `cases`.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Lock`] if another process holds the data lock.
    /// - [`StorageError::Io`] if the temp file cannot be written or renamed.
    pub fn save(&self, cases: &[Case]) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let lock = DataLock::acquire(&DataLock::path_for(&self.path), LOCK_TIMEOUT)?;
        debug!(lock = %lock.path().display(), "acquired data lock");

        let body = serde_json::to_string_pretty(&SerializedCasesRef { cases })
            .map_err(|source| StorageError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let mut tmp_name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, body + "\n").map_err(io_err)?;
        fs::rename(&tmp_path, &self.path).map_err(io_err)?;

        info!(path = %self.path.display(), cases = cases.len(), "saved cases");
        Ok(())
    }
}

#[derive(Serialize)]
struct SerializedCasesRef<'a> {
    cases: &'a [Case],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CasePerson, Name, Role, Status, Title};

    fn case(title: &str) -> Case {
        Case::new(Title::new(title).expect("valid title"))
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = JsonStorage::new(dir.path().join("pivot.json"));
        assert!(storage.load().expect("load").is_none());
    }

    #[test]
    fn save_then_load_preserves_cases() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = JsonStorage::new(dir.path().join("data/pivot.json"));
        let cases = vec![
            case("Theft at Library").with_persons(
                Role::Suspect,
                vec![CasePerson::new(Name::new("John Doe").expect("valid"))],
            ),
            case("Arson").with_status(Status::Cold),
        ];
        storage.save(&cases).expect("save");
        assert_eq!(storage.load().expect("load"), Some(cases));
        assert!(!dir.path().join("data/pivot.json.tmp").exists());
    }

    #[test]
    fn duplicate_cases_are_rejected_on_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("pivot.json");
        fs::write(
            &path,
            r#"{"cases":[{"title":"Arson"},{"title":"arson"}]}"#,
        )
        .expect("write");
        let err = JsonStorage::new(&path).load().expect_err("duplicates");
        assert!(matches!(err, StorageError::Invalid { .. }));
        assert_eq!(err.code(), ErrorCode::CorruptData);
    }

    #[test]
    fn invalid_field_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("pivot.json");
        fs::write(&path, r#"{"cases":[{"title":"   "}]}"#).expect("write");
        let err = JsonStorage::new(&path).load().expect_err("blank title");
        assert!(matches!(err, StorageError::Parse { .. }));
    }
}
