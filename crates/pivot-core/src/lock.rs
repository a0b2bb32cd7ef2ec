use crate::error::ErrorCode;
use fs2::FileExt;
use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

/// Advisory lock errors for the data file.
#[derive(Debug)]
pub enum LockError {
    Timeout { path: PathBuf, waited: Duration },
    IoError(io::Error),
}

impl From<io::Error> for LockError {
    fn from(err: io::Error) -> Self {
        Self::IoError(err)
    }
}

impl LockError {
    /// Machine-readable code associated with this lock error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Timeout { .. } => ErrorCode::StorageLock,
            Self::IoError(_) => ErrorCode::StorageIo,
        }
    }

    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

impl std::fmt::Display for LockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout { path, waited } => {
                write!(
                    f,
                    "{}: lock timed out after {:?} at {}",
                    self.code().code(),
                    waited,
                    path.display()
                )
            }
            Self::IoError(err) => write!(f, "{}: {}", self.code().code(), err),
        }
    }
}

impl std::error::Error for LockError {}

/// RAII guard for the exclusive lock taken around data file writes.
///
/// The lock lives on a sibling `<data file>.lock` so the data file itself can
/// be replaced by rename while the lock is held.
#[derive(Debug)]
pub struct DataLock {
    file: File,
    path: PathBuf,
}

impl DataLock {
    /// Lock path used for `data_path`.
    #[must_use]
    pub fn path_for(data_path: &Path) -> PathBuf {
        let mut name = data_path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".lock");
        data_path.with_file_name(name)
    }

    /// Acquire an exclusive advisory lock, polling until `timeout` elapses.
    ///
    /// # Errors
    ///
    /// [`LockError::Timeout`] if another holder keeps the lock past `timeout`,
    /// [`LockError::IoError`] if the lock file cannot be created.
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self, LockError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let start = Instant::now();
        loop {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(path)?;

            if file.try_lock_exclusive().is_ok() {
                return Ok(Self {
                    file,
                    path: path.to_path_buf(),
                });
            }

            if start.elapsed() >= timeout {
                return Err(LockError::Timeout {
                    path: path.to_path_buf(),
                    waited: start.elapsed(),
                });
            }

            thread::sleep(Duration::from_millis(10));
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DataLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_path_is_sibling() {
        let path = DataLock::path_for(Path::new("/tmp/pivot/data.json"));
        assert_eq!(path, PathBuf::from("/tmp/pivot/data.json.lock"));
    }

    #[test]
    fn second_acquire_times_out_while_held() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("data.json.lock");
        let held = DataLock::acquire(&path, Duration::from_millis(50)).expect("first lock");
        assert_eq!(held.path(), path);
        let err = DataLock::acquire(&path, Duration::from_millis(30)).expect_err("contended");
        assert!(matches!(err, LockError::Timeout { .. }));
        assert_eq!(err.code(), ErrorCode::StorageLock);
        drop(held);
        assert!(DataLock::acquire(&path, Duration::from_millis(50)).is_ok());
    }
}
