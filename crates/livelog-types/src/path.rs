use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// File name used when no path is given
const DEFAULT_FILE_NAME: &str = "livelog.log";

/// Default log file shared by the reader and the logger: `/tmp/livelog.log`
/// on macOS, the platform temp directory elsewhere
pub fn default_log_path() -> PathBuf {
    if cfg!(target_os = "macos") {
        PathBuf::from("/tmp").join(DEFAULT_FILE_NAME)
    } else {
        std::env::temp_dir().join(DEFAULT_FILE_NAME)
    }
}

/// Check that `path` can serve as a log file: it must not be a directory,
/// and its parent must be an existing, readable directory.
///
/// The file itself does not need to exist yet.
pub fn validate_log_path(path: &Path) -> Result<(), ConfigError> {
    if path.is_dir() {
        return Err(ConfigError::IsADirectory(path.to_path_buf()));
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let dir = match parent.canonicalize() {
        Ok(dir) => dir,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(ConfigError::InsufficientPermissions(parent));
        }
        Err(_) => return Err(ConfigError::ParentMissing(parent)),
    };

    if !dir.is_dir() {
        return Err(ConfigError::ParentMissing(dir));
    }

    match fs::read_dir(&dir) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            Err(ConfigError::InsufficientPermissions(dir))
        }
        Err(_) => Err(ConfigError::ParentMissing(dir)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path() {
        let path = default_log_path();
        assert_eq!(path.file_name().unwrap(), DEFAULT_FILE_NAME);
        assert!(validate_log_path(&path).is_ok());
    }

    #[test]
    fn test_missing_file_in_existing_dir_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_log_path(&dir.path().join("later.log")).is_ok());
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_log_path(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IsADirectory(_)));
    }

    #[test]
    fn test_missing_parent_is_rejected() {
        let err = validate_log_path(Path::new("/foo/bar/test.log")).unwrap_err();
        assert!(matches!(err, ConfigError::ParentMissing(_)));
        assert!(err.to_string().contains("/foo/bar"));
    }

    #[test]
    fn test_parent_that_is_a_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, "").unwrap();
        let err = validate_log_path(&file.join("test.log")).unwrap_err();
        assert!(matches!(err, ConfigError::ParentMissing(_)));
    }
}
