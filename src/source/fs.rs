use std::path::PathBuf;

use crate::error::{LoaderError, Result};

/// Read access to template files.
pub trait FileSystem {
    /// True if `path` names an existing regular file.
    fn exists(&self, path: &str) -> bool;

    fn read_text(&self, path: &str) -> Result<String>;
}

/// `std::fs` rooted at a base directory.
#[derive(Debug, Clone)]
pub struct OsFileSystem {
    base_dir: PathBuf,
}

impl OsFileSystem {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }
}

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &str) -> bool {
        !path.is_empty() && self.resolve(path).is_file()
    }

    fn read_text(&self, path: &str) -> Result<String> {
        std::fs::read_to_string(self.resolve(path)).map_err(|e| LoaderError::Read {
            path: path.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn exists_only_for_regular_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/a.md"), "hello").unwrap();

        let fs = OsFileSystem::new(dir.path());
        assert!(fs.exists("sub/a.md"));
        assert!(!fs.exists("sub"));
        assert!(!fs.exists("sub/missing.md"));
        assert!(!fs.exists(""));
    }

    #[test]
    fn read_text_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "hello").unwrap();

        let fs = OsFileSystem::new(dir.path());
        assert_eq!(fs.read_text("a.md").unwrap(), "hello");
    }

    #[test]
    fn read_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let fs = OsFileSystem::new(dir.path());

        let err = fs.read_text("nope.md").unwrap_err();
        assert!(matches!(err, LoaderError::Read { ref path, .. } if path == "nope.md"));
    }
}
