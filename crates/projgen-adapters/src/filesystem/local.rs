//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use projgen_core::application::ports::Filesystem;
use tracing::trace;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling symlink still counts as taken.
        path.symlink_metadata().is_ok()
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        trace!(path = %path.display(), "create_dir");
        std::fs::create_dir(path).map_err(|e| annotate(e, "create directory"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        trace!(from = %from.display(), to = %to.display(), "copy_file");
        if !from.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "template file does not exist",
            ));
        }
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| annotate(e, "copy file"))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path).map_err(|e| annotate(e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content).map_err(|e| annotate(e, "write file"))
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        trace!(from = %from.display(), to = %to.display(), "rename");
        std::fs::rename(from, to).map_err(|e| annotate(e, "rename"))
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir_all(path).map_err(|e| annotate(e, "remove directory"))
    }
}

/// Prefix the failed operation; the caller already reports the path.
fn annotate(e: io::Error, operation: &str) -> io::Error {
    io::Error::new(e.kind(), format!("failed to {operation}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_dir_is_not_recursive() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();

        let err = fs.create_dir(&tmp.path().join("a/b")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn create_dir_fails_when_present() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let dir = tmp.path().join("a");

        fs.create_dir(&dir).unwrap();
        let err = fs.create_dir(&dir).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert!(err.to_string().starts_with("failed to create directory"));
    }

    #[test]
    fn copy_missing_source_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();

        let err = fs
            .copy_file(&tmp.path().join("nope.php"), &tmp.path().join("out.php"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!tmp.path().join("out.php").exists());
    }

    #[test]
    fn copy_then_rewrite() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let from = tmp.path().join("in.php");
        let to = tmp.path().join("out.php");
        std::fs::write(&from, "<?php %CONTROLLERNAME%").unwrap();

        fs.copy_file(&from, &to).unwrap();
        let text = fs.read_to_string(&to).unwrap();
        fs.write_file(&to, &text.replace("%CONTROLLERNAME%", "Blog"))
            .unwrap();

        assert_eq!(std::fs::read_to_string(&to).unwrap(), "<?php Blog");
        assert_eq!(std::fs::read_to_string(&from).unwrap(), "<?php %CONTROLLERNAME%");
    }

    #[test]
    fn rename_and_remove_directory() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let staging = tmp.path().join(".blog.staging-1");
        let dest = tmp.path().join("blog");
        fs.create_dir(&staging).unwrap();
        fs.write_file(&staging.join("index.php"), "x").unwrap();

        fs.rename(&staging, &dest).unwrap();
        assert!(fs.exists(&dest.join("index.php")));
        assert!(!fs.exists(&staging));

        fs.remove_dir_all(&dest).unwrap();
        assert!(!fs.exists(&dest));
    }
}
