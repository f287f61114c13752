//! In-memory filesystem adapter for testing and dry runs.

use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use projgen_core::application::ports::Filesystem;

/// In-memory filesystem with the same failure semantics as the local one:
/// directories need an existing parent, `create_dir` refuses existing paths,
/// and copies need an existing source.
///
/// Clones share state, so a test can keep a handle after boxing one.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            // The filesystem root and the relative base always exist.
            Some(parent) if parent.parent().is_some() && !parent.as_os_str().is_empty() => {
                self.directories.contains(parent)
            }
            _ => true,
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating its parent directories (testing helper).
    pub fn seed_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut inner = self.write();
        if let Some(parent) = path.parent() {
            let mut current = PathBuf::new();
            for component in parent.components() {
                current.push(component);
                inner.directories.insert(current.clone());
            }
        }
        inner.files.insert(path.to_path_buf(), content.into());
    }

    /// Add a directory and its ancestors (testing helper).
    pub fn seed_dir(&self, path: impl AsRef<Path>) {
        let mut inner = self.write();
        let mut current = PathBuf::new();
        for component in path.as_ref().components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
    }

    /// Read a file's content as text (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.read();
        let bytes = inner.files.get(path.as_ref())?;
        String::from_utf8(bytes.clone()).ok()
    }

    /// All files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read().files.keys().cloned().collect()
    }

    /// All directories, sorted.
    pub fn list_directories(&self) -> Vec<PathBuf> {
        self.read().directories.iter().cloned().collect()
    }

    // Poisoning only happens if a test panicked mid-operation.
    fn read(&self) -> RwLockReadGuard<'_, MemoryFilesystemInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryFilesystemInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn not_found(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, what.to_string())
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.read().exists(path)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        let mut inner = self.write();
        if inner.exists(path) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "path exists"));
        }
        if !inner.parent_exists(path) {
            return Err(not_found("parent directory does not exist"));
        }
        inner.directories.insert(path.to_path_buf());
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut inner = self.write();
        let content = inner
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| not_found("source file does not exist"))?;
        if !inner.parent_exists(to) {
            return Err(not_found("parent directory does not exist"));
        }
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let inner = self.read();
        let bytes = inner
            .files
            .get(path)
            .ok_or_else(|| not_found("file does not exist"))?;
        String::from_utf8(bytes.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        let mut inner = self.write();
        if !inner.parent_exists(path) {
            return Err(not_found("parent directory does not exist"));
        }
        inner
            .files
            .insert(path.to_path_buf(), content.as_bytes().to_vec());
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut inner = self.write();
        if !inner.exists(from) {
            return Err(not_found("source does not exist"));
        }
        if !inner.parent_exists(to) {
            return Err(not_found("parent directory does not exist"));
        }

        if let Some(content) = inner.files.remove(from) {
            inner.files.insert(to.to_path_buf(), content);
            return Ok(());
        }

        // Directory: move it and everything below it.
        let dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for dir in dirs {
            inner.directories.remove(&dir);
            if let Ok(rest) = dir.strip_prefix(from) {
                inner.directories.insert(to.join(rest));
            }
        }

        let files: Vec<PathBuf> = inner
            .files
            .keys()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for file in files {
            if let (Some(content), Ok(rest)) = (inner.files.remove(&file), file.strip_prefix(from))
            {
                inner.files.insert(to.join(rest), content);
            }
        }

        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut inner = self.write();
        if !inner.directories.contains(path) {
            return Err(not_found("directory does not exist"));
        }
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dir_requires_parent_and_absence() {
        let fs = MemoryFilesystem::new();

        assert_eq!(
            fs.create_dir(Path::new("/out/blog")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );

        fs.seed_dir("/out");
        fs.create_dir(Path::new("/out/blog")).unwrap();
        assert_eq!(
            fs.create_dir(Path::new("/out/blog")).unwrap_err().kind(),
            io::ErrorKind::AlreadyExists
        );
    }

    #[test]
    fn copy_needs_source() {
        let fs = MemoryFilesystem::new();
        fs.seed_dir("/out");

        let err = fs
            .copy_file(Path::new("/tpl/index.php"), Path::new("/out/index.php"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        fs.seed_file("/tpl/index.php", "<?php");
        fs.copy_file(Path::new("/tpl/index.php"), Path::new("/out/index.php"))
            .unwrap();
        assert_eq!(fs.read_file("/out/index.php").as_deref(), Some("<?php"));
    }

    #[test]
    fn non_utf8_cannot_be_read_as_text() {
        let fs = MemoryFilesystem::new();
        fs.seed_file("/tpl/logo.png", vec![0xff, 0xfe, 0x00]);

        let err = fs.read_to_string(Path::new("/tpl/logo.png")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn rename_moves_directory_trees() {
        let fs = MemoryFilesystem::new();
        fs.seed_file("/out/.blog.staging/lib/App/Blog.php", "class Blog {}");

        fs.rename(Path::new("/out/.blog.staging"), Path::new("/out/blog"))
            .unwrap();

        assert!(fs.exists(Path::new("/out/blog/lib/App")));
        assert_eq!(
            fs.read_file("/out/blog/lib/App/Blog.php").as_deref(),
            Some("class Blog {}")
        );
        assert!(!fs.exists(Path::new("/out/.blog.staging")));
    }

    #[test]
    fn rename_file() {
        let fs = MemoryFilesystem::new();
        fs.seed_file("/p/lib/App/Controller.php", "x");

        fs.rename(
            Path::new("/p/lib/App/Controller.php"),
            Path::new("/p/lib/App/Blog.php"),
        )
        .unwrap();

        assert_eq!(
            fs.list_files(),
            vec![PathBuf::from("/p/lib/App/Blog.php")]
        );
    }

    #[test]
    fn remove_dir_all_drops_subtree_only() {
        let fs = MemoryFilesystem::new();
        fs.seed_file("/out/blog/index.php", "x");
        fs.seed_file("/out/keep/index.php", "y");

        fs.remove_dir_all(Path::new("/out/blog")).unwrap();

        assert!(!fs.exists(Path::new("/out/blog")));
        assert!(fs.exists(Path::new("/out/keep/index.php")));
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new();
        let handle = fs.clone();
        fs.seed_file("/a.txt", "a");
        assert!(handle.exists(Path::new("/a.txt")));
    }
}
