use std::path::{Path, PathBuf};

use serde::Serialize;

/// Subdirectories created under every project root, parents first.
pub const SKELETON_DIRECTORIES: [&str; 6] =
    ["config", "lib", "lib/App", "sql", "sql/upgrade", "templates"];

/// Directory holding the controller template.
pub const CONTROLLER_DIRECTORY: &str = "lib/App";

/// File stem of the controller template, replaced by the controller name.
pub const CONTROLLER_STEM: &str = "Controller";

/// A file whose placeholders were rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewrittenFile {
    pub path: PathBuf,
    pub replacements: usize,
}

/// The materialized project, as recorded while it was being built.
///
/// All paths except `root` are relative to `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSkeleton {
    root: PathBuf,
    pub(crate) directories: Vec<PathBuf>,
    pub(crate) copied: Vec<PathBuf>,
    pub(crate) rewritten: Vec<RewrittenFile>,
    pub(crate) controller: Option<PathBuf>,
}

impl ProjectSkeleton {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            directories: Vec::new(),
            copied: Vec::new(),
            rewritten: Vec::new(),
            controller: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn copied_files(&self) -> &[PathBuf] {
        &self.copied
    }

    pub fn rewritten_files(&self) -> &[RewrittenFile] {
        &self.rewritten
    }

    /// Final path of the renamed controller file.
    pub fn controller(&self) -> Option<&Path> {
        self.controller.as_deref()
    }

    pub fn total_replacements(&self) -> usize {
        self.rewritten.iter().map(|f| f.replacements).sum()
    }
}
