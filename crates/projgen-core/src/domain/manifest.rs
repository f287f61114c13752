//! The template manifest: which files form the scaffold.
//!
//! The manifest is fixed configuration. Extending the template set means
//! appending an entry to [`STANDARD_ENTRIES`]; the builder exists for
//! callers that embed a different template set.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{
    error::DomainError,
    skeleton::{CONTROLLER_DIRECTORY, CONTROLLER_STEM, SKELETON_DIRECTORIES},
};

/// One file of the template set.
///
/// `subpath` is relative to the template/project root, without a trailing
/// separator; the empty string means the root itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TemplateFileEntry {
    pub filename: &'static str,
    pub subpath: &'static str,
    pub substitutable: bool,
}

impl TemplateFileEntry {
    pub const fn new(filename: &'static str, subpath: &'static str, substitutable: bool) -> Self {
        Self {
            filename,
            subpath,
            substitutable,
        }
    }

    /// Path of the file relative to a root.
    pub fn relative_path(&self) -> PathBuf {
        Path::new(self.subpath).join(self.filename)
    }

    /// File extension without the dot, if any.
    pub fn extension(&self) -> Option<&'static str> {
        let (stem, ext) = self.filename.rsplit_once('.')?;
        (!stem.is_empty()).then_some(ext)
    }

    /// Whether this is the controller template that gets renamed.
    pub fn is_controller(&self) -> bool {
        if self.subpath != CONTROLLER_DIRECTORY {
            return false;
        }
        match self.filename.strip_prefix(CONTROLLER_STEM) {
            Some("") => true,
            Some(rest) => rest.starts_with('.') && !rest[1..].contains('.'),
            None => false,
        }
    }
}

/// The default PHP application template set.
pub const STANDARD_ENTRIES: [TemplateFileEntry; 7] = [
    TemplateFileEntry::new("db.php", "config", true),
    TemplateFileEntry::new("paths.php", "config", false),
    TemplateFileEntry::new("Controller.php", "lib/App", true),
    TemplateFileEntry::new("base.sql", "sql", false),
    TemplateFileEntry::new("bootstrap.php", "", false),
    TemplateFileEntry::new("index.php", "", true),
    TemplateFileEntry::new(".gitignore", "", false),
];

/// Ordered, immutable list of template files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateManifest {
    entries: Vec<TemplateFileEntry>,
}

impl TemplateManifest {
    /// The built-in manifest.
    pub fn standard() -> Self {
        Self {
            entries: STANDARD_ENTRIES.to_vec(),
        }
    }

    pub fn builder() -> TemplateManifestBuilder {
        TemplateManifestBuilder::default()
    }

    /// All entries, in copy order.
    pub fn entries(&self) -> impl Iterator<Item = &TemplateFileEntry> {
        self.entries.iter()
    }

    /// Entries whose content goes through token substitution.
    pub fn substitutable(&self) -> impl Iterator<Item = &TemplateFileEntry> {
        self.entries.iter().filter(|e| e.substitutable)
    }

    /// The controller template entry, if the manifest has one.
    pub fn controller(&self) -> Option<&TemplateFileEntry> {
        self.entries.iter().find(|e| e.is_controller())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.entries.is_empty() {
            return Err(DomainError::InvalidManifest("manifest has no entries".into()));
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            if entry.filename.is_empty() || entry.filename.contains(|c: char| c == '/' || c == '\\') {
                return Err(DomainError::InvalidManifest(format!(
                    "invalid filename '{}'",
                    entry.filename
                )));
            }

            if !entry.subpath.is_empty() && !SKELETON_DIRECTORIES.contains(&entry.subpath) {
                return Err(DomainError::InvalidManifest(format!(
                    "'{}' is not a skeleton directory",
                    entry.subpath
                )));
            }

            if !seen.insert(entry.relative_path()) {
                return Err(DomainError::InvalidManifest(format!(
                    "duplicate entry '{}'",
                    entry.relative_path().display()
                )));
            }
        }

        if self.controller().is_none() {
            return Err(DomainError::InvalidManifest(format!(
                "no {CONTROLLER_STEM} template in {CONTROLLER_DIRECTORY}"
            )));
        }

        Ok(())
    }
}

impl Default for TemplateManifest {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builder for non-standard manifests.
#[derive(Debug, Default)]
pub struct TemplateManifestBuilder {
    entries: Vec<TemplateFileEntry>,
}

impl TemplateManifestBuilder {
    pub fn entry(mut self, filename: &'static str, subpath: &'static str, substitutable: bool) -> Self {
        self.entries
            .push(TemplateFileEntry::new(filename, subpath, substitutable));
        self
    }

    pub fn build(self) -> Result<TemplateManifest, DomainError> {
        let manifest = TemplateManifest {
            entries: self.entries,
        };
        manifest.validate()?;
        Ok(manifest)
    }
}
