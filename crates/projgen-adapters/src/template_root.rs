//! Template root discovery and inspection.
//!
//! A template root is a directory holding every manifest file at its
//! subpath. [`resolve`] probes candidate directories in priority order and
//! returns the first complete one:
//!
//! 1. **The configured root**: `--templates` or `paths.template_root`.
//! 2. **`./templates`**: relative to the current working directory.
//! 3. **`<executable-dir>/templates`**: sibling to the `projgen` binary.
//!
//! An incomplete candidate is skipped with a `DEBUG` event; [`inspect`]
//! tells which files it lacks.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use projgen_core::domain::{TemplateFileEntry, TemplateManifest};

/// What a directory holds compared with a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRootReport {
    pub root: PathBuf,
    pub present: Vec<TemplateFileEntry>,
    pub missing: Vec<TemplateFileEntry>,
    /// Files under the root that no manifest entry names. They are not copied.
    pub extra: Vec<PathBuf>,
}

impl TemplateRootReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Compare `root` against `manifest`.
pub fn inspect(root: &Path, manifest: &TemplateManifest) -> TemplateRootReport {
    let (present, missing): (Vec<_>, Vec<_>) = manifest
        .entries()
        .copied()
        .partition(|entry| root.join(entry.relative_path()).is_file());

    let known: BTreeSet<PathBuf> = manifest.entries().map(|e| e.relative_path()).collect();

    let extra = if root.is_dir() {
        WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable template entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
            .filter(|relative| !known.contains(relative))
            .collect()
    } else {
        Vec::new()
    };

    TemplateRootReport {
        root: root.to_path_buf(),
        present,
        missing,
        extra,
    }
}

/// Ordered candidate roots. Unresolvable entries are omitted.
pub fn candidate_roots(configured: Option<&Path>) -> Vec<PathBuf> {
    let mut roots = Vec::with_capacity(3);

    if let Some(configured) = configured {
        roots.push(configured.to_path_buf());
    }

    roots.push(PathBuf::from("templates"));

    if let Some(sibling) = exe_sibling_templates() {
        roots.push(sibling);
    }

    roots
}

/// First complete candidate root, if any.
#[instrument(skip(manifest))]
pub fn resolve(configured: Option<&Path>, manifest: &TemplateManifest) -> Option<PathBuf> {
    for candidate in candidate_roots(configured) {
        debug!(path = %candidate.display(), "Checking candidate template root");

        let report = inspect(&candidate, manifest);
        if report.is_complete() {
            info!(path = %candidate.display(), "Template root resolved");
            return Some(candidate);
        }

        debug!(
            path = %candidate.display(),
            missing = report.missing.len(),
            "Template root incomplete, trying next"
        );
    }

    warn!("No complete template root found");
    None
}

/// `<directory of current executable>/templates`.
fn exe_sibling_templates() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("templates")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin_templates;
    use tempfile::TempDir;

    #[test]
    fn exported_builtins_are_complete() {
        let tmp = TempDir::new().unwrap();
        builtin_templates::export(tmp.path(), false).unwrap();

        let report = inspect(tmp.path(), &TemplateManifest::standard());

        assert!(report.is_complete());
        assert_eq!(report.present.len(), 7);
        assert!(report.extra.is_empty());
    }

    #[test]
    fn missing_and_extra_files_are_reported() {
        let tmp = TempDir::new().unwrap();
        builtin_templates::export(tmp.path(), false).unwrap();
        std::fs::remove_file(tmp.path().join("config/db.php")).unwrap();
        std::fs::write(tmp.path().join("README.md"), "notes").unwrap();

        let report = inspect(tmp.path(), &TemplateManifest::standard());

        assert!(!report.is_complete());
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].filename, "db.php");
        assert_eq!(report.extra, vec![PathBuf::from("README.md")]);
    }

    #[test]
    fn nonexistent_root_is_all_missing() {
        let report = inspect(Path::new("/definitely/not/here"), &TemplateManifest::standard());
        assert_eq!(report.missing.len(), 7);
        assert!(report.extra.is_empty());
    }

    #[test]
    fn configured_root_wins() {
        let tmp = TempDir::new().unwrap();
        builtin_templates::export(tmp.path(), false).unwrap();

        let resolved = resolve(Some(tmp.path()), &TemplateManifest::standard());
        assert_eq!(resolved.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn configured_root_comes_first() {
        let roots = candidate_roots(Some(Path::new("/srv/tpl")));
        assert_eq!(roots[0], Path::new("/srv/tpl"));
        assert_eq!(roots[1], Path::new("templates"));
    }
}
