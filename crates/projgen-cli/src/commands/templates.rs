//! `projgen templates`: inspect the manifest and export the built-in set.

use std::path::{Path, PathBuf};

use serde::Serialize;

use projgen_adapters::{builtin_templates, template_root};
use projgen_core::domain::TemplateManifest;

use crate::{
    cli::TemplateCommands,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(cmd: TemplateCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        TemplateCommands::List { root } => list(root.or(config.paths.template_root), &output),
        TemplateCommands::Export { dir, force } => export(&dir, force, &output),
    }
}

#[derive(Debug, Serialize)]
struct EntryRow {
    path: PathBuf,
    substitutable: bool,
    /// `None` when no template root was found to compare against.
    present: Option<bool>,
}

#[derive(Debug, Serialize)]
struct Listing {
    root: Option<PathBuf>,
    entries: Vec<EntryRow>,
    extra: Vec<PathBuf>,
}

/// Manifest rows, compared against `root` or the discovered root.
fn listing(root: Option<PathBuf>) -> Listing {
    let manifest = TemplateManifest::standard();
    let root = root.or_else(|| template_root::resolve(None, &manifest));

    let report = root
        .as_deref()
        .map(|root| template_root::inspect(root, &manifest));

    let entries = manifest
        .entries()
        .map(|entry| EntryRow {
            path: entry.relative_path(),
            substitutable: entry.substitutable,
            present: report.as_ref().map(|r| r.present.contains(entry)),
        })
        .collect();

    Listing {
        root,
        entries,
        extra: report.map(|r| r.extra).unwrap_or_default(),
    }
}

fn list(root: Option<PathBuf>, output: &OutputManager) -> CliResult<()> {
    let listing = listing(root);

    if output.is_json() {
        output.json(&listing)?;
        return Ok(());
    }

    match &listing.root {
        Some(root) => output.header(&format!("Template manifest ({})", root.display()))?,
        None => output.header("Template manifest (no template root found)")?,
    }

    let width = listing
        .entries
        .iter()
        .map(|e| e.path.display().to_string().len())
        .max()
        .unwrap_or(0);

    for row in &listing.entries {
        let mark = match row.present {
            Some(true) => "\u{2713}",
            Some(false) => "\u{2717}",
            None => "-",
        };
        let kind = if row.substitutable { "substituted" } else { "verbatim" };
        output.print(&format!(
            "  {mark} {:<width$}  {kind}",
            row.path.display().to_string()
        ))?;
    }

    let missing = listing
        .entries
        .iter()
        .filter(|e| e.present == Some(false))
        .count();
    if missing > 0 {
        output.warning(&format!("{missing} template file(s) missing"))?;
    }
    if !listing.extra.is_empty() {
        output.info(&format!(
            "{} file(s) outside the manifest will not be copied",
            listing.extra.len()
        ))?;
    }
    if listing.root.is_none() {
        output.info("Create one with: projgen templates export ./templates")?;
    }

    Ok(())
}

fn export(dir: &Path, force: bool, output: &OutputManager) -> CliResult<()> {
    let written = builtin_templates::export(dir, force)?;

    if output.is_json() {
        output.json(&written)?;
        return Ok(());
    }

    for path in &written {
        output.print(&format!("  {}", path.display()))?;
    }
    output.success(&format!(
        "Exported {} templates to {}",
        written.len(),
        dir.display()
    ))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn listing_marks_missing_files() {
        let tmp = TempDir::new().unwrap();
        builtin_templates::export(tmp.path(), false).unwrap();
        std::fs::remove_file(tmp.path().join("index.php")).unwrap();

        let listing = listing(Some(tmp.path().to_path_buf()));

        assert_eq!(listing.entries.len(), 7);
        let index = listing
            .entries
            .iter()
            .find(|e| e.path == Path::new("index.php"))
            .unwrap();
        assert_eq!(index.present, Some(false));
        assert!(index.substitutable);
        assert_eq!(
            listing.entries.iter().filter(|e| e.present == Some(true)).count(),
            6
        );
    }

    #[test]
    fn listing_keeps_manifest_order() {
        let tmp = TempDir::new().unwrap();
        let listing = listing(Some(tmp.path().to_path_buf()));

        let paths: Vec<_> = listing.entries.iter().map(|e| e.path.clone()).collect();
        assert_eq!(paths[0], PathBuf::from("config/db.php"));
        assert_eq!(paths[6], PathBuf::from(".gitignore"));
    }
}
