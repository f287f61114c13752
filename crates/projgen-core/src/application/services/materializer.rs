//! Project Materializer - turns a template root into a new project tree.
//!
//! The workflow is strictly linear:
//! 1. Create the root and the skeleton directories
//! 2. Copy every manifest file from the template root
//! 3. Substitute placeholders in the substitutable files
//! 4. Rename the controller template after the controller identifier
//!
//! The first failure halts the run. In staged mode (the default) the steps
//! run inside a hidden sibling directory that is renamed onto the destination
//! only once every step succeeded, and discarded otherwise. Unstaged runs
//! leave whatever was built in place.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{
        DEFAULT_INSTANCE_SIGIL, DerivedIdentifiers, ProjectSkeleton, RewrittenFile,
        SKELETON_DIRECTORIES, TemplateManifest, TokenBindings,
    },
    error::{ProjgenError, ProjgenResult},
};

/// Progress of one materialization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MaterializationStage {
    NotStarted,
    DirectoriesCreated,
    FilesCopied,
    TokensSubstituted,
    ControllerRenamed,
    Complete,
}

impl MaterializationStage {
    /// The stage after this one. `Complete` is terminal.
    pub const fn next(self) -> Self {
        match self {
            Self::NotStarted => Self::DirectoriesCreated,
            Self::DirectoriesCreated => Self::FilesCopied,
            Self::FilesCopied => Self::TokensSubstituted,
            Self::TokensSubstituted => Self::ControllerRenamed,
            Self::ControllerRenamed | Self::Complete => Self::Complete,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::DirectoriesCreated => "directories-created",
            Self::FilesCopied => "files-copied",
            Self::TokensSubstituted => "tokens-substituted",
            Self::ControllerRenamed => "controller-renamed",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for MaterializationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds project trees from a template root.
pub struct ProjectMaterializer {
    filesystem: Box<dyn Filesystem>,
    manifest: TemplateManifest,
    instance_sigil: String,
    staged: bool,
}

impl ProjectMaterializer {
    /// Create a staged materializer over the standard manifest.
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            manifest: TemplateManifest::standard(),
            instance_sigil: DEFAULT_INSTANCE_SIGIL.to_string(),
            staged: true,
        }
    }

    pub fn with_manifest(mut self, manifest: TemplateManifest) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn with_instance_sigil(mut self, sigil: impl Into<String>) -> Self {
        self.instance_sigil = sigil.into();
        self
    }

    /// Build in a staging directory and publish atomically (`true`), or
    /// build directly in the destination (`false`).
    pub fn staged(mut self, staged: bool) -> Self {
        self.staged = staged;
        self
    }

    /// Run the whole workflow.
    ///
    /// On success the returned skeleton's root is `destination_root`,
    /// whether or not the run was staged.
    #[instrument(
        skip_all,
        fields(
            source = %source_root.display(),
            destination = %destination_root.display(),
            controller = %identifiers.controller(),
            staged = self.staged
        )
    )]
    pub fn materialize(
        &self,
        source_root: &Path,
        destination_root: &Path,
        identifiers: &DerivedIdentifiers,
    ) -> ProjgenResult<ProjectSkeleton> {
        info!("Materializing project");

        let bindings = TokenBindings::new(identifiers, &self.instance_sigil);
        let mut skeleton = ProjectSkeleton::new(destination_root);

        if self.staged {
            self.run_staged(source_root, destination_root, identifiers, &bindings, &mut skeleton)?;
        } else {
            self.run(source_root, destination_root, identifiers, &bindings, &mut skeleton)?;
        }

        info!(
            directories = skeleton.directories().len(),
            files = skeleton.copied_files().len(),
            replacements = skeleton.total_replacements(),
            "Materialization complete"
        );
        Ok(skeleton)
    }

    // -------------------------------------------------------------------------
    // Steps
    // -------------------------------------------------------------------------

    /// Step 1: create `root` and every skeleton subdirectory.
    ///
    /// Returns the created subdirectories relative to `root`.
    pub fn create_directory_structure(&self, root: &Path) -> ProjgenResult<Vec<PathBuf>> {
        if self.filesystem.exists(root) {
            return Err(ApplicationError::DirectoryCreation {
                path: root.to_path_buf(),
                reason: "directory already exists".into(),
            }
            .into());
        }

        self.create_dir(root)?;
        info!(path = %root.display(), "Directory created");

        let mut created = Vec::with_capacity(SKELETON_DIRECTORIES.len());
        for dir in SKELETON_DIRECTORIES {
            let path = root.join(dir);
            self.create_dir(&path)?;
            info!(path = %path.display(), "Directory created");
            created.push(PathBuf::from(dir));
        }

        Ok(created)
    }

    /// Step 2: copy every manifest entry from `source_root` to
    /// `destination_root`. Stops at the first failure.
    pub fn copy_template_files(
        &self,
        source_root: &Path,
        destination_root: &Path,
    ) -> ProjgenResult<Vec<PathBuf>> {
        let mut copied = Vec::with_capacity(self.manifest.len());

        for entry in self.manifest.entries() {
            let relative = entry.relative_path();
            let from = source_root.join(&relative);
            let to = destination_root.join(&relative);

            self.filesystem
                .copy_file(&from, &to)
                .map_err(|e| ApplicationError::FileCopy {
                    source_path: from.clone(),
                    destination: to.clone(),
                    reason: e.to_string(),
                })?;

            info!(path = %to.display(), "File created");
            copied.push(relative);
        }

        Ok(copied)
    }

    /// Step 3: replace placeholders in every substitutable file, in place.
    pub fn substitute_tokens(
        &self,
        destination_root: &Path,
        bindings: &TokenBindings,
    ) -> ProjgenResult<Vec<RewrittenFile>> {
        let mut rewritten = Vec::new();

        for entry in self.manifest.substitutable() {
            let relative = entry.relative_path();
            let path = destination_root.join(&relative);

            let content = self
                .filesystem
                .read_to_string(&path)
                .map_err(|e| rewrite_error(&path, e))?;

            let substituted = bindings.apply(&content);

            self.filesystem
                .write_file(&path, &substituted.text)
                .map_err(|e| rewrite_error(&path, e))?;

            info!(
                path = %path.display(),
                replacements = substituted.replacements,
                "Custom names replaced"
            );
            rewritten.push(RewrittenFile {
                path: relative,
                replacements: substituted.replacements,
            });
        }

        Ok(rewritten)
    }

    /// Step 4: rename `lib/App/Controller.<ext>` to `lib/App/<controller>.<ext>`.
    ///
    /// Returns the new path relative to `destination_root`.
    pub fn rename_controller_file(
        &self,
        destination_root: &Path,
        controller: &str,
    ) -> ProjgenResult<PathBuf> {
        // Manifests are validated on construction.
        let entry = self.manifest.controller().ok_or_else(|| ProjgenError::Internal {
            message: "template manifest without a controller entry".into(),
        })?;

        let filename = match entry.extension() {
            Some(ext) => format!("{controller}.{ext}"),
            None => controller.to_string(),
        };
        let relative_from = entry.relative_path();
        let relative_to = Path::new(entry.subpath).join(filename);
        let from = destination_root.join(&relative_from);
        let to = destination_root.join(&relative_to);

        if relative_from == relative_to {
            debug!(path = %from.display(), "Controller already has its final name");
            return Ok(relative_to);
        }

        let rename_error = |reason: String| ApplicationError::Rename {
            from: from.clone(),
            to: to.clone(),
            reason,
        };

        if !self.filesystem.exists(&from) {
            return Err(rename_error("controller template is missing".into()).into());
        }
        if self.filesystem.exists(&to) {
            return Err(rename_error("target already exists".into()).into());
        }

        self.filesystem
            .rename(&from, &to)
            .map_err(|e| rename_error(e.to_string()))?;

        info!(from = %from.display(), to = %to.display(), "Controller file renamed");
        Ok(relative_to)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn create_dir(&self, path: &Path) -> ProjgenResult<()> {
        self.filesystem
            .create_dir(path)
            .map_err(|e| {
                ApplicationError::DirectoryCreation {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
                .into()
            })
    }

    /// Run all four steps against `work_root`, recording into `skeleton`.
    fn run(
        &self,
        source_root: &Path,
        work_root: &Path,
        identifiers: &DerivedIdentifiers,
        bindings: &TokenBindings,
        skeleton: &mut ProjectSkeleton,
    ) -> ProjgenResult<()> {
        let mut stage = MaterializationStage::NotStarted;
        let result = self.run_steps(
            source_root,
            work_root,
            identifiers,
            bindings,
            skeleton,
            &mut stage,
        );

        if let Err(e) = &result {
            warn!(stage = %stage, error = %e, "Materialization halted");
        }
        result
    }

    fn run_steps(
        &self,
        source_root: &Path,
        work_root: &Path,
        identifiers: &DerivedIdentifiers,
        bindings: &TokenBindings,
        skeleton: &mut ProjectSkeleton,
        stage: &mut MaterializationStage,
    ) -> ProjgenResult<()> {
        skeleton.directories = self.create_directory_structure(work_root)?;
        advance(stage);

        skeleton.copied = self.copy_template_files(source_root, work_root)?;
        advance(stage);

        skeleton.rewritten = self.substitute_tokens(work_root, bindings)?;
        advance(stage);

        skeleton.controller = Some(self.rename_controller_file(work_root, identifiers.controller())?);
        advance(stage);

        advance(stage);
        Ok(())
    }

    fn run_staged(
        &self,
        source_root: &Path,
        destination_root: &Path,
        identifiers: &DerivedIdentifiers,
        bindings: &TokenBindings,
        skeleton: &mut ProjectSkeleton,
    ) -> ProjgenResult<()> {
        if self.filesystem.exists(destination_root) {
            return Err(ApplicationError::DirectoryCreation {
                path: destination_root.to_path_buf(),
                reason: "directory already exists".into(),
            }
            .into());
        }

        let staging = staging_path(destination_root)?;
        debug!(staging = %staging.display(), "Building in staging directory");

        if let Err(e) = self.run(source_root, &staging, identifiers, bindings, skeleton) {
            self.discard(&staging);
            return Err(e);
        }

        let publish_error = |reason: String| ApplicationError::Publish {
            staging: staging.clone(),
            destination: destination_root.to_path_buf(),
            reason,
        };

        // Renaming onto an empty directory succeeds on some platforms.
        if self.filesystem.exists(destination_root) {
            self.discard(&staging);
            return Err(publish_error("destination appeared while staging".into()).into());
        }

        if let Err(e) = self.filesystem.rename(&staging, destination_root) {
            self.discard(&staging);
            return Err(publish_error(e.to_string()).into());
        }

        info!(path = %destination_root.display(), "Project published");
        Ok(())
    }

    /// Best-effort removal of a staging directory.
    fn discard(&self, staging: &Path) {
        if !self.filesystem.exists(staging) {
            return;
        }
        if let Err(e) = self.filesystem.remove_dir_all(staging) {
            warn!(
                error = %e,
                path = %staging.display(),
                "Could not remove staging directory"
            );
        } else {
            info!(path = %staging.display(), "Staging directory removed");
        }
    }
}

fn advance(stage: &mut MaterializationStage) {
    *stage = stage.next();
    debug!(stage = %stage, "Stage reached");
}

fn rewrite_error(path: &Path, e: io::Error) -> ApplicationError {
    ApplicationError::FileRewrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

/// Hidden sibling of `destination`: `.<name>.staging-<uuid>`.
fn staging_path(destination: &Path) -> ProjgenResult<PathBuf> {
    let name = destination.file_name().ok_or_else(|| ApplicationError::DirectoryCreation {
        path: destination.to_path_buf(),
        reason: "destination has no final path component".into(),
    })?;

    Ok(destination.with_file_name(format!(
        ".{}.staging-{}",
        name.to_string_lossy(),
        Uuid::new_v4().simple()
    )))
}
