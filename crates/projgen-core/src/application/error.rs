//! Application layer errors.
//!
//! These errors represent failures while materializing or provisioning a
//! project. Naming and validation errors are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during orchestration.
///
/// Each materialization step has exactly one variant, so the variant alone
/// tells which step failed.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Step 1: the project root or one of its subdirectories.
    #[error("Could not create directory {path}: {reason}")]
    DirectoryCreation { path: PathBuf, reason: String },

    /// Step 2: copying a template file.
    #[error("Could not copy {source_path} to {destination}: {reason}")]
    FileCopy {
        source_path: PathBuf,
        destination: PathBuf,
        reason: String,
    },

    /// Step 3: reading or writing a file during token substitution.
    #[error("Could not rewrite {path}: {reason}")]
    FileRewrite { path: PathBuf, reason: String },

    /// Step 4: renaming the controller template.
    #[error("Could not rename {from} to {to}: {reason}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    /// Moving a fully built staging directory onto the destination.
    #[error("Could not publish {staging} as {destination}: {reason}")]
    Publish {
        staging: PathBuf,
        destination: PathBuf,
        reason: String,
    },

    /// The database could not be created.
    #[error("Could not create database '{database}': {reason}")]
    Provisioning { database: String, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DirectoryCreation { path, .. } => vec![
                format!("Failed to create: {}", path.display()),
                "Choose a folder name that does not exist yet".into(),
                "Check that you have write permissions in the projects root".into(),
            ],
            Self::FileCopy { source_path, .. } => vec![
                format!("Template file: {}", source_path.display()),
                "Check the template root (--templates or paths.template_root)".into(),
                "Try: projgen templates export <DIR> to write the built-in templates".into(),
            ],
            Self::FileRewrite { path, .. } => vec![
                format!("Failed to rewrite: {}", path.display()),
                "Substitutable templates must be UTF-8 text".into(),
            ],
            Self::Rename { to, .. } => vec![
                format!("Target: {}", to.display()),
                "Pick a controller name that does not collide with another template".into(),
            ],
            Self::Publish { staging, .. } => vec![
                format!("The staged project may remain at {}", staging.display()),
                "Remove it manually or move it into place".into(),
            ],
            Self::Provisioning { database, .. } => vec![
                format!("The project files exist; only database '{}' is missing", database),
                "Check the database section of your configuration".into(),
                "Re-run with --no-database and create the database manually".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DirectoryCreation { .. } => ErrorCategory::Validation,
            Self::FileCopy { .. } => ErrorCategory::NotFound,
            Self::FileRewrite { .. } | Self::Rename { .. } | Self::Publish { .. } => {
                ErrorCategory::Internal
            }
            Self::Provisioning { .. } => ErrorCategory::Configuration,
        }
    }
}
