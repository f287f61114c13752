// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for projgen.
//!
//! This module contains pure logic with no I/O. Everything that touches the
//! filesystem or a database goes through the ports defined in the
//! application layer.
//!
//! ## Contents
//!
//! - **naming**: raw application name → controller / machine / instance identifiers
//! - **manifest**: the fixed list of template files
//! - **substitution**: literal placeholder replacement
//! - **skeleton**: the directory layout and the record of a materialized project
//! - **validation**: identifier checks run before anything is written
//!
// Public API - what the world sees
pub mod error;
pub mod manifest;
pub mod naming;
pub mod skeleton;
pub mod substitution;
pub mod validation;

// Re-exports for convenience
pub use error::{DomainError, ErrorCategory};
pub use manifest::{STANDARD_ENTRIES, TemplateFileEntry, TemplateManifest, TemplateManifestBuilder};
pub use naming::{
    ApplicationName, DerivedIdentifiers, to_controller_identifier, to_instance_identifier,
    to_machine_identifier, tokenize,
};
pub use skeleton::{
    CONTROLLER_DIRECTORY, CONTROLLER_STEM, ProjectSkeleton, RewrittenFile, SKELETON_DIRECTORIES,
};
pub use substitution::{DEFAULT_INSTANCE_SIGIL, Placeholder, Substituted, TokenBindings};
pub use validation::{DomainValidator, ValidationMode};
