//! Application layer for projgen.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ProjectMaterializer, GenerationService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! naming or substitution rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    GenerationOutcome, GenerationRequest, GenerationService, MaterializationStage,
    ProjectMaterializer,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, ProvisioningGateway};

pub use error::ApplicationError;
