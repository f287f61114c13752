//! projgen core - hexagonal architecture for a PHP project generator.
//!
//! This crate provides the domain and application layers for projgen,
//! following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            projgen-cli (CLI)            │
//! │        (wizard, derive, templates)      │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (GenerationService, ProjectMaterializer)│
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │     (Filesystem, ProvisioningGateway)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     projgen-adapters (Infrastructure)   │
//! │  (LocalFilesystem, SqliteGateway, etc)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The domain layer (naming, manifest, substitution, validation) does no I/O.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use projgen_core::prelude::*;
//!
//! # fn run(fs: Box<dyn Filesystem>, gateway: Box<dyn ProvisioningGateway>) -> ProjgenResult<()> {
//! let service = GenerationService::new(ProjectMaterializer::new(fs), gateway);
//!
//! let ids = service.derive("My Shop")?;
//! let request = GenerationRequest::new(ids, "./templates", "./projects");
//! let outcome = service.generate(&request)?;
//! println!("created {}", outcome.skeleton.root().display());
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerationOutcome, GenerationRequest, GenerationService, MaterializationStage,
        ProjectMaterializer,
        ports::{Filesystem, ProvisioningGateway},
    };
    pub use crate::domain::{
        ApplicationName, DerivedIdentifiers, Placeholder, ProjectSkeleton, TemplateFileEntry,
        TemplateManifest, TokenBindings, ValidationMode,
    };
    pub use crate::error::{ProjgenError, ProjgenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
