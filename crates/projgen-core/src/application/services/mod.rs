//! Application services - orchestrate use cases.
//!
//! The materializer owns the filesystem workflow; the generation service
//! adds validation and provisioning around it.

pub mod generation_service;
pub mod materializer;

pub use generation_service::{GenerationOutcome, GenerationRequest, GenerationService};
pub use materializer::{MaterializationStage, ProjectMaterializer};
