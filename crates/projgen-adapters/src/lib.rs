//! Infrastructure adapters for projgen.
//!
//! This crate implements the ports defined in `projgen_core::application::ports`
//! and holds everything that touches the disk, a database, or a child process.

pub mod builtin_templates;
pub mod filesystem;
pub mod provisioning;
pub mod template_root;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use provisioning::{
    Backend, MysqlClientGateway, NoopGateway, ProvisioningSettings, SqliteGateway, gateway_for,
};
