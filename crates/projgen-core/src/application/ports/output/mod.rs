//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `projgen-adapters` crate provides implementations.

use std::io;
use std::path::Path;

use crate::error::ProjgenResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `projgen_adapters::filesystem::LocalFilesystem` (production)
/// - `projgen_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Methods return `io::Result` so the materializer can attach the step and
///   the paths involved when it turns a failure into an `ApplicationError`
/// - `create_dir` is not recursive and fails when the path exists; the
///   materializer relies on that for its mutual-exclusion gate
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create a single directory. Fails if it already exists.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Copy a file's bytes, creating or truncating the destination.
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Read a file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write text to a file, replacing its content.
    fn write_file(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Rename a file or directory.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Port for creating the backing database of a new project.
///
/// Implemented by:
/// - `projgen_adapters::provisioning::SqliteGateway`
/// - `projgen_adapters::provisioning::MysqlClientGateway`
/// - `projgen_adapters::provisioning::NoopGateway`
///
/// The name is passed through verbatim. Gateways own their connection
/// details and credentials.
pub trait ProvisioningGateway: Send + Sync {
    /// Short backend name for logs and reports.
    fn backend(&self) -> &'static str;

    /// Create a database called `name`.
    fn create_database(&self, name: &str) -> ProjgenResult<()>;
}

#[cfg(test)]
mockall::mock! {
    pub Filesystem {}

    impl Filesystem for Filesystem {
        fn exists(&self, path: &Path) -> bool;
        fn create_dir(&self, path: &Path) -> io::Result<()>;
        fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()>;
        fn read_to_string(&self, path: &Path) -> io::Result<String>;
        fn write_file(&self, path: &Path, content: &str) -> io::Result<()>;
        fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
        fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
    }
}

#[cfg(test)]
mockall::mock! {
    pub ProvisioningGateway {}

    impl ProvisioningGateway for ProvisioningGateway {
        fn backend(&self) -> &'static str;
        fn create_database(&self, name: &str) -> ProjgenResult<()>;
    }
}
