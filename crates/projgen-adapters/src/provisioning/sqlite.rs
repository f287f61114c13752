//! SQLite backend: one database file per project.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use tracing::{debug, info, warn};

use projgen_core::{
    application::{ApplicationError, ports::ProvisioningGateway},
    error::ProjgenResult,
};

/// Creates `<directory>/<name>.sqlite`.
#[derive(Debug, Clone)]
pub struct SqliteGateway {
    directory: PathBuf,
}

impl SqliteGateway {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn database_path(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{name}.sqlite"))
    }

    fn initialise(path: &Path, name: &str) -> rusqlite::Result<()> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE projgen_meta (
                key   TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );",
        )?;
        conn.execute(
            "INSERT INTO projgen_meta (key, value) VALUES ('database', ?1)",
            params![name],
        )?;
        Ok(())
    }
}

impl ProvisioningGateway for SqliteGateway {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn create_database(&self, name: &str) -> ProjgenResult<()> {
        let failed = |reason: String| ApplicationError::Provisioning {
            database: name.to_string(),
            reason,
        };

        // The name becomes a file name here.
        if name.is_empty() || name.contains(['/', '\\', '\0']) || name == "." || name == ".." {
            return Err(failed("not usable as a file name".into()).into());
        }

        fs::create_dir_all(&self.directory)
            .map_err(|e| failed(format!("cannot create {}: {e}", self.directory.display())))?;

        let path = self.database_path(name);

        // create_new claims the path atomically; an empty file is a valid
        // empty SQLite database.
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => {
                    failed(format!("{} already exists", path.display()))
                }
                _ => failed(format!("cannot create {}: {e}", path.display())),
            })?;
        debug!(path = %path.display(), "Database file created");

        if let Err(e) = Self::initialise(&path, name) {
            if let Err(cleanup) = fs::remove_file(&path) {
                warn!(
                    error = %cleanup,
                    path = %path.display(),
                    "Could not remove partially initialised database"
                );
            }
            return Err(failed(e.to_string()).into());
        }

        info!(path = %path.display(), "SQLite database created");
        Ok(())
    }
}
