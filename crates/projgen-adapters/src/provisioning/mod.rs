//! Provisioning gateways: create the backing database of a new project.
//!
//! Each gateway owns its connection details. The core passes the database
//! name through verbatim and never retries.

mod mysql;
mod noop;
mod sqlite;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use projgen_core::{application::ports::ProvisioningGateway, error::ProjgenError};

pub use mysql::MysqlClientGateway;
pub use noop::NoopGateway;
pub use sqlite::SqliteGateway;

/// Which gateway to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    None,
    Sqlite,
    Mysql,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::None, Backend::Sqlite, Backend::Mysql];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Sqlite => "sqlite",
            Self::Mysql => "mysql",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ProjgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProjgenError::Configuration {
                message: format!("unknown database backend '{s}' (expected none, sqlite or mysql)"),
            })
    }
}

/// Connection settings for every backend. Only the selected backend's
/// fields are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningSettings {
    pub backend: Backend,
    pub sqlite_dir: PathBuf,
    pub host: String,
    pub user: String,
    pub password: Option<String>,
    pub client: String,
}

impl Default for ProvisioningSettings {
    fn default() -> Self {
        Self {
            backend: Backend::None,
            sqlite_dir: PathBuf::from("databases"),
            host: "localhost".into(),
            user: "root".into(),
            password: None,
            client: "mysql".into(),
        }
    }
}

/// Build the gateway selected by `settings.backend`.
pub fn gateway_for(settings: &ProvisioningSettings) -> Box<dyn ProvisioningGateway> {
    match settings.backend {
        Backend::None => Box::new(NoopGateway),
        Backend::Sqlite => Box::new(SqliteGateway::new(&settings.sqlite_dir)),
        Backend::Mysql => Box::new(
            MysqlClientGateway::new(&settings.host, &settings.user)
                .with_password(settings.password.clone())
                .with_client(&settings.client),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parses_case_insensitively() {
        assert_eq!("SQLite".parse::<Backend>().unwrap(), Backend::Sqlite);
        assert_eq!(" mysql ".parse::<Backend>().unwrap(), Backend::Mysql);
        assert_eq!("none".parse::<Backend>().unwrap(), Backend::None);
    }

    #[test]
    fn unknown_backend_is_a_configuration_error() {
        let err = "postgres".parse::<Backend>().unwrap_err();
        assert!(matches!(err, ProjgenError::Configuration { .. }));
        assert!(err.to_string().contains("postgres"));
    }

    #[test]
    fn gateway_matches_backend() {
        for backend in Backend::ALL {
            let settings = ProvisioningSettings {
                backend,
                ..ProvisioningSettings::default()
            };
            assert_eq!(gateway_for(&settings).backend(), backend.as_str());
        }
    }
}
