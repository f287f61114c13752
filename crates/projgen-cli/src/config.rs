//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied at the call-site, not here)
//! 2. Environment variables: `PROJGEN_<SECTION>__<KEY>`, e.g.
//!    `PROJGEN_DATABASE__BACKEND=sqlite`
//! 3. Config file: `--config FILE`, or the platform config file plus a
//!    `.projgen.toml` in the working directory
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use projgen_adapters::{Backend, ProvisioningSettings};
use projgen_core::domain::DEFAULT_INSTANCE_SIGIL;

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = ".projgen.toml";

const ENV_PREFIX: &str = "PROJGEN";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub naming: NamingConfig,
    pub materialize: MaterializeConfig,
    pub database: DatabaseConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Template directory. Discovered when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_root: Option<PathBuf>,
    /// Directory new project folders are created in.
    pub projects_root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            template_root: None,
            projects_root: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Prefix of the substituted instance name.
    pub instance_sigil: String,
    pub strict: bool,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            instance_sigil: DEFAULT_INSTANCE_SIGIL.to_string(),
            strict: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterializeConfig {
    /// Build next to the destination and rename into place.
    pub staged: bool,
}

impl Default for MaterializeConfig {
    fn default() -> Self {
        Self { staged: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `none`, `sqlite` or `mysql`.
    pub backend: String,
    pub sqlite_dir: PathBuf,
    pub host: String,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// MySQL client binary.
    pub client: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let defaults = ProvisioningSettings::default();
        Self {
            backend: defaults.backend.to_string(),
            sqlite_dir: defaults.sqlite_dir,
            host: defaults.host,
            user: defaults.user,
            password: defaults.password,
            client: defaults.client,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration on top of the built-in defaults.
    ///
    /// An explicit `config_file` must exist; the default locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path.as_path()).required(true)),
            None => builder
                .add_source(File::from(Self::config_path()).required(false))
                .add_source(File::from(Path::new(LOCAL_CONFIG_FILE)).required(false)),
        };

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("reading configuration sources")?;

        config
            .try_deserialize()
            .context("configuration does not match the expected schema")
    }

    /// Path to the global configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.projgen.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "projgen", "projgen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Settings for the provisioning gateway.
    pub fn provisioning_settings(&self) -> anyhow::Result<ProvisioningSettings> {
        let backend: Backend = self
            .database
            .backend
            .parse()
            .context("invalid database.backend")?;

        Ok(ProvisioningSettings {
            backend,
            sqlite_dir: self.database.sqlite_dir.clone(),
            host: self.database.host.clone(),
            user: self.database.user.clone(),
            password: self.database.password.clone(),
            client: self.database.client.clone(),
        })
    }

    /// Flattened `section.key = value` view, secrets masked. Unset optional
    /// keys are omitted.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        if let Ok(serde_json::Value::Object(sections)) = serde_json::to_value(self) {
            for (section, values) in sections {
                if let serde_json::Value::Object(values) = values {
                    for (key, value) in values {
                        let dotted = format!("{section}.{key}");
                        let shown = display_value(&dotted, &value);
                        entries.push((dotted, shown));
                    }
                }
            }
        }
        entries
    }

    /// Value of a dotted key such as `database.backend`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

fn display_value(key: &str, value: &serde_json::Value) -> String {
    match value {
        _ if key == "database.password" => "********".into(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_permissive_and_staged() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.naming.instance_sigil, "$");
        assert!(!cfg.naming.strict);
        assert!(cfg.materialize.staged);
        assert_eq!(cfg.database.backend, "none");
        assert_eq!(cfg.paths.projects_root, PathBuf::from("."));
    }

    #[test]
    fn file_values_override_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("projgen.toml");
        std::fs::write(
            &path,
            "[database]\nbackend = \"sqlite\"\n\n[naming]\nstrict = true\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(cfg.database.backend, "sqlite");
        assert!(cfg.naming.strict);
        // Untouched keys keep their defaults.
        assert_eq!(cfg.database.host, "localhost");
        assert!(cfg.materialize.staged);
    }

    #[test]
    fn explicit_file_must_exist() {
        let missing = PathBuf::from("/definitely/not/here/projgen.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn provisioning_settings_parse_backend() {
        let mut cfg = AppConfig::default();
        cfg.database.backend = "MySQL".into();
        assert_eq!(cfg.provisioning_settings().unwrap().backend, Backend::Mysql);

        cfg.database.backend = "oracle".into();
        assert!(cfg.provisioning_settings().is_err());
    }

    #[test]
    fn get_reads_dotted_keys_and_masks_password() {
        let mut cfg = AppConfig::default();
        assert_eq!(cfg.get("database.backend").as_deref(), Some("none"));
        assert_eq!(cfg.get("naming.strict").as_deref(), Some("false"));
        assert!(cfg.get("database.password").is_none());
        assert!(cfg.get("database.nope").is_none());

        cfg.database.password = Some("hunter2".into());
        assert_eq!(cfg.get("database.password").as_deref(), Some("********"));
    }

    #[test]
    fn default_config_serializes_to_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(text.contains("[materialize]"));
        assert!(text.contains("staged = true"));
        assert!(!text.contains("password"));
    }

    #[test]
    fn config_path_is_non_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
