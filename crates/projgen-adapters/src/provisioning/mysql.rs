//! MySQL backend driven through the `mysql` command-line client.

use std::process::Command;

use tracing::{debug, info};

use projgen_core::{
    application::{ApplicationError, ports::ProvisioningGateway},
    error::ProjgenResult,
};

/// Runs `CREATE DATABASE` with the configured client binary.
///
/// The password travels in `MYSQL_PWD` so it never shows up in the process
/// list.
#[derive(Clone)]
pub struct MysqlClientGateway {
    client: String,
    host: String,
    user: String,
    password: Option<String>,
}

impl std::fmt::Debug for MysqlClientGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MysqlClientGateway")
            .field("client", &self.client)
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl MysqlClientGateway {
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            client: "mysql".into(),
            host: host.into(),
            user: user.into(),
            password: None,
        }
    }

    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }

    /// The statement sent for `name`, quoted as an identifier.
    pub fn statement(name: &str) -> String {
        format!("CREATE DATABASE `{}`;", name.replace('`', "``"))
    }
}

impl ProvisioningGateway for MysqlClientGateway {
    fn backend(&self) -> &'static str {
        "mysql"
    }

    fn create_database(&self, name: &str) -> ProjgenResult<()> {
        let failed = |reason: String| ApplicationError::Provisioning {
            database: name.to_string(),
            reason,
        };

        let mut command = Command::new(&self.client);
        command
            .arg("--host")
            .arg(&self.host)
            .arg("--user")
            .arg(&self.user)
            .arg("--batch")
            .arg("--execute")
            .arg(Self::statement(name));
        if let Some(password) = &self.password {
            command.env("MYSQL_PWD", password);
        }

        debug!(client = %self.client, host = %self.host, "Running database client");
        let output = command
            .output()
            .map_err(|e| failed(format!("failed to run {}: {e}", self.client)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("{} exited with {}", self.client, output.status),
                msg => msg.to_string(),
            };
            return Err(failed(reason).into());
        }

        info!(database = name, host = %self.host, "MySQL database created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projgen_core::error::ProjgenError;

    #[test]
    fn statement_quotes_identifier() {
        assert_eq!(MysqlClientGateway::statement("my_shop"), "CREATE DATABASE `my_shop`;");
        assert_eq!(MysqlClientGateway::statement("a`b"), "CREATE DATABASE `a``b`;");
    }

    #[test]
    fn missing_client_is_a_provisioning_error() {
        let gateway = MysqlClientGateway::new("localhost", "root")
            .with_client("projgen-test-no-such-mysql-client");

        let err = gateway.create_database("blog").unwrap_err();

        assert!(matches!(
            err,
            ProjgenError::Application(ApplicationError::Provisioning { .. })
        ));
        assert!(err.to_string().contains("failed to run"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_client_is_reported() {
        let gateway = MysqlClientGateway::new("localhost", "root").with_client("false");
        let err = gateway.create_database("blog").unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }

    #[cfg(unix)]
    #[test]
    fn successful_client_is_accepted() {
        let gateway = MysqlClientGateway::new("localhost", "root").with_client("true");
        gateway.create_database("blog").unwrap();
    }

    #[test]
    fn debug_hides_password() {
        let gateway =
            MysqlClientGateway::new("db", "app").with_password(Some("hunter2".into()));
        let shown = format!("{gateway:?}");
        assert!(!shown.contains("hunter2"));
    }
}
