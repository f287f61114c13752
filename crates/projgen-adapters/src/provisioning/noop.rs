use projgen_core::{application::ports::ProvisioningGateway, error::ProjgenResult};
use tracing::info;

/// Gateway for projects without a database. Always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGateway;

impl ProvisioningGateway for NoopGateway {
    fn backend(&self) -> &'static str {
        "none"
    }

    fn create_database(&self, name: &str) -> ProjgenResult<()> {
        info!(database = name, "No database backend configured, nothing to create");
        Ok(())
    }
}
