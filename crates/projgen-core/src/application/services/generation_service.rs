//! Generation Service - the end-to-end use case behind the wizard.
//!
//! This service coordinates one project generation:
//! 1. Validate the (possibly user-edited) identifiers
//! 2. Materialize the project tree under the projects root
//! 3. Provision the database through the gateway
//!
//! Provisioning lives here rather than in the materializer so the filesystem
//! and database sides stay independent.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    application::{ports::ProvisioningGateway, services::ProjectMaterializer},
    domain::{
        ApplicationName, DerivedIdentifiers, DomainValidator as validator, ProjectSkeleton,
        ValidationMode,
    },
    error::ProjgenResult,
};

/// Everything needed to generate one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub identifiers: DerivedIdentifiers,
    pub template_root: PathBuf,
    pub projects_root: PathBuf,
    pub validation: ValidationMode,
    /// Create the database after the tree is in place.
    pub provision: bool,
}

impl GenerationRequest {
    pub fn new(
        identifiers: DerivedIdentifiers,
        template_root: impl Into<PathBuf>,
        projects_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            identifiers,
            template_root: template_root.into(),
            projects_root: projects_root.into(),
            validation: ValidationMode::default(),
            provision: true,
        }
    }

    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_provisioning(mut self, provision: bool) -> Self {
        self.provision = provision;
        self
    }

    /// `<projects_root>/<folder>`.
    pub fn destination(&self) -> PathBuf {
        self.projects_root.join(self.identifiers.folder())
    }
}

/// Result of a successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub skeleton: ProjectSkeleton,
    /// The database that was created, if provisioning ran.
    pub database: Option<String>,
    pub backend: &'static str,
}

/// Runs the generation workflow.
pub struct GenerationService {
    materializer: ProjectMaterializer,
    gateway: Box<dyn ProvisioningGateway>,
}

impl GenerationService {
    pub fn new(materializer: ProjectMaterializer, gateway: Box<dyn ProvisioningGateway>) -> Self {
        Self {
            materializer,
            gateway,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.gateway.backend()
    }

    /// Derive the default identifiers for a raw application name.
    ///
    /// Blank names are rejected here, before anything touches the disk.
    pub fn derive(&self, raw_name: &str) -> ProjgenResult<DerivedIdentifiers> {
        let name = ApplicationName::parse(raw_name)?;
        Ok(name.derive())
    }

    /// Validate, materialize and provision.
    #[instrument(
        skip_all,
        fields(
            folder = %request.identifiers.folder(),
            database = %request.identifiers.database(),
            backend = self.gateway.backend()
        )
    )]
    pub fn generate(&self, request: &GenerationRequest) -> ProjgenResult<GenerationOutcome> {
        validator::validate_identifiers(&request.identifiers, request.validation)?;

        let destination = request.destination();
        let skeleton = self.materializer.materialize(
            &request.template_root,
            &destination,
            &request.identifiers,
        )?;

        let database = if request.provision {
            self.provision(request.identifiers.database())?;
            Some(request.identifiers.database().to_string())
        } else {
            info!("Database provisioning skipped");
            None
        };

        Ok(GenerationOutcome {
            skeleton,
            database,
            backend: self.gateway.backend(),
        })
    }

    /// Create the database. The name is passed through verbatim.
    pub fn provision(&self, database: &str) -> ProjgenResult<()> {
        self.gateway.create_database(database)?;
        info!(database, backend = self.gateway.backend(), "Database created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::application::{
        ApplicationError,
        ports::{MockFilesystem, MockProvisioningGateway},
    };
    use crate::domain::DomainError;
    use crate::error::ProjgenError;

    fn accepting_fs() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|p| p.ends_with("lib/App/Controller.php"));
        fs.expect_create_dir().returning(|_| Ok(()));
        fs.expect_copy_file().returning(|_, _| Ok(()));
        fs.expect_read_to_string().returning(|_| Ok(String::new()));
        fs.expect_write_file().returning(|_, _| Ok(()));
        fs.expect_rename().returning(|_, _| Ok(()));
        fs
    }

    fn gateway() -> MockProvisioningGateway {
        let mut gateway = MockProvisioningGateway::new();
        gateway.expect_backend().return_const("mock");
        gateway
    }

    fn service(fs: MockFilesystem, gateway: MockProvisioningGateway) -> GenerationService {
        let materializer = ProjectMaterializer::new(Box::new(fs)).staged(false);
        GenerationService::new(materializer, Box::new(gateway))
    }

    fn request(name: &str) -> GenerationRequest {
        GenerationRequest::new(DerivedIdentifiers::from_name(name).unwrap(), "tpl", "out")
    }

    #[test]
    fn derive_rejects_blank_names() {
        let svc = service(MockFilesystem::new(), MockProvisioningGateway::new());

        for raw in ["", "   "] {
            let err = svc.derive(raw).unwrap_err();
            assert!(matches!(err, ProjgenError::Domain(DomainError::InvalidName { .. })));
        }
    }

    #[test]
    fn derive_produces_defaults() {
        let svc = service(MockFilesystem::new(), MockProvisioningGateway::new());
        let ids = svc.derive("My Shop").unwrap();

        assert_eq!(ids.controller(), "MyShop");
        assert_eq!(ids.folder(), "my_shop");
        assert_eq!(ids.database(), "my_shop");
        assert_eq!(ids.instance(), "myShop");
    }

    #[test]
    fn destination_uses_folder_not_database() {
        let mut req = request("My Shop");
        req.identifiers = req.identifiers.with_database("shop_db");
        assert_eq!(req.destination(), Path::new("out/my_shop"));
    }

    #[test]
    fn generate_provisions_after_materializing() {
        let mut gw = gateway();
        gw.expect_create_database()
            .withf(|name| name == "my_shop")
            .times(1)
            .returning(|_| Ok(()));

        let outcome = service(accepting_fs(), gw).generate(&request("My Shop")).unwrap();

        assert_eq!(outcome.database.as_deref(), Some("my_shop"));
        assert_eq!(outcome.backend, "mock");
        assert_eq!(outcome.skeleton.root(), Path::new("out/my_shop"));
    }

    #[test]
    fn provisioning_can_be_skipped() {
        let mut gw = gateway();
        gw.expect_create_database().never();

        let outcome = service(accepting_fs(), gw)
            .generate(&request("blog").with_provisioning(false))
            .unwrap();

        assert!(outcome.database.is_none());
    }

    #[test]
    fn materialization_failure_skips_provisioning() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        let mut gw = gateway();
        gw.expect_create_database().never();

        let err = service(fs, gw).generate(&request("blog")).unwrap_err();

        assert!(matches!(
            err,
            ProjgenError::Application(ApplicationError::DirectoryCreation { .. })
        ));
    }

    #[test]
    fn provisioning_failure_is_surfaced() {
        let mut gw = gateway();
        gw.expect_create_database().returning(|name| {
            Err(ApplicationError::Provisioning {
                database: name.to_string(),
                reason: "access denied".into(),
            }
            .into())
        });

        let err = service(accepting_fs(), gw).generate(&request("blog")).unwrap_err();

        assert!(err.is_retryable());
        assert!(err.to_string().contains("blog"));
    }

    #[test]
    fn strict_mode_rejects_before_touching_disk() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().never();
        fs.expect_create_dir().never();
        let mut gw = gateway();
        gw.expect_create_database().never();

        let mut req = request("Café Bar").with_validation(ValidationMode::Strict);
        req.identifiers = req.identifiers.with_database("café-bar");

        let err = service(fs, gw).generate(&req).unwrap_err();
        assert!(matches!(err, ProjgenError::Domain(_)));
    }

    #[test]
    fn unsafe_folder_is_always_rejected() {
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir().never();

        let mut req = request("blog");
        req.identifiers = req.identifiers.with_folder("../escape");

        let err = service(fs, gateway()).generate(&req).unwrap_err();
        assert!(matches!(err, ProjgenError::Domain(_)));
    }
}
