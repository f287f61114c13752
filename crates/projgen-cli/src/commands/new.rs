//! Implementation of the `projgen new` command.
//!
//! The wizard runs in three steps: collect the raw name, let the user edit
//! the derived identifiers, then confirm and generate. Flags pre-fill or
//! skip each step. No naming or materialization logic lives here.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use projgen_adapters::{
    Backend, LocalFilesystem, ProvisioningSettings, gateway_for, template_root,
};
use projgen_core::prelude::*;
use projgen_core::domain::DomainValidator;

use crate::{
    cli::{GlobalArgs, NewArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Label column width for the plan and report.
const LABEL_WIDTH: usize = 12;

/// Execute the `projgen new` command.
///
/// 1. Resolve the raw name (argument or prompt)
/// 2. Derive identifiers, apply flag overrides, optionally edit them
/// 3. Validate and check the destination before anything is written
/// 4. Show the plan; stop here on `--dry-run`
/// 5. Confirm unless `--yes`
/// 6. Materialize and provision through `GenerationService`
#[instrument(skip_all, fields(name = args.name.as_deref().unwrap_or("<prompt>")))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let interactive = wants_prompts(&args, &global, &output);

    // 1. Raw name
    let raw_name = match &args.name {
        Some(name) => name.clone(),
        None if interactive => prompt::name()?,
        None => {
            return Err(CliError::InvalidInput {
                message: "an application name is required when prompts are disabled".into(),
                source: None,
            });
        }
    };

    // 2. Identifiers
    let derived = DerivedIdentifiers::from_name(&raw_name).map_err(ProjgenError::from)?;
    debug!(?derived, "Identifiers derived");

    let mut identifiers = apply_overrides(derived, &args);
    if interactive {
        identifiers = prompt::edit(identifiers)?;
    }

    // 3. Validate + destination
    let settings = provisioning_settings(&args, &config)?;
    let validation = validation_mode(&args, &config);
    DomainValidator::validate_identifiers(&identifiers, validation).map_err(ProjgenError::from)?;

    let request = GenerationRequest::new(
        identifiers,
        resolve_template_root(&args, &config)?,
        args.output
            .clone()
            .unwrap_or_else(|| config.paths.projects_root.clone()),
    )
    .with_validation(validation)
    .with_provisioning(!args.no_database && settings.backend != Backend::None);

    let destination = request.destination();
    if destination.exists() {
        return Err(CliError::ProjectExists { path: destination });
    }

    let staged = config.materialize.staged && !args.no_staging;
    let plan = Plan {
        dry_run: args.dry_run,
        destination: &destination,
        template_root: &request.template_root,
        identifiers: &request.identifiers,
        instance: bound_instance(&request.identifiers, &config.naming.instance_sigil),
        backend: if request.provision {
            settings.backend.as_str()
        } else {
            Backend::None.as_str()
        },
        validation: match validation {
            ValidationMode::Strict => "strict",
            ValidationMode::Permissive => "permissive",
        },
        staged,
    };

    // 4. Plan
    if args.dry_run {
        if output.is_json() {
            output.json(&plan)?;
        } else {
            show_plan(&plan, &output)?;
            output.info("Dry run: nothing was written")?;
        }
        return Ok(());
    }

    // 5. Confirm
    if interactive {
        show_plan(&plan, &output)?;
        if !prompt::confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    // 6. Generate
    let materializer = ProjectMaterializer::new(Box::new(LocalFilesystem::new()))
        .with_instance_sigil(config.naming.instance_sigil.clone())
        .staged(staged);
    let service = GenerationService::new(materializer, gateway_for(&settings));

    info!(
        destination = %destination.display(),
        backend = service.backend(),
        staged,
        "Generation started"
    );

    let outcome = service.generate(&request)?;

    if output.is_json() {
        output.json(&outcome)?;
    } else {
        report(&outcome, &raw_name, &output)?;
    }

    Ok(())
}

// ── Input resolution ──────────────────────────────────────────────────────────

/// Prompts need the feature, a terminal on stdin, and a human reader.
fn wants_prompts(args: &NewArgs, global: &GlobalArgs, output: &OutputManager) -> bool {
    cfg!(feature = "interactive")
        && !args.yes
        && !global.quiet
        && !output.is_json()
        && std::io::stdin().is_terminal()
}

/// Replace derived identifiers with the ones given as flags.
fn apply_overrides(ids: DerivedIdentifiers, args: &NewArgs) -> DerivedIdentifiers {
    let mut ids = ids;
    if let Some(controller) = &args.controller {
        ids = ids.with_controller(controller.as_str());
    }
    if let Some(folder) = &args.folder {
        ids = ids.with_folder(folder.as_str());
    }
    if let Some(database) = &args.database {
        ids = ids.with_database(database.as_str());
    }
    if let Some(instance) = &args.instance {
        ids = ids.with_instance(instance.as_str());
    }
    ids
}

fn validation_mode(args: &NewArgs, config: &AppConfig) -> ValidationMode {
    if args.strict || config.naming.strict {
        ValidationMode::Strict
    } else {
        ValidationMode::Permissive
    }
}

fn provisioning_settings(args: &NewArgs, config: &AppConfig) -> CliResult<ProvisioningSettings> {
    let mut settings = config.provisioning_settings().map_err(CliError::config)?;
    if let Some(backend) = args.backend {
        settings.backend = backend.into();
    }
    Ok(settings)
}

/// An explicit `--templates` is used as given so a missing file surfaces as
/// a copy error naming it. Otherwise the first complete candidate wins.
fn resolve_template_root(args: &NewArgs, config: &AppConfig) -> CliResult<PathBuf> {
    if let Some(root) = &args.templates {
        return Ok(root.clone());
    }

    let configured = config.paths.template_root.as_deref();
    template_root::resolve(configured, &TemplateManifest::standard()).ok_or_else(|| {
        CliError::TemplatesNotFound {
            searched: template_root::candidate_roots(configured),
        }
    })
}

// ── Presentation ──────────────────────────────────────────────────────────────

fn bound_instance(ids: &DerivedIdentifiers, sigil: &str) -> String {
    TokenBindings::new(ids, sigil)
        .value(Placeholder::InstanceName)
        .to_string()
}

/// What `new` is about to do. Serialized for `--dry-run --output-format json`.
#[derive(Debug, Serialize)]
struct Plan<'a> {
    dry_run: bool,
    destination: &'a Path,
    template_root: &'a Path,
    identifiers: &'a DerivedIdentifiers,
    /// Instance name as it will appear in the files, sigil included.
    instance: String,
    backend: &'static str,
    validation: &'static str,
    staged: bool,
}

fn show_plan(plan: &Plan<'_>, output: &OutputManager) -> CliResult<()> {
    let ids = plan.identifiers;
    output.header("Project plan")?;
    output.field("controller", ids.controller(), LABEL_WIDTH)?;
    output.field("folder", ids.folder(), LABEL_WIDTH)?;
    output.field("database", ids.database(), LABEL_WIDTH)?;
    output.field("instance", &plan.instance, LABEL_WIDTH)?;
    output.field("destination", &plan.destination.display().to_string(), LABEL_WIDTH)?;
    output.field("templates", &plan.template_root.display().to_string(), LABEL_WIDTH)?;
    output.field("backend", plan.backend, LABEL_WIDTH)?;
    output.field("validation", plan.validation, LABEL_WIDTH)?;
    Ok(())
}

fn report(outcome: &GenerationOutcome, name: &str, output: &OutputManager) -> CliResult<()> {
    let skeleton = &outcome.skeleton;

    output.success(&format!(
        "Project '{}' created at {}",
        name.trim(),
        skeleton.root().display()
    ))?;
    output.field(
        "directories",
        &skeleton.directories().len().to_string(),
        LABEL_WIDTH,
    )?;
    output.field("files", &skeleton.copied_files().len().to_string(), LABEL_WIDTH)?;
    output.field(
        "rewritten",
        &format!(
            "{} ({} replacements)",
            skeleton.rewritten_files().len(),
            skeleton.total_replacements()
        ),
        LABEL_WIDTH,
    )?;
    if let Some(controller) = skeleton.controller() {
        output.field("controller", &controller.display().to_string(), LABEL_WIDTH)?;
    }

    match &outcome.database {
        Some(database) => output.field(
            "database",
            &format!("{database} ({})", outcome.backend),
            LABEL_WIDTH,
        )?,
        None => output.field("database", "not provisioned", LABEL_WIDTH)?,
    }

    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", skeleton.root().display()))?;
    output.print("  php -S localhost:8000 index.php")?;

    Ok(())
}

// ── Prompts ───────────────────────────────────────────────────────────────────

#[cfg(feature = "interactive")]
mod prompt {
    use dialoguer::{Confirm, Input, theme::ColorfulTheme};
    use projgen_core::domain::DerivedIdentifiers;

    use crate::error::{CliError, CliResult};

    fn prompt_error(e: dialoguer::Error) -> CliError {
        CliError::IoError {
            message: "prompt failed".into(),
            source: std::io::Error::other(e),
        }
    }

    pub fn name() -> CliResult<String> {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("Application name")
            .validate_with(|input: &String| {
                if input.trim().is_empty() {
                    Err("the name needs at least one word")
                } else {
                    Ok(())
                }
            })
            .interact_text()
            .map_err(prompt_error)
    }

    fn field(label: &str, current: &str) -> CliResult<String> {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(label)
            .default(current.to_string())
            .interact_text()
            .map_err(prompt_error)
    }

    /// Pre-populated, editable identifiers.
    pub fn edit(ids: DerivedIdentifiers) -> CliResult<DerivedIdentifiers> {
        Ok(DerivedIdentifiers::new(
            field("Controller", ids.controller())?,
            field("Folder", ids.folder())?,
            field("Database", ids.database())?,
            field("Instance", ids.instance())?,
        ))
    }

    pub fn confirm() -> CliResult<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Create this project?")
            .default(true)
            .interact()
            .map_err(prompt_error)
    }
}

#[cfg(not(feature = "interactive"))]
mod prompt {
    use projgen_core::domain::DerivedIdentifiers;

    use crate::error::{CliError, CliResult};

    const FEATURE: &str = "interactive";

    pub fn name() -> CliResult<String> {
        Err(CliError::FeatureNotAvailable { feature: FEATURE })
    }

    pub fn edit(_ids: DerivedIdentifiers) -> CliResult<DerivedIdentifiers> {
        Err(CliError::FeatureNotAvailable { feature: FEATURE })
    }

    pub fn confirm() -> CliResult<bool> {
        Err(CliError::FeatureNotAvailable { feature: FEATURE })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{BackendArg, OutputFormat};

    fn args(name: &str) -> NewArgs {
        NewArgs {
            name: Some(name.into()),
            controller: None,
            folder: None,
            database: None,
            instance: None,
            templates: None,
            output: None,
            backend: None,
            no_database: false,
            strict: false,
            no_staging: false,
            yes: true,
            dry_run: false,
        }
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut a = args("My Shop");
        a.controller = Some("ShopController".into());
        a.database = Some("shop_db".into());

        let ids = apply_overrides(DerivedIdentifiers::from_name("My Shop").unwrap(), &a);

        assert_eq!(ids.controller(), "ShopController");
        assert_eq!(ids.folder(), "my_shop");
        assert_eq!(ids.database(), "shop_db");
        assert_eq!(ids.instance(), "myShop");
    }

    #[test]
    fn strict_comes_from_flag_or_config() {
        let mut config = AppConfig::default();
        assert_eq!(validation_mode(&args("x"), &config), ValidationMode::Permissive);

        let mut strict = args("x");
        strict.strict = true;
        assert_eq!(validation_mode(&strict, &config), ValidationMode::Strict);

        config.naming.strict = true;
        assert_eq!(validation_mode(&args("x"), &config), ValidationMode::Strict);
    }

    #[test]
    fn backend_flag_beats_config() {
        let mut config = AppConfig::default();
        config.database.backend = "mysql".into();
        let mut a = args("x");
        a.backend = Some(BackendArg::Sqlite);

        assert_eq!(provisioning_settings(&a, &config).unwrap().backend, Backend::Sqlite);
        assert_eq!(
            provisioning_settings(&args("x"), &config).unwrap().backend,
            Backend::Mysql
        );
    }

    #[test]
    fn bad_backend_in_config_is_a_config_error() {
        let mut config = AppConfig::default();
        config.database.backend = "oracle".into();

        let err = provisioning_settings(&args("x"), &config).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn missing_name_without_prompts_is_an_input_error() {
        let mut a = args("x");
        a.name = None;
        let global = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: true,
            config: None,
            output_format: OutputFormat::Plain,
        };
        let config = AppConfig::default();
        let output = OutputManager::new(&global, &config);

        let err = execute(a, global, config, output).unwrap_err();

        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("when prompts are disabled"));
    }

    #[test]
    fn plan_shows_instance_with_a_single_sigil() {
        let ids = DerivedIdentifiers::from_name("My Shop").unwrap();
        assert_eq!(bound_instance(&ids, "$"), "$myShop");
        assert_eq!(bound_instance(&ids.with_instance("$shop"), "$"), "$shop");
    }

    #[test]
    fn explicit_template_root_is_used_verbatim() {
        let mut a = args("x");
        a.templates = Some(PathBuf::from("/nowhere/templates"));

        let root = resolve_template_root(&a, &AppConfig::default()).unwrap();
        assert_eq!(root, PathBuf::from("/nowhere/templates"));
    }
}
