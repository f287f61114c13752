//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use projgen_adapters::Backend;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "projgen",
    bin_name = "projgen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "PHP application stub generator",
    long_about = "projgen turns an application name into a ready-to-run PHP \
                  project: derived identifiers, a fixed directory layout, \
                  substituted templates and a backing database.",
    after_help = "EXAMPLES:\n\
        \x20 projgen new \"My Shop\"\n\
        \x20 projgen new blog --yes --database blog_db --backend sqlite\n\
        \x20 projgen derive \"Photo Album\" --output-format json\n\
        \x20 projgen templates export ./templates",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new project.
    #[command(
        visible_alias = "n",
        about = "Generate a new project",
        after_help = "EXAMPLES:\n\
            \x20 projgen new                         # prompts for everything\n\
            \x20 projgen new \"My Shop\" --yes\n\
            \x20 projgen new \"My Shop\" --controller ShopController --folder shop\n\
            \x20 projgen new blog --dry-run"
    )]
    New(NewArgs),

    /// Print the identifiers derived from a name.
    #[command(
        about = "Show derived identifiers",
        after_help = "EXAMPLES:\n\
            \x20 projgen derive \"My Shop\"\n\
            \x20 projgen derive \"My Shop\" --output-format json"
    )]
    Derive(DeriveArgs),

    /// Inspect or export the template set.
    #[command(
        about = "Template management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 projgen templates list\n\
            \x20 projgen templates list --root ./templates\n\
            \x20 projgen templates export ./templates"
    )]
    Templates(TemplateCommands),

    /// Initialise a projgen configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 projgen init           # default location\n\
            \x20 projgen init --global  # global config\n\
            \x20 projgen init --local   # .projgen.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 projgen completions bash > ~/.local/share/bash-completion/completions/projgen\n\
            \x20 projgen completions zsh  > ~/.zfunc/_projgen\n\
            \x20 projgen completions fish > ~/.config/fish/completions/projgen.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the projgen configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 projgen config get database.backend\n\
            \x20 projgen config list\n\
            \x20 projgen config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `projgen new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Free-text application name. Prompted for when omitted.
    #[arg(value_name = "NAME", help = "Application name, e.g. \"My Shop\"")]
    pub name: Option<String>,

    #[arg(
        long = "controller",
        value_name = "IDENT",
        help = "Override the controller class name"
    )]
    pub controller: Option<String>,

    #[arg(
        long = "folder",
        value_name = "DIR",
        help = "Override the project folder name"
    )]
    pub folder: Option<String>,

    #[arg(
        long = "database",
        value_name = "NAME",
        help = "Override the database name"
    )]
    pub database: Option<String>,

    #[arg(
        long = "instance",
        value_name = "IDENT",
        help = "Override the instance variable name (without sigil)"
    )]
    pub instance: Option<String>,

    /// Template root. Falls back to `paths.template_root`, then discovery.
    #[arg(
        short = 't',
        long = "templates",
        value_name = "DIR",
        help = "Template directory"
    )]
    pub templates: Option<PathBuf>,

    /// Directory the project folder is created in.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Parent directory for the project (default: paths.projects_root)"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long = "backend",
        value_name = "BACKEND",
        value_enum,
        help = "Database backend (default: database.backend)"
    )]
    pub backend: Option<BackendArg>,

    #[arg(long = "no-database", help = "Skip database provisioning")]
    pub no_database: bool,

    #[arg(long = "strict", help = "Enforce strict identifier rules")]
    pub strict: bool,

    /// Build in place instead of staging next to the destination.
    #[arg(long = "no-staging", help = "Write directly into the destination")]
    pub no_staging: bool,

    /// Skip every prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Accept derived identifiers and create immediately"
    )]
    pub yes: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

/// Database backend selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum BackendArg {
    None,
    Sqlite,
    Mysql,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::None => Backend::None,
            BackendArg::Sqlite => Backend::Sqlite,
            BackendArg::Mysql => Backend::Mysql,
        }
    }
}

// ── derive ────────────────────────────────────────────────────────────────────

/// Arguments for `projgen derive`.
#[derive(Debug, Args)]
pub struct DeriveArgs {
    #[arg(value_name = "NAME", help = "Application name to derive from")]
    pub name: String,
}

// ── templates ─────────────────────────────────────────────────────────────────

/// Subcommands for `projgen templates`.
#[derive(Debug, Subcommand)]
pub enum TemplateCommands {
    /// List the manifest, marking which files a template root provides.
    #[command(visible_alias = "ls")]
    List {
        #[arg(long = "root", value_name = "DIR", help = "Template root to inspect")]
        root: Option<PathBuf>,
    },
    /// Write the built-in templates to a directory.
    Export {
        #[arg(value_name = "DIR", help = "Destination directory")]
        dir: PathBuf,

        #[arg(short = 'f', long = "force", help = "Overwrite existing files")]
        force: bool,
    },
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `projgen init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to the global config location.
    #[arg(long = "global", help = "Create global configuration")]
    pub global: bool,

    /// Write to `.projgen.toml` in the current directory.
    #[arg(
        long = "local",
        conflicts_with = "global",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `projgen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `projgen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `database.backend`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
