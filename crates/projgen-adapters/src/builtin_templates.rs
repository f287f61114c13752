//! Built-in template set.
//!
//! The default PHP application stub ships inside the binary so `projgen`
//! works without an external template directory. [`export`] writes it to
//! disk in the layout the standard manifest expects; the materializer then
//! reads it like any other template root.
//!
//! Only entries marked substitutable carry placeholders. The others are
//! copied verbatim, so a placeholder in one of them would survive into the
//! generated project.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use projgen_core::{
    application::ApplicationError,
    domain::{STANDARD_ENTRIES, TemplateFileEntry},
    error::{ProjgenError, ProjgenResult},
};

/// One embedded template file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinTemplate {
    pub entry: TemplateFileEntry,
    pub content: &'static str,
}

const DB_PHP: &str = r#"<?php

return [
    'DB_HOST' => getenv('DB_HOST') ?: 'localhost',
    'DB_USER' => getenv('DB_USER') ?: 'root',
    'DB_PASS' => getenv('DB_PASS') ?: '',
    'DB_NAME' => '%DATABASENAME%',
    'DEFAULT_CONTROLLER' => 'App\%CONTROLLERNAME%',
];
"#;

const PATHS_PHP: &str = r#"<?php

return [
    'LOCAL_PATH' => dirname(__DIR__) . '/',
    'LIB_PATH' => dirname(__DIR__) . '/lib/',
    'TEMPLATE_PATH' => dirname(__DIR__) . '/templates/',
    'SQL_PATH' => dirname(__DIR__) . '/sql/',
];
"#;

const CONTROLLER_PHP: &str = r#"<?php

namespace App;

use Base\Controller as BaseController;

class %CONTROLLERNAME% extends BaseController {

    public function __construct() {
        parent::__construct();
    }

    protected function actionIndex() {
        $this->presenter->setTitle('%CONTROLLERNAME%');
    }
}
"#;

const BASE_SQL: &str = r#"-- Base schema. Upgrade scripts go in sql/upgrade/.

CREATE TABLE IF NOT EXISTS schema_version (
    version INT NOT NULL PRIMARY KEY,
    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

INSERT INTO schema_version (version) VALUES (1);
"#;

const BOOTSTRAP_PHP: &str = r#"<?php

spl_autoload_register(function ($class) {
    $file = __DIR__ . '/lib/' . str_replace('\\', '/', $class) . '.php';
    if (is_file($file)) {
        require $file;
    }
});

Environment::load(require __DIR__ . '/config/paths.php', require __DIR__ . '/config/db.php');
"#;

const INDEX_PHP: &str = r#"<?php

require __DIR__ . '/bootstrap.php';

%INSTANCENAME% = new App\%CONTROLLERNAME%();
%INSTANCENAME%->run();
"#;

const GITIGNORE: &str = "/vendor/\n/config/local.php\n*.log\n.env\n";

/// The embedded files, in manifest order.
pub const BUILTIN_TEMPLATES: [BuiltinTemplate; 7] = [
    BuiltinTemplate { entry: STANDARD_ENTRIES[0], content: DB_PHP },
    BuiltinTemplate { entry: STANDARD_ENTRIES[1], content: PATHS_PHP },
    BuiltinTemplate { entry: STANDARD_ENTRIES[2], content: CONTROLLER_PHP },
    BuiltinTemplate { entry: STANDARD_ENTRIES[3], content: BASE_SQL },
    BuiltinTemplate { entry: STANDARD_ENTRIES[4], content: BOOTSTRAP_PHP },
    BuiltinTemplate { entry: STANDARD_ENTRIES[5], content: INDEX_PHP },
    BuiltinTemplate { entry: STANDARD_ENTRIES[6], content: GITIGNORE },
];

/// Embedded content for a manifest entry, if one ships with projgen.
pub fn content_for(entry: &TemplateFileEntry) -> Option<&'static str> {
    BUILTIN_TEMPLATES
        .iter()
        .find(|t| t.entry == *entry)
        .map(|t| t.content)
}

/// Write the built-in templates under `dir`.
///
/// Without `overwrite`, any existing target makes the call fail before
/// anything is written. Returns the written paths.
#[instrument(skip_all, fields(dir = %dir.display(), overwrite = overwrite))]
pub fn export(dir: &Path, overwrite: bool) -> ProjgenResult<Vec<PathBuf>> {
    let targets: Vec<(PathBuf, &BuiltinTemplate)> = BUILTIN_TEMPLATES
        .iter()
        .map(|t| (dir.join(t.entry.relative_path()), t))
        .collect();

    if !overwrite {
        if let Some((path, _)) = targets.iter().find(|(path, _)| path.exists()) {
            return Err(ProjgenError::Configuration {
                message: format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ),
            });
        }
    }

    let mut written = Vec::with_capacity(targets.len());
    for (path, template) in targets {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| write_error(parent, e))?;
        }
        fs::write(&path, template.content).map_err(|e| write_error(&path, e))?;
        debug!(path = %path.display(), "Template written");
        written.push(path);
    }

    info!(count = written.len(), "Built-in templates exported");
    Ok(written)
}

fn write_error(path: &Path, e: std::io::Error) -> ProjgenError {
    ApplicationError::FileRewrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
    .into()
}
