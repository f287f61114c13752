//! `projgen derive`: show the identifiers a name produces.

use projgen_core::{domain::DerivedIdentifiers, error::ProjgenError};

use crate::{cli::DeriveArgs, error::CliResult, output::OutputManager};

pub fn execute(args: DeriveArgs, output: OutputManager) -> CliResult<()> {
    let ids = DerivedIdentifiers::from_name(&args.name).map_err(ProjgenError::from)?;

    if output.is_json() {
        output.json(&ids)?;
        return Ok(());
    }

    for (label, value) in [
        ("controller", ids.controller()),
        ("folder", ids.folder()),
        ("database", ids.database()),
        ("instance", ids.instance()),
    ] {
        output.field(label, value, 10)?;
    }

    Ok(())
}
