//! Command implementations for the `routegen` CLI.
//!
//! Each submodule corresponds to a top-level CLI command.

use std::path::Path;

use colored::Colorize;
use routegen_core::{Diagnostic, GeneratorOptions, Program, RoutegenConfig};

/// Artifact generation: `routegen generate <dump>`.
///
/// Prints the artifacts, or writes them to `--out-dir` (or the configured
/// `routegen.output.dir`).
pub mod generate;

/// Route listing: `routegen routes <dump>`.
pub mod routes;

/// Reachable-type listing: `routegen types <dump>`.
pub mod types;

/// Load the declaration dump and the generator options for one command.
pub(crate) fn load_inputs(
    input: &Path,
    config: Option<&Path>,
) -> Result<(Program, GeneratorOptions), Box<dyn std::error::Error>> {
    let program = Program::load(input)?;
    tracing::debug!(
        input = %input.display(),
        declarations = program.types().len(),
        "Loaded declaration dump"
    );
    let config = RoutegenConfig::load(config)?;
    let options = GeneratorOptions::from_config(&config)?;
    Ok((program, options))
}

pub(crate) fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic.to_string().yellow());
    }
}
