use std::path::Path;

use colored::Colorize;
use routegen_core::{DiagnosticKind, Generation};

use super::load_inputs;

/// Run one generation pass. `out_dir` overrides the configured output directory.
pub fn execute(
    input: &Path,
    out_dir: Option<&Path>,
    config: Option<&Path>,
) -> Result<Generation, Box<dyn std::error::Error>> {
    let (program, mut options) = load_inputs(input, config)?;
    if let Some(dir) = out_dir {
        options.output_dir = Some(dir.to_path_buf());
    }
    Ok(routegen_core::generate(&program, &options))
}

pub fn run(
    input: &Path,
    out_dir: Option<&Path>,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Diagnostics are already logged by the pipeline.
    let generation = execute(input, out_dir, config)?;

    if generation.artifacts.is_empty() {
        println!("{}", "No route groups found.".dimmed());
        return Ok(());
    }

    let failed = generation
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::PersistFailed)
        .count();
    if failed > 0 {
        return Err(format!("{failed} artifact file(s) could not be written or removed").into());
    }

    if generation.written.is_empty() {
        for artifact in &generation.artifacts {
            println!("// {}", artifact.file_name());
            print!("{}", artifact.content);
            println!();
        }
        return Ok(());
    }

    for path in &generation.written {
        println!(
            "{} Generated {}",
            "✓".green(),
            path.display().to_string().cyan()
        );
    }
    println!(
        "  {} groups, {} routes, {} serializable types",
        generation.groups.len(),
        generation.route_count(),
        generation.closure.len()
    );

    Ok(())
}
