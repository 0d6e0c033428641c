use std::path::Path;

use colored::Colorize;
use routegen_core::scan::scan;
use routegen_core::{ClosureWalker, Diagnostic, GeneratorOptions, Program, TypeClosureSet};

use super::{load_inputs, print_diagnostics};

/// Reachable types of every route in `program`, plus scan warnings.
pub fn collect_types(program: &Program, options: &GeneratorOptions) -> (TypeClosureSet, Vec<Diagnostic>) {
    let conv = &options.conventions;
    let scanned = scan(program, conv);
    let walker = ClosureWalker::new(program, conv).include_inherited(options.include_inherited);

    let mut set = TypeClosureSet::new();
    for entry in scanned.groups.iter().flat_map(|g| g.entries.iter()) {
        walker.expand_route(entry, &mut set);
    }
    (set, scanned.diagnostics)
}

pub fn run(input: &Path, config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let (program, options) = load_inputs(input, config)?;
    let (set, diagnostics) = collect_types(&program, &options);
    print_diagnostics(&diagnostics);

    if set.is_empty() {
        println!("{}", "No serializable types reachable from routes.".dimmed());
        return Ok(());
    }

    println!("{}", "Serializable types:".bold());
    println!();
    for name in set.names() {
        println!("  {}", name.cyan());
    }
    println!();
    println!("  {} types total", set.len());

    Ok(())
}
