use std::path::Path;

use colored::Colorize;
use routegen_core::emit::dispatch::route_path;
use routegen_core::scan::scan;
use routegen_core::RouteGroup;

use super::{load_inputs, print_diagnostics};

/// One line of the route listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRow {
    /// Verbs joined with `|`, e.g. `POST|PUT`.
    pub verbs: String,
    pub path: String,
    /// `Group::handler`, using the group's short name.
    pub handler: String,
}

/// Flatten groups into rows sorted by path, then verbs.
pub fn collect_routes(groups: &[RouteGroup]) -> Vec<RouteRow> {
    let mut rows: Vec<RouteRow> = groups
        .iter()
        .flat_map(|group| {
            group.entries.iter().map(move |entry| RouteRow {
                verbs: entry
                    .verbs
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join("|"),
                path: route_path(group, entry),
                handler: format!("{}::{}", group.short_name(), entry.handler),
            })
        })
        .collect();
    rows.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.verbs.cmp(&b.verbs)));
    rows
}

pub fn run(input: &Path, config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let (program, options) = load_inputs(input, config)?;
    let scanned = scan(&program, &options.conventions);
    print_diagnostics(&scanned.diagnostics);

    let rows = collect_routes(&scanned.groups);
    if rows.is_empty() {
        println!("{}", "No routes found.".dimmed());
        return Ok(());
    }

    println!("{}", "Declared routes:".bold());
    println!();
    println!(
        "  {:<12} {:<40} {}",
        "METHOD".dimmed(),
        "PATH".dimmed(),
        "HANDLER".dimmed()
    );
    println!("  {}", "-".repeat(80).dimmed());

    for row in &rows {
        let verbs_colored = match row.verbs.as_str() {
            "GET" => row.verbs.green(),
            "POST" => row.verbs.blue(),
            "PUT" => row.verbs.yellow(),
            "DELETE" => row.verbs.red(),
            "PATCH" => row.verbs.magenta(),
            _ => row.verbs.normal(),
        };
        println!("  {:<12} {:<40} {}", verbs_colored, row.path, row.handler);
    }

    println!();
    println!(
        "  {} routes in {} groups",
        rows.len(),
        scanned.groups.len()
    );

    Ok(())
}
