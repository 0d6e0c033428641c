use std::path::PathBuf;

use clap::{Parser, Subcommand};
use routegen_cli::commands::{generate, routes, types};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "routegen",
    version,
    about = "routegen: route registration code from a declaration dump"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the registration, dispatch and serialization artifacts
    Generate {
        /// Declaration dump (.json, .yaml or .yml)
        input: PathBuf,
        /// Write artifacts here instead of printing them
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Config file (defaults to ./routegen.yaml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List every route found in a declaration dump
    Routes {
        input: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the types reachable from route inputs and outputs
    Types {
        input: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// `RUST_LOG` wins; warnings only otherwise.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Generate {
            input,
            out_dir,
            config,
        } => generate::run(&input, out_dir.as_deref(), config.as_deref()),
        Commands::Routes { input, config } => routes::run(&input, config.as_deref()),
        Commands::Types { input, config } => types::run(&input, config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{}", colored::Colorize::red(format!("Error: {e}").as_str()));
        std::process::exit(1);
    }
}
