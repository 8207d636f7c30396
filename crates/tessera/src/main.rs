//! # tessera
//!
//! Tessera - structured lowering and patch diffing for server-driven UI.
//!
//! ## Name Origin
//!
//! A **tessera** (/ˈtɛs.ə.rə/) is a single tile of a mosaic. Tessera breaks a
//! UI tree into the same kind of pieces: static markup laid once, and
//! numbered dynamic tiles that are swapped one by one as the view changes.
//! This binary is the command-line gateway to the lowering, analysis and
//! diffing crates.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Structured lowering and patch diffing for server-driven UI", long_about = None)]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long, action = clap::ArgAction::Version)]
    version: (),

    /// Enable debug logging (overridden by TESSERA_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (default: ./tessera.config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lower a node tree into a structured render
    #[command(visible_alias = "atelier")]
    Lower(commands::lower::LowerArgs),

    /// Compute the patch between two renders or trees
    #[command(visible_alias = "retouch")]
    Diff(commands::diff::DiffArgs),

    /// Count the static and dynamic units of a node tree
    #[command(visible_alias = "croquis")]
    Analyze(commands::analyze::AnalyzeArgs),
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("TESSERA_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = config::load_config(cli.config.as_deref());
    let result = match cli.command {
        Commands::Lower(args) => commands::lower::run(args, &config),
        Commands::Diff(args) => commands::diff::run(args, &config),
        Commands::Analyze(args) => commands::analyze::run(args, &config),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
