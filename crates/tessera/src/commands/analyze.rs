//! Analyze command - Count the units and component spans of a node tree

use clap::Args;
use std::path::PathBuf;
use tessera::croquis::AnalyzerOptions;

use super::{read_tree, CommandError};
use crate::config::TesseraConfig;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Node tree JSON file (`-` for stdin)
    pub input: PathBuf,

    /// Analyze sibling runs of at least this many nodes concurrently
    #[arg(short, long)]
    pub threshold: Option<usize>,

    /// Number of worker threads (default: number of CPUs)
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,
}

pub fn run(args: AnalyzeArgs, config: &TesseraConfig) -> Result<(), CommandError> {
    let options = AnalyzerOptions {
        concurrency_threshold: args.threshold.or(config.analyze.concurrency_threshold),
        workers: args.workers.or(config.analyze.workers),
    };

    let node = read_tree(&args.input)?;
    let result = tessera::analyze_or_fallback(&node, &options);

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
