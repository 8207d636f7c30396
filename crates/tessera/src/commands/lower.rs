//! Lower command - Lower a node tree into a structured render

use clap::Args;
use std::path::PathBuf;
use tessera::atelier::LowerOptions;

use super::{read_tree, CommandError};
use crate::config::TesseraConfig;

#[derive(Args)]
pub struct LowerArgs {
    /// Node tree JSON file (`-` for stdin)
    pub input: PathBuf,

    /// Print only the SSR markup
    #[arg(long)]
    pub html: bool,

    /// Skip tree validation
    #[arg(long)]
    pub no_validate: bool,
}

pub fn run(args: LowerArgs, config: &TesseraConfig) -> Result<(), CommandError> {
    let options = LowerOptions {
        validate: config.lower.validate && !args.no_validate,
        ..config.lower.clone()
    };

    let node = read_tree(&args.input)?;
    let lowered = tessera::lower_presized(&node, &options, &config.analyze)?;

    if args.html {
        println!("{}", lowered.rendered.to_html());
    } else {
        println!("{}", serde_json::to_string_pretty(&lowered)?);
    }
    Ok(())
}
