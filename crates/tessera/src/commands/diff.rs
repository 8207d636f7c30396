//! Diff command - Compute the patch between two renders

use clap::Args;
use std::path::PathBuf;
use tessera::carton::hash_to_hex;
use tessera::retouch::{diff, to_wire_string, DiffConfig};

use super::{read_document, CommandError};
use crate::config::TesseraConfig;

#[derive(Args)]
pub struct DiffArgs {
    /// Previous render or node tree (`-` for stdin)
    pub prev: PathBuf,

    /// Next render or node tree
    pub next: PathBuf,

    /// Fail on template mismatch instead of printing an empty patch
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: DiffArgs, config: &TesseraConfig) -> Result<(), CommandError> {
    let prev = read_document(&args.prev)?.into_rendered(&config.lower, &config.analyze)?;
    let next = read_document(&args.next)?.into_rendered(&config.lower, &config.analyze)?;

    let mut options = config.diff;
    options.strict |= args.strict;
    let diff_config = DiffConfig::from(options);
    if diff_config.strict {
        tessera::check_template(&prev, &next).map_err(tessera::Error::from)?;
    }

    tracing::debug!(
        prev = %hash_to_hex(prev.fingerprint()),
        next = %hash_to_hex(next.fingerprint()),
        "template fingerprints"
    );
    let ops = diff(&prev, &next, &diff_config);
    println!("{}", to_wire_string(&ops)?);
    Ok(())
}
