//! Subcommands of the `tessera` binary.

pub mod analyze;
pub mod diff;
pub mod lower;

use std::io::Read;
use std::path::{Path, PathBuf};
use tessera::relief::Node;
use tessera::Document;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Input {
        path: PathBuf,
        source: tessera::Error,
    },
    #[error("{}: expected a node tree, found a structured render", path.display())]
    NotATree { path: PathBuf },
    #[error(transparent)]
    Pipeline(#[from] tessera::Error),
    #[error("failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Read a file, or stdin when the path is `-`.
fn read_input(path: &Path) -> Result<String, CommandError> {
    let read = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        std::fs::read_to_string(path)
    };
    read.map_err(|source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_document(path: &Path) -> Result<Document, CommandError> {
    let source = read_input(path)?;
    tessera::parse_document(&source).map_err(|source| CommandError::Input {
        path: path.to_path_buf(),
        source,
    })
}

fn read_tree(path: &Path) -> Result<Node, CommandError> {
    match read_document(path)? {
        Document::Tree(node) => Ok(node),
        Document::Rendered(_) => Err(CommandError::NotATree {
            path: path.to_path_buf(),
        }),
    }
}
