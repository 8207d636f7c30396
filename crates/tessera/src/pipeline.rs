//! End-to-end glue: JSON documents in, lowered renders and patches out.

use serde_json::Value;
use tessera_atelier::{lower_with_capacity, LowerError, LowerOptions, Lowered, Rendered, Slot};
use tessera_carton::{FxHashSet, String};
use tessera_croquis::{analyze, analyze_sequential, AnalysisResult, AnalyzeError, AnalyzerOptions};
use tessera_relief::{Node, RawNode, TreeError};
use tessera_retouch::{check_compatible, TemplateMismatch};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Lower(#[from] LowerError),
    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
    #[error("malformed render: {statics} statics for {dynamics} dynamics")]
    MalformedRender { statics: usize, dynamics: usize },
    #[error("list slot {slot} repeats row key {key:?}")]
    DuplicateRowKey { slot: usize, key: String },
    #[error("template mismatch: {0}")]
    Mismatch(#[from] TemplateMismatch),
}

/// A JSON input: either a node tree or an already lowered render.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Tree(Node),
    Rendered(Rendered),
}

impl Document {
    /// Lower a tree, or pass a render through.
    pub fn into_rendered(
        self,
        options: &LowerOptions,
        analyzer: &AnalyzerOptions,
    ) -> Result<Rendered, Error> {
        match self {
            Self::Tree(node) => Ok(lower_presized(&node, options, analyzer)?.rendered),
            Self::Rendered(rendered) => Ok(rendered),
        }
    }
}

/// Parse a document. An object carrying `statics` is a structured render,
/// anything else is read as a raw node tree.
pub fn parse_document(source: &str) -> Result<Document, Error> {
    let value: Value = serde_json::from_str(source)?;
    if value.get("statics").is_some() {
        let rendered: Rendered = serde_json::from_value(value)?;
        if !rendered.is_well_formed() {
            return Err(Error::MalformedRender {
                statics: rendered.statics.len(),
                dynamics: rendered.dynamics.len(),
            });
        }
        check_row_keys(&rendered)?;
        return Ok(Document::Rendered(rendered));
    }
    let raw: RawNode = serde_json::from_value(value)?;
    Ok(Document::Tree(raw.into_node()?))
}

/// Reject list slots whose rows repeat a key, including nested row renders.
fn check_row_keys(rendered: &Rendered) -> Result<(), Error> {
    for (slot, dynamic) in rendered.dynamics.iter().enumerate() {
        let Slot::List(rows) = dynamic else {
            continue;
        };
        let mut seen = FxHashSet::default();
        for row in rows {
            if !seen.insert(row.key.as_str()) {
                return Err(Error::DuplicateRowKey {
                    slot,
                    key: row.key.clone(),
                });
            }
            check_row_keys(&row.render)?;
        }
    }
    Ok(())
}

/// Analyze `node`, retrying sequentially if the worker pool fails.
pub fn analyze_or_fallback(node: &Node, options: &AnalyzerOptions) -> AnalysisResult {
    match analyze(node, options) {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!(%err, "concurrent analysis failed; falling back to sequential");
            analyze_sequential(node)
        }
    }
}

/// Lower `node` with buffers pre-sized from a capacity analysis.
pub fn lower_presized(
    node: &Node,
    options: &LowerOptions,
    analyzer: &AnalyzerOptions,
) -> Result<Lowered, Error> {
    let analysis = analyze_or_fallback(node, analyzer);
    let dynamics = analysis.dynamics_count;
    Ok(lower_with_capacity(node, options, dynamics + 1, dynamics)?)
}

/// Check that two renders are diffable slot for slot.
pub fn check_template(prev: &Rendered, next: &Rendered) -> Result<(), TemplateMismatch> {
    check_compatible(prev, next)?;
    for (slot, (before, after)) in prev.slot_kinds().zip(next.slot_kinds()).enumerate() {
        if before != after {
            return Err(TemplateMismatch::SlotKind {
                slot,
                prev: before,
                next: after,
            });
        }
    }
    Ok(())
}
