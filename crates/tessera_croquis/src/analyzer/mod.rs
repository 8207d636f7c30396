//! Component and capacity analyzer.
//!
//! This module provides the `Analyzer` that produces an [`AnalysisResult`]
//! without building any markup.
//!
//! ## Counting rules
//!
//! - an element is one static unit, plus one dynamic unit when it owns an
//!   attribute slot ([`Element::is_dynamic`])
//! - mutable text is one dynamic unit
//! - a keyed sibling run is one extra dynamic unit for the list itself
//! - in a mixed keyed/unkeyed run only the keyed siblings are walked, and
//!   the run adds no list unit
//!
//! ## Usage
//!
//! ```
//! use tessera_croquis::{Analyzer, AnalyzerOptions};
//! use tessera_relief::{Element, Node};
//!
//! let tree: Node = Element::new("p").child(Node::mutable_text("hi")).into();
//! let mut analyzer = Analyzer::with_options(AnalyzerOptions::default());
//! analyzer.analyze(&tree).unwrap();
//! let result = analyzer.finish();
//! assert_eq!((result.statics_count, result.dynamics_count), (1, 1));
//! ```

mod concurrent;

pub use concurrent::fan_out;

use rayon::ThreadPool;
use serde::{Deserialize, Serialize};
use tessera_relief::{Component, ComponentSpan, Element, KeyedRun, Node};

use crate::analysis::AnalysisResult;
use crate::errors::AnalyzeError;

/// Analyzer options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzerOptions {
    /// Sibling runs at least this long are analyzed on the worker pool.
    /// `None` analyzes sequentially.
    pub concurrency_threshold: Option<usize>,
    /// Worker pool size (default: available parallelism)
    pub workers: Option<usize>,
}

impl AnalyzerOptions {
    /// Sequential analysis
    #[inline]
    pub const fn sequential() -> Self {
        Self {
            concurrency_threshold: None,
            workers: None,
        }
    }

    /// Concurrent analysis of sibling runs of at least `threshold` nodes
    #[inline]
    pub const fn concurrent(threshold: usize) -> Self {
        Self {
            concurrency_threshold: Some(threshold),
            workers: None,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers
            .filter(|&n| n > 0)
            .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
            .unwrap_or(1)
    }
}

/// Tree-shape analyzer.
pub struct Analyzer {
    options: AnalyzerOptions,
    result: AnalysisResult,
    pool: Option<ThreadPool>,
    /// First worker or pool failure; later runs fall back to the calling thread.
    error: Option<AnalyzeError>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Create a sequential analyzer
    #[inline]
    pub fn new() -> Self {
        Self::with_options(AnalyzerOptions::sequential())
    }

    #[inline]
    pub fn with_options(options: AnalyzerOptions) -> Self {
        Self {
            options,
            result: AnalysisResult::default(),
            pool: None,
            error: None,
        }
    }

    /// Analyze `node`, accumulating into this analyzer's counters.
    pub fn analyze(&mut self, node: &Node) -> Result<(), AnalyzeError> {
        self.visit(node);
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn finish(self) -> AnalysisResult {
        tracing::debug!(
            statics = self.result.statics_count,
            dynamics = self.result.dynamics_count,
            components = self.result.components.len(),
            "analysis finished"
        );
        self.result
    }

    fn visit(&mut self, node: &Node) {
        match node {
            Node::Element(el) => self.visit_element(el),
            Node::Text(text) => {
                if text.mutable {
                    self.result.dynamics_count += 1;
                }
            }
            Node::Fragment(fragment) => self.visit_children(&fragment.children),
            Node::Component(component) => self.visit_component(component),
        }
    }

    fn visit_element(&mut self, el: &Element) {
        self.result.statics_count += 1;
        if el.is_dynamic() {
            self.result.dynamics_count += 1;
        }
        if !el.is_void() {
            self.visit_children(&el.children);
        }
    }

    fn visit_component(&mut self, component: &Component) {
        let statics_start = self.result.statics_count;
        let dynamics_start = self.result.dynamics_count;
        self.visit(&component.child);
        if !component.id.is_empty() {
            self.result.components.insert(
                component.id.clone(),
                ComponentSpan {
                    statics_start,
                    statics_end: self.result.statics_count,
                    dynamics_start,
                    dynamics_end: self.result.dynamics_count,
                },
            );
        }
    }

    fn visit_children(&mut self, children: &[Node]) {
        let walked: Vec<&Node> = match KeyedRun::classify(children) {
            KeyedRun::Keyed(_) => {
                self.result.dynamics_count += 1;
                children.iter().collect()
            }
            KeyedRun::Mixed => {
                tracing::trace!(len = children.len(), "mixed run; walking keyed siblings only");
                children.iter().filter(|c| c.key().is_some()).collect()
            }
            KeyedRun::DuplicateKey(key) => {
                tracing::warn!(key, "duplicate list key; run is not keyed");
                children.iter().collect()
            }
            KeyedRun::Unkeyed => children.iter().collect(),
        };

        let concurrent = match self.options.concurrency_threshold {
            Some(threshold) => {
                self.error.is_none() && !walked.is_empty() && walked.len() >= threshold.max(1)
            }
            None => false,
        };
        if concurrent {
            if let Err(err) = self.visit_concurrently(&walked) {
                tracing::warn!(%err, "concurrent run failed; walking it on the calling thread");
                self.error = Some(err);
                for child in walked {
                    self.visit(child);
                }
            }
        } else {
            for child in walked {
                self.visit(child);
            }
        }
    }

    fn visit_concurrently(&mut self, nodes: &[&Node]) -> Result<(), AnalyzeError> {
        if self.pool.is_none() {
            let workers = self.options.worker_count();
            self.pool = Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("tessera-croquis-{i}"))
                    .build()?,
            );
            tracing::debug!(workers, "started analysis worker pool");
        }
        let Some(pool) = self.pool.as_ref() else {
            return Ok(());
        };

        let results = fan_out(pool, nodes, |node| walk_sequential(node));

        let mut branches = Vec::with_capacity(results.len());
        for result in results {
            branches.push(result?);
        }
        for branch in branches {
            self.result.absorb(branch);
        }
        Ok(())
    }
}

/// Analyze `node` with the given options.
pub fn analyze(node: &Node, options: &AnalyzerOptions) -> Result<AnalysisResult, AnalyzeError> {
    let mut analyzer = Analyzer::with_options(*options);
    analyzer.analyze(node)?;
    Ok(analyzer.finish())
}

/// Sequential analysis; cannot fail.
pub fn analyze_sequential(node: &Node) -> AnalysisResult {
    walk_sequential(node)
}

fn walk_sequential(node: &Node) -> AnalysisResult {
    let mut analyzer = Analyzer::new();
    analyzer.visit(node);
    analyzer.result
}
