//! # tessera_croquis
//!
//! Croquis - The capacity analysis layer for Tessera.
//!
//! ## Name Origin
//!
//! **Croquis** (/kʁɔ.ki/) is a French term for a quick, sketchy drawing that captures
//! the essential features of a subject. `tessera_croquis` sketches a node tree
//! the same way: it counts the static and dynamic units a render will need and
//! where each component's share begins and ends, without producing any markup.
//!
//! ## Purpose
//!
//! - **Capacity**: pre-size lowering buffers
//! - **Component spans**: introspect which slots a component owns
//! - **Concurrent mode**: wide sibling runs are split across a bounded worker
//!   pool and merged back in sibling order
//!
//! ## Architecture
//!
//! ```text
//!   tessera_relief (Node tree)
//!        ↓
//!  tessera_croquis (Capacity analysis)  ← This crate
//!        ↓
//! tessera_atelier (Structured lowering)
//! ```

pub mod analysis;
pub mod analyzer;
pub mod errors;

pub use analysis::AnalysisResult;
pub use analyzer::{analyze, analyze_sequential, fan_out, Analyzer, AnalyzerOptions};
pub use errors::{AnalyzeError, WorkerError};
