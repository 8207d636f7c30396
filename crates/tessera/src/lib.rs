//! # Tessera
//!
//! Structured lowering and patch diffing for server-driven UI, written in Rust.
//!
//! This crate re-exports all Tessera sub-crates for unified documentation and
//! adds the [`pipeline`] glue used by the `tessera` binary.
//!
//! ## Crates
//!
//! - [`carton`] - Shared toolbox (strings, hash maps, escaping, fingerprints)
//! - [`relief`] - Input node tree, raw JSON form and validation
//! - [`atelier`] - Structured lowering, typed paths and bindings
//! - [`croquis`] - Capacity and component analysis
//! - [`retouch`] - Diff engine and patch wire format

pub mod pipeline;

/// Shared toolbox.
pub use tessera_carton as carton;

/// Input node tree, raw JSON form and validation.
pub use tessera_relief as relief;

/// Structured lowering, typed paths and bindings.
pub use tessera_atelier as atelier;

/// Capacity and component analysis.
pub use tessera_croquis as croquis;

/// Diff engine and patch wire format.
pub use tessera_retouch as retouch;

pub use pipeline::{
    analyze_or_fallback, check_template, lower_presized, parse_document, Document, Error,
};
