//! # tessera_relief
//!
//! Relief - The node tree surface for Tessera.
//!
//! ## Name Origin
//!
//! A **relief** is a sculpture that rises from a flat background. This crate
//! holds the raised surface every other Tessera crate works from: the node
//! tree produced by an application's view code, its raw JSON form, and the
//! checks that decide whether a tree may be lowered at all.
//!
//! ## Architecture
//!
//! ```text
//! view code / JSON
//!        ↓
//! tessera_relief (Node tree, validation)  ← This crate
//!        ↓
//! tessera_atelier (Structured lowering) → tessera_retouch (Diff)
//!        ↓
//! tessera_croquis (Capacity analysis)
//! ```

pub mod ast;
pub mod errors;
pub mod finalize;
pub mod keyed;
pub mod raw;
pub mod registry;
mod validate;

pub use ast::*;
pub use errors::*;
pub use finalize::FinalAttr;
pub use keyed::{ComponentSpan, KeyedRun};
pub use raw::RawNode;
pub use registry::{HandlerRegistry, Registry};
