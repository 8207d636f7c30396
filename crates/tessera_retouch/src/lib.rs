//! # tessera_retouch
//!
//! Retouch - The diff engine for Tessera.
//!
//! ## Name Origin
//!
//! To **retouch** a finished piece is to correct only what changed, leaving
//! the rest of the surface untouched. Given two structured renders of the
//! same template, this crate emits the smallest patch a client needs: text
//! replacements, attribute upserts and removals, and keyed list inserts,
//! deletions and moves.
//!
//! ## Example
//!
//! ```
//! use tessera_atelier::{Rendered, Slot};
//! use tessera_retouch::{diff, to_wire_string, DiffConfig};
//!
//! let prev = Rendered::new(vec!["<p>".into(), "</p>".into()], vec![Slot::Text("A".into())]);
//! let next = Rendered::new(vec!["<p>".into(), "</p>".into()], vec![Slot::Text("B".into())]);
//!
//! let ops = diff(&prev, &next, &DiffConfig::lenient());
//! assert_eq!(to_wire_string(&ops).unwrap(), r#"[["setText",0,"B"]]"#);
//! ```

pub mod apply;
pub mod config;
pub mod diff;
pub mod errors;
pub mod ops;
pub mod reconcile;

pub use apply::apply;
pub use config::{DiffConfig, DiffOptions, MismatchCallback};
pub use diff::{check_compatible, diff};
pub use errors::{ApplyError, TemplateMismatch};
pub use ops::{to_wire, to_wire_string, ListOp, Op};
pub use reconcile::{apply_keys, reconcile};
