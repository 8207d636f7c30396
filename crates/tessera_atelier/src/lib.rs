//! # tessera_atelier
//!
//! Atelier - The structured lowering workshop for Tessera.
//!
//! ## Name Origin
//!
//! An **atelier** is the workshop where a mosaic is laid out before it is
//! set: tiles sorted into the fixed pattern and the pieces that will be
//! swapped later. This crate lowers a node tree into exactly that split,
//! static markup and numbered dynamic slots, along with the typed paths a
//! client needs to find each slot in a live document.
//!
//! ## Example
//!
//! ```
//! use tessera_atelier::{lower, LowerOptions, Slot};
//! use tessera_relief::{Element, Node};
//!
//! let view: Node = Element::new("p").child(Node::mutable_text("Hello")).into();
//! let lowered = lower(&view, &LowerOptions::default()).unwrap();
//!
//! assert_eq!(lowered.rendered.dynamics, vec![Slot::Text("Hello".into())]);
//! assert_eq!(
//!     lowered.rendered.to_html(),
//!     r#"<p data-tessera-slots="0@0">Hello</p>"#
//! );
//! ```

pub mod bindings;
pub mod builder;
pub mod component_path;
pub mod options;
pub mod path;
pub mod rendered;

pub use bindings::*;
pub use builder::{lower, lower_with_capacity, LowerError, Lowered};
pub use component_path::ComponentPathTracker;
pub use options::{LowerOptions, DEFAULT_ANCHOR_ATTRIBUTE};
pub use path::{combine, dom_segments, range_segments, try_combine, Path, PathError, PathSegment, SegmentKind};
pub use rendered::*;
