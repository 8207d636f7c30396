//! Carton - The shared toolbox for Tessera.
//!
//! This crate provides the small utilities every other Tessera crate leans on,
//! much like a carton (artist's portfolio case) holds the essential tools an
//! artist carries from studio to studio.
//!
//! # Modules
//!
//! - **dom**: Void-element table and HTML escaping for markup assembly
//! - **hash**: xxHash3 fingerprints for cheap template identity checks
//!
//! # Example
//!
//! ```
//! use tessera_carton::{escape_html, is_void_tag, String};
//!
//! assert!(is_void_tag("input"));
//! assert!(!is_void_tag("div"));
//!
//! let escaped: String = escape_html("<b>&</b>").into();
//! assert_eq!(escaped, "&lt;b&gt;&amp;&lt;/b&gt;");
//! ```

pub mod dom;
pub mod hash;

// Re-export compact_str::CompactString for convenience
pub use compact_str::CompactString;
pub use compact_str::CompactString as String;
pub use compact_str::ToCompactString;

// Re-export smallvec for stack-optimized collections
pub use smallvec::{smallvec, SmallVec};

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};

// Re-export phf for compile-time perfect hash functions
pub use phf::{phf_set, Set as PhfSet};

// Re-export shared utilities
pub use dom::*;
pub use hash::*;
