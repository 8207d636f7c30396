//! Lowering options.

use serde::{Deserialize, Serialize};
use tessera_carton::String;

/// Default name of the attribute that lists an element's slots.
pub const DEFAULT_ANCHOR_ATTRIBUTE: &str = "data-tessera-slots";

/// Lowering options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LowerOptions {
    /// Attribute written into an element's markup listing its `slot@child` anchors
    pub anchor_attribute: String,
    /// Validate the tree before lowering
    pub validate: bool,
}

impl Default for LowerOptions {
    fn default() -> Self {
        Self {
            anchor_attribute: String::from(DEFAULT_ANCHOR_ATTRIBUTE),
            validate: true,
        }
    }
}
