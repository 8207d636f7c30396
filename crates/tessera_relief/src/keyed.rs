//! Keyed sibling runs and component spans.
//!
//! Both the lowering pass and the analyzer must agree on which sibling runs
//! become a list slot, so the all-or-nothing rule lives here.

use serde::{Deserialize, Serialize};
use tessera_carton::FxHashSet;

use crate::Node;

/// Classification of a run of sibling nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyedRun<'a> {
    /// Every sibling carries a non-empty key and no key repeats.
    Keyed(Vec<&'a str>),
    /// Every sibling carries a key but at least one key repeats.
    DuplicateKey(&'a str),
    /// Some siblings carry keys and some do not.
    Mixed,
    /// No sibling carries a key (including the empty run).
    Unkeyed,
}

impl<'a> KeyedRun<'a> {
    pub fn classify(children: &'a [Node]) -> Self {
        let keyed = children.iter().filter(|c| c.key().is_some()).count();
        if keyed == 0 {
            return Self::Unkeyed;
        }
        if keyed < children.len() {
            return Self::Mixed;
        }

        let mut seen = FxHashSet::default();
        let mut keys = Vec::with_capacity(children.len());
        for key in children.iter().filter_map(Node::key) {
            if !seen.insert(key) {
                return Self::DuplicateKey(key);
            }
            keys.push(key);
        }
        Self::Keyed(keys)
    }

    pub fn is_keyed(&self) -> bool {
        matches!(self, Self::Keyed(_))
    }
}

/// Half-open index ranges owned by one component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpan {
    pub statics_start: usize,
    pub statics_end: usize,
    pub dynamics_start: usize,
    pub dynamics_end: usize,
}

impl ComponentSpan {
    /// Shift every bound by the given offsets.
    pub fn shifted(self, statics: usize, dynamics: usize) -> Self {
        Self {
            statics_start: self.statics_start + statics,
            statics_end: self.statics_end + statics,
            dynamics_start: self.dynamics_start + dynamics,
            dynamics_end: self.dynamics_end + dynamics,
        }
    }
}
