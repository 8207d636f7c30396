//! Analysis result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessera_carton::String;
use tessera_relief::ComponentSpan;

/// Counts and component spans of one node tree.
///
/// Static units count elements and dynamic units count slot-producing
/// nodes. Spans are half-open ranges over these counters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub statics_count: usize,
    pub dynamics_count: usize,
    pub components: BTreeMap<String, ComponentSpan>,
}

impl AnalysisResult {
    /// Append the result of a later sibling subtree, shifting its spans by
    /// the counts accumulated so far.
    pub fn absorb(&mut self, other: AnalysisResult) {
        for (id, span) in other.components {
            self.components
                .insert(id, span.shifted(self.statics_count, self.dynamics_count));
        }
        self.statics_count += other.statics_count;
        self.dynamics_count += other.dynamics_count;
    }
}
