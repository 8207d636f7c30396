//! Diff configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::errors::TemplateMismatch;

/// Callback receiving every template mismatch seen in lenient mode.
pub type MismatchCallback = Arc<dyn Fn(&TemplateMismatch) + Send + Sync>;

/// Serializable diff options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiffOptions {
    /// Panic on template mismatch instead of skipping the patch
    pub strict: bool,
}

/// Mismatch policy passed to every diff call.
#[derive(Clone, Default)]
pub struct DiffConfig {
    pub strict: bool,
    pub on_mismatch: Option<MismatchCallback>,
}

impl DiffConfig {
    pub fn strict() -> Self {
        Self {
            strict: true,
            on_mismatch: None,
        }
    }

    pub fn lenient() -> Self {
        Self::default()
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TemplateMismatch) + Send + Sync + 'static,
    {
        self.on_mismatch = Some(Arc::new(callback));
        self
    }

    /// Apply the mismatch policy.
    ///
    /// # Panics
    ///
    /// Panics in strict mode.
    pub fn handle_mismatch(&self, mismatch: &TemplateMismatch) {
        if self.strict {
            panic!("tessera: template mismatch: {mismatch}");
        }
        tracing::warn!(%mismatch, "template mismatch; skipping patch");
        if let Some(callback) = &self.on_mismatch {
            callback(mismatch);
        }
    }
}

impl From<DiffOptions> for DiffConfig {
    fn from(options: DiffOptions) -> Self {
        Self {
            strict: options.strict,
            on_mismatch: None,
        }
    }
}

impl fmt::Debug for DiffConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffConfig")
            .field("strict", &self.strict)
            .field("on_mismatch", &self.on_mismatch.is_some())
            .finish()
    }
}
