//! Opaque id allocation for handlers, uploads, refs and router callbacks.
//!
//! The lowering pass only ever sees the ids handed out here; it never calls
//! a handler itself.

use parking_lot::RwLock;
use std::sync::Arc;
use tessera_carton::{FxHashMap, String, ToCompactString};

/// Thread-safe id allocator.
///
/// `ensure` is idempotent: the same underlying value (by `Arc` identity)
/// registered under the same caller-supplied key always yields the same id.
pub struct Registry<H: ?Sized> {
    prefix: &'static str,
    inner: RwLock<RegistryInner<H>>,
}

struct RegistryInner<H: ?Sized> {
    ids: FxHashMap<(usize, String), String>,
    entries: FxHashMap<String, Arc<H>>,
    next: u64,
}

/// Registry of event handlers receiving a JSON payload.
pub type HandlerRegistry = Registry<dyn Fn(&serde_json::Value) + Send + Sync>;

impl<H: ?Sized> Registry<H> {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            inner: RwLock::new(RegistryInner {
                ids: FxHashMap::default(),
                entries: FxHashMap::default(),
                next: 0,
            }),
        }
    }

    /// Return the id of `value` under `key`, allocating one on first use.
    pub fn ensure(&self, value: &Arc<H>, key: &str) -> String {
        let identity = (Arc::as_ptr(value) as *const () as usize, String::from(key));

        if let Some(id) = self.inner.read().ids.get(&identity) {
            return id.clone();
        }

        let mut inner = self.inner.write();
        // Another writer may have won the race between the two locks.
        if let Some(id) = inner.ids.get(&identity) {
            return id.clone();
        }
        inner.next += 1;
        let mut id = String::from(self.prefix);
        id.push_str(&inner.next.to_compact_string());
        inner.entries.insert(id.clone(), Arc::clone(value));
        inner.ids.insert(identity, id.clone());
        id
    }

    pub fn get(&self, id: &str) -> Option<Arc<H>> {
        self.inner.read().entries.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H: ?Sized> Default for Registry<H> {
    fn default() -> Self {
        Self::new("h")
    }
}

impl<H: ?Sized> std::fmt::Debug for Registry<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("prefix", &self.prefix)
            .field("len", &self.len())
            .finish()
    }
}
