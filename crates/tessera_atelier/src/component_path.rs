//! Component path calculator.
//!
//! Tracks nested component scopes during the builder's walk. Inside a scope,
//! the local path holds DOM child positions relative to the container the
//! component renders into; the base holds that container's absolute
//! position. Components are transparent in the DOM, so a scope's first and
//! last touched positions are the component's boundary within its parent.

use tessera_carton::String;

use crate::bindings::{ComponentPath, ListPath};
use crate::path::{combine, dom_segments, range_segments, Path};

#[derive(Debug)]
struct Scope {
    id: String,
    parent_id: Option<String>,
    prev_local: Vec<usize>,
    prev_base: Vec<usize>,
    base_path: Vec<usize>,
    start: Option<usize>,
    end: Option<usize>,
}

#[derive(Debug, Default)]
pub struct ComponentPathTracker {
    local: Vec<usize>,
    base: Vec<usize>,
    scopes: Vec<Scope>,
    /// Component owning the whole walk, e.g. the one rendering a list row.
    owner: String,
}

impl ComponentPathTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker for a subtree rendered on behalf of `owner`. The owner's
    /// scope is not reopened, so no `ComponentPath` is emitted for it.
    pub fn within(owner: &str) -> Self {
        Self {
            owner: owner.into(),
            ..Self::default()
        }
    }

    /// Id of the innermost component scope, the owner outside any scope, or
    /// `""` when there is neither.
    pub fn component_id(&self) -> String {
        self.scopes
            .last()
            .map(|s| s.id.clone())
            .unwrap_or_else(|| self.owner.clone())
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_component(&mut self, id: &str) {
        let parent_id = match self.scopes.last() {
            Some(scope) => Some(scope.id.clone()),
            None => (!self.owner.is_empty()).then(|| self.owner.clone()),
        };
        let mut base_path = self.base.clone();
        base_path.extend_from_slice(&self.local);

        let prev_local = std::mem::take(&mut self.local);
        let prev_base = std::mem::replace(&mut self.base, base_path.clone());
        self.scopes.push(Scope {
            id: id.into(),
            parent_id,
            prev_local,
            prev_base,
            base_path,
            start: None,
            end: None,
        });
    }

    /// Close the innermost scope. Anonymous components (empty id) emit no path.
    pub fn pop_component(&mut self) -> Option<ComponentPath> {
        let scope = self.scopes.pop()?;
        self.local = scope.prev_local;
        self.base = scope.prev_base;

        // A component rendered straight into its parent's container widens
        // the parent's boundary too.
        if let (Some(parent), Some(start), Some(end)) = (self.scopes.last_mut(), scope.start, scope.end) {
            if self.local.is_empty() && parent.base_path == scope.base_path {
                parent.start.get_or_insert(start);
                parent.end = Some(end);
            }
        }

        if scope.id.is_empty() {
            return None;
        }

        let at_root = scope.base_path.is_empty();
        let parent_path = if at_root {
            Path::root()
        } else {
            absolute(&scope.base_path)
        };
        let boundary = |position: usize| {
            if at_root {
                combine(&range_segments(&[position]), &[])
            } else {
                combine(&[], &dom_segments(&[position]))
            }
        };

        Some(ComponentPath {
            component_id: scope.id,
            parent_id: scope.parent_id,
            parent_path,
            at_root,
            first_child: scope.start.map(boundary),
            last_child: scope.end.map(boundary),
        })
    }

    /// Descend into the child at `index` of the current container.
    pub fn enter(&mut self, index: usize) {
        self.local.push(index);
        self.record_traversal();
    }

    pub fn leave(&mut self) {
        self.local.pop();
    }

    /// Record a leaf node (text) at `index` of the current container.
    pub fn touch(&mut self, index: usize) {
        if self.local.is_empty() {
            self.mark(index);
        }
    }

    /// Update the innermost scope's boundary from the current local path.
    pub fn record_traversal(&mut self) {
        if let Some(&first) = self.local.first() {
            self.mark(first);
        }
    }

    fn mark(&mut self, position: usize) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.start.get_or_insert(position);
            scope.end = Some(position);
        }
    }

    /// Typed path of the current position.
    ///
    /// At the document root the path is absolute; inside a component that
    /// renders into an element it is relative to that element.
    pub fn current_path(&self) -> Path {
        if self.base.is_empty() {
            match self.local.split_first() {
                Some((first, rest)) => combine(&range_segments(&[*first]), &dom_segments(rest)),
                None => Path::root(),
            }
        } else {
            combine(&[], &dom_segments(&self.local))
        }
    }

    /// Anchor for a list slot opened at the current position.
    pub fn record_list_path(&self, slot: usize) -> ListPath {
        let component_id = self.component_id();
        if self.local.is_empty() {
            ListPath {
                slot,
                component_id,
                path: None,
                at_root: true,
            }
        } else {
            ListPath {
                slot,
                component_id,
                path: Some(self.current_path()),
                at_root: false,
            }
        }
    }
}

fn absolute(positions: &[usize]) -> Path {
    match positions.split_first() {
        Some((first, rest)) => combine(&range_segments(&[*first]), &dom_segments(rest)),
        None => Path::root(),
    }
}
