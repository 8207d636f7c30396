//! Binding extraction.
//!
//! Every element visited by the builder is summarized in an [`ElementFrame`]
//! once its children are lowered. The extractor turns frames into the side
//! tables a client needs to wire a live document: handler, upload, ref and
//! router bindings, and the slot anchors owned by each element.

use serde::{Deserialize, Serialize};
use tessera_carton::{FxHashSet, String};
use tessera_relief::{Element, RouterLink, ROUTER_ATTR_PREFIX};

use crate::path::Path;

/// Event handler attached to an element's attribute slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerBinding {
    pub slot: usize,
    pub event: String,
    pub handler_id: String,
    pub component_id: String,
    pub path: Path,
}

/// A slot owned by an element, with its DOM child position (`-1` when the
/// slot is not an addressable child of its own).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPath {
    pub slot: usize,
    pub child_index: i32,
    pub component_id: String,
    pub path: Path,
}

/// Anchor of a list slot.
///
/// Lists rendered directly at a component's root carry no path: the client
/// resolves them as direct children of the component boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPath {
    pub slot: usize,
    pub component_id: String,
    pub path: Option<Path>,
    pub at_root: bool,
}

/// Boundary of one component instance within its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPath {
    pub component_id: String,
    pub parent_id: Option<String>,
    pub parent_path: Path,
    pub at_root: bool,
    pub first_child: Option<Path>,
    pub last_child: Option<Path>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBinding {
    pub slot: usize,
    pub component_id: String,
    pub upload_id: String,
    pub accept: Vec<String>,
    pub multiple: bool,
    pub path: Path,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefBinding {
    pub slot: usize,
    pub component_id: String,
    pub ref_id: String,
    pub path: Path,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterBinding {
    pub slot: usize,
    pub component_id: String,
    pub path: Path,
    pub link: RouterLink,
}

/// All side tables produced by one lowering pass
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bindings {
    pub handlers: Vec<HandlerBinding>,
    pub slot_paths: Vec<SlotPath>,
    pub list_paths: Vec<ListPath>,
    pub component_paths: Vec<ComponentPath>,
    pub uploads: Vec<UploadBinding>,
    pub refs: Vec<RefBinding>,
    pub routers: Vec<RouterBinding>,
}

impl Bindings {
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
            && self.slot_paths.is_empty()
            && self.list_paths.is_empty()
            && self.component_paths.is_empty()
            && self.uploads.is_empty()
            && self.refs.is_empty()
            && self.routers.is_empty()
    }
}

/// One visited element plus its path context.
#[derive(Debug, Clone)]
pub struct ElementFrame<'a> {
    pub element: &'a Element,
    /// Index of the element's `Attrs` slot, if it has one.
    pub attr_slot: Option<usize>,
    pub path: Path,
    pub component_id: String,
    /// `(slot, child_index)` pairs collected while the element was open.
    pub slot_bindings: Vec<(usize, i32)>,
}

impl<'a> ElementFrame<'a> {
    pub fn new(element: &'a Element, attr_slot: Option<usize>, path: Path, component_id: String) -> Self {
        let slot_bindings = attr_slot.map(|slot| vec![(slot, -1)]).unwrap_or_default();
        Self {
            element,
            attr_slot,
            path,
            component_id,
            slot_bindings,
        }
    }

    /// Space-separated `slot@child` entries, or `None` when the element owns
    /// no slot.
    pub fn anchor(&self) -> Option<std::string::String> {
        if self.slot_bindings.is_empty() {
            return None;
        }
        let entries: Vec<_> = self
            .slot_bindings
            .iter()
            .map(|(slot, child)| format!("{slot}@{child}"))
            .collect();
        Some(entries.join(" "))
    }
}

/// Accumulates bindings across frames; every extraction is idempotent.
#[derive(Debug, Default)]
pub struct BindingExtractor {
    bindings: Bindings,
    seen_handlers: FxHashSet<(usize, String)>,
    seen_slots: FxHashSet<(usize, i32)>,
    seen_lists: FxHashSet<usize>,
    seen_uploads: FxHashSet<usize>,
    seen_refs: FxHashSet<usize>,
    seen_routers: FxHashSet<usize>,
}

impl BindingExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn finish(self) -> Bindings {
        self.bindings
    }

    /// Run every extractor over `frame`.
    pub fn extract_all(&mut self, frame: &ElementFrame<'_>) {
        self.extract_handlers(frame);
        self.extract_slot_paths(frame);
        self.extract_uploads(frame);
        self.extract_ref(frame);
        self.extract_router(frame);
    }

    pub fn extract_handlers(&mut self, frame: &ElementFrame<'_>) {
        let Some(slot) = frame.attr_slot else {
            return;
        };
        for handler in &frame.element.handlers {
            self.push_handler(HandlerBinding {
                slot,
                event: handler.event.clone(),
                handler_id: handler.handler_id.clone(),
                component_id: frame.component_id.clone(),
                path: frame.path.clone(),
            });
        }
    }

    pub fn extract_slot_paths(&mut self, frame: &ElementFrame<'_>) {
        for &(slot, child_index) in &frame.slot_bindings {
            self.push_slot_path(SlotPath {
                slot,
                child_index,
                component_id: frame.component_id.clone(),
                path: frame.path.clone(),
            });
        }
    }

    pub fn extract_uploads(&mut self, frame: &ElementFrame<'_>) {
        let (Some(slot), Some(upload)) = (frame.attr_slot, frame.element.upload.as_ref()) else {
            return;
        };
        if frame.component_id.is_empty() {
            return;
        }
        self.push_upload(UploadBinding {
            slot,
            component_id: frame.component_id.clone(),
            upload_id: upload.id.clone(),
            accept: upload.accept.clone(),
            multiple: upload.multiple,
            path: frame.path.clone(),
        });
    }

    pub fn extract_ref(&mut self, frame: &ElementFrame<'_>) {
        let (Some(slot), Some(ref_id)) = (frame.attr_slot, frame.element.trimmed_ref()) else {
            return;
        };
        if frame.component_id.is_empty() {
            return;
        }
        self.push_ref(RefBinding {
            slot,
            component_id: frame.component_id.clone(),
            ref_id: ref_id.into(),
            path: frame.path.clone(),
        });
    }

    pub fn extract_router(&mut self, frame: &ElementFrame<'_>) {
        let Some(slot) = frame.attr_slot else {
            return;
        };
        if frame.component_id.is_empty() {
            return;
        }
        let link = router_link(frame.element);
        if link.is_empty() {
            return;
        }
        self.push_router(RouterBinding {
            slot,
            component_id: frame.component_id.clone(),
            path: frame.path.clone(),
            link,
        });
    }

    pub fn push_list_path(&mut self, list: ListPath) {
        if self.seen_lists.insert(list.slot) {
            self.bindings.list_paths.push(list);
        }
    }

    pub fn push_component_path(&mut self, component: ComponentPath) {
        self.bindings.component_paths.push(component);
    }

    /// Merge `other` into `self`, adding `dynamics_offset` to every slot index.
    ///
    /// Paths are kept as-is: they are relative to the component scope they
    /// were recorded in.
    pub fn merge_from(&mut self, other: &BindingExtractor, dynamics_offset: usize) {
        let theirs = &other.bindings;
        for b in &theirs.handlers {
            self.push_handler(HandlerBinding {
                slot: b.slot + dynamics_offset,
                ..b.clone()
            });
        }
        for b in &theirs.slot_paths {
            self.push_slot_path(SlotPath {
                slot: b.slot + dynamics_offset,
                ..b.clone()
            });
        }
        for b in &theirs.list_paths {
            self.push_list_path(ListPath {
                slot: b.slot + dynamics_offset,
                ..b.clone()
            });
        }
        for b in &theirs.uploads {
            self.push_upload(UploadBinding {
                slot: b.slot + dynamics_offset,
                ..b.clone()
            });
        }
        for b in &theirs.refs {
            self.push_ref(RefBinding {
                slot: b.slot + dynamics_offset,
                ..b.clone()
            });
        }
        for b in &theirs.routers {
            self.push_router(RouterBinding {
                slot: b.slot + dynamics_offset,
                ..b.clone()
            });
        }
        self.bindings
            .component_paths
            .extend(theirs.component_paths.iter().cloned());
    }

    fn push_handler(&mut self, binding: HandlerBinding) {
        if self.seen_handlers.insert((binding.slot, binding.event.clone())) {
            self.bindings.handlers.push(binding);
        }
    }

    fn push_slot_path(&mut self, binding: SlotPath) {
        if self.seen_slots.insert((binding.slot, binding.child_index)) {
            self.bindings.slot_paths.push(binding);
        }
    }

    fn push_upload(&mut self, binding: UploadBinding) {
        if self.seen_uploads.insert(binding.slot) {
            self.bindings.uploads.push(binding);
        }
    }

    fn push_ref(&mut self, binding: RefBinding) {
        if self.seen_refs.insert(binding.slot) {
            self.bindings.refs.push(binding);
        }
    }

    fn push_router(&mut self, binding: RouterBinding) {
        if self.seen_routers.insert(binding.slot) {
            self.bindings.routers.push(binding);
        }
    }
}

impl From<Bindings> for BindingExtractor {
    fn from(bindings: Bindings) -> Self {
        let mut extractor = Self::new();
        extractor.merge_from(
            &Self {
                bindings,
                ..Self::default()
            },
            0,
        );
        extractor
    }
}

/// Router link of `el`: the explicit link, or one read back from
/// `data-router-*` attributes.
pub fn router_link(el: &Element) -> RouterLink {
    if let Some(link) = &el.router {
        return link.clone();
    }
    let mut link = RouterLink::default();
    for attr in &el.attrs {
        let Some(field) = attr.name.strip_prefix(ROUTER_ATTR_PREFIX) else {
            continue;
        };
        match field {
            "path" => link.path = attr.value.clone(),
            "query" => link.query = attr.value.clone(),
            "hash" => link.hash = attr.value.clone(),
            "replace" => link.replace = attr.value == "true",
            _ => {}
        }
    }
    link
}
