//! Structured lowering.
//!
//! Walks a node tree depth-first and emits alternating static markup and
//! numbered dynamic slots. Keyed children become a single `List` slot whose
//! rows are lowered as independent renders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tessera_carton::{escape_html_into, SmallVec, String};
use tessera_relief::{
    finalize, Component, ComponentSpan, Element, FinalAttr, KeyedRun, Node, Text, TreeError,
};
use thiserror::Error;

use crate::bindings::{router_link, BindingExtractor, Bindings, ElementFrame};
use crate::component_path::ComponentPathTracker;
use crate::options::LowerOptions;
use crate::rendered::{AttrMap, Rendered, Row, Slot};

/// Attribute prefix carrying handler ids in an `Attrs` slot.
pub const HANDLER_ATTR_PREFIX: &str = "data-tessera-on-";
pub const UPLOAD_ATTR: &str = "data-tessera-upload";
pub const REF_ATTR: &str = "data-tessera-ref";

/// Lowering errors
#[derive(Debug, Error)]
pub enum LowerError {
    #[error("invalid node tree: {0}")]
    Tree(#[from] TreeError),
}

/// Output of one lowering pass
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lowered {
    pub rendered: Rendered,
    pub bindings: Bindings,
    pub component_spans: BTreeMap<String, ComponentSpan>,
}

impl Lowered {
    /// Splice an independently lowered render after this one.
    ///
    /// The last static of `self` is joined with the first static of `other`;
    /// slot indices, bindings and component spans of `other` are rebased.
    /// Binding paths stay relative to the component scope that recorded
    /// them, so `other` is expected to be rooted at a component.
    pub fn append(&mut self, other: Lowered) {
        let statics_offset = self.rendered.statics.len().saturating_sub(1);
        let dynamics_offset = self.rendered.dynamics.len();

        let mut statics = other.rendered.statics.into_iter();
        if let Some(first) = statics.next() {
            match self.rendered.statics.last_mut() {
                Some(last) => last.push_str(&first),
                None => self.rendered.statics.push(first),
            }
        }
        self.rendered.statics.extend(statics);
        self.rendered.dynamics.extend(other.rendered.dynamics);

        let mut extractor = BindingExtractor::from(std::mem::take(&mut self.bindings));
        extractor.merge_from(&BindingExtractor::from(other.bindings), dynamics_offset);
        self.bindings = extractor.finish();

        for (id, span) in other.component_spans {
            self.component_spans
                .insert(id, span.shifted(statics_offset, dynamics_offset));
        }
    }
}

/// Lower `node` into a structured render.
pub fn lower(node: &Node, options: &LowerOptions) -> Result<Lowered, LowerError> {
    lower_with_capacity(node, options, 0, 0)
}

/// Like [`lower`], pre-sizing the statics and dynamics buffers.
pub fn lower_with_capacity(
    node: &Node,
    options: &LowerOptions,
    statics: usize,
    dynamics: usize,
) -> Result<Lowered, LowerError> {
    if options.validate {
        node.validate()?;
    }
    let mut builder = Builder::with_capacity(options, statics, dynamics);
    builder.lower_node(node);
    let lowered = builder.finish();
    tracing::debug!(
        statics = lowered.rendered.statics.len(),
        dynamics = lowered.rendered.dynamics.len(),
        components = lowered.component_spans.len(),
        "lowered node tree"
    );
    Ok(lowered)
}

/// Child positions of one open container (the root range or an element).
#[derive(Debug, Default)]
struct Container {
    next: usize,
    text_run: Option<TextRun>,
}

/// Adjacent text nodes merge into one DOM node, so they share a position.
#[derive(Debug)]
struct TextRun {
    position: usize,
    shared: bool,
    /// Indices into the innermost frame's slot bindings.
    bindings: SmallVec<[usize; 2]>,
}

struct OpenFrame<'a> {
    frame: ElementFrame<'a>,
    /// `(static index, byte offset)` where the anchor attribute goes.
    anchor_at: (usize, usize),
}

struct Builder<'a> {
    options: &'a LowerOptions,
    statics: Vec<std::string::String>,
    buf: std::string::String,
    dynamics: Vec<Slot>,
    containers: Vec<Container>,
    frames: Vec<OpenFrame<'a>>,
    paths: ComponentPathTracker,
    extractor: BindingExtractor,
    spans: BTreeMap<String, ComponentSpan>,
}

impl<'a> Builder<'a> {
    fn with_capacity(options: &'a LowerOptions, statics: usize, dynamics: usize) -> Self {
        Self {
            options,
            statics: Vec::with_capacity(statics),
            buf: std::string::String::with_capacity(256),
            dynamics: Vec::with_capacity(dynamics),
            containers: vec![Container::default()],
            frames: Vec::new(),
            paths: ComponentPathTracker::new(),
            extractor: BindingExtractor::new(),
            spans: BTreeMap::new(),
        }
    }

    /// Builder for one keyed row, recording bindings on behalf of the
    /// component that renders the list.
    fn for_row(options: &'a LowerOptions, owner: &str) -> Self {
        let mut builder = Self::with_capacity(options, 2, 1);
        builder.paths = ComponentPathTracker::within(owner);
        builder
    }

    fn finish(mut self) -> Lowered {
        self.statics.push(std::mem::take(&mut self.buf));
        Lowered {
            rendered: Rendered::new(
                self.statics.into_iter().map(String::from).collect(),
                self.dynamics,
            ),
            bindings: self.extractor.finish(),
            component_spans: self.spans,
        }
    }

    fn lower_node(&mut self, node: &'a Node) {
        match node {
            Node::Element(el) => self.lower_element(el),
            Node::Text(text) => self.lower_text(text),
            Node::Fragment(fragment) => self.lower_children(&fragment.children),
            Node::Component(component) => self.lower_component(component),
        }
    }

    fn lower_children(&mut self, children: &'a [Node]) {
        match KeyedRun::classify(children) {
            KeyedRun::Keyed(keys) => return self.lower_list(children, keys),
            KeyedRun::DuplicateKey(key) => {
                tracing::warn!(key, "duplicate list key; lowering siblings without a list slot");
            }
            KeyedRun::Mixed => {
                tracing::trace!(len = children.len(), "mixed keyed and unkeyed siblings");
            }
            KeyedRun::Unkeyed => {}
        }
        for child in children {
            self.lower_node(child);
        }
    }

    fn push_dynamic(&mut self, slot: Slot) -> usize {
        self.statics.push(std::mem::take(&mut self.buf));
        self.dynamics.push(slot);
        self.dynamics.len() - 1
    }

    fn container(&mut self) -> &mut Container {
        if self.containers.is_empty() {
            self.containers.push(Container::default());
        }
        let last = self.containers.len() - 1;
        &mut self.containers[last]
    }

    /// Claim the next child position for a non-text node.
    fn claim_position(&mut self) -> usize {
        let container = self.container();
        container.text_run = None;
        container.next += 1;
        container.next - 1
    }

    fn lower_element(&mut self, el: &'a Element) {
        let position = self.claim_position();
        self.paths.enter(position);
        let path = self.paths.current_path();

        let attrs = finalize::attributes(el);
        self.buf.push('<');
        self.buf.push_str(&el.tag);
        for attr in attrs.iter().filter(|a| !a.mutable) {
            write_attr(&mut self.buf, &attr.name, &attr.value);
        }
        let anchor_at = (self.statics.len(), self.buf.len());
        let attr_slot = el
            .is_dynamic()
            .then(|| self.push_dynamic(Slot::Attrs(Some(dynamic_attrs(el, &attrs)))));
        self.buf.push('>');

        self.frames.push(OpenFrame {
            frame: ElementFrame::new(el, attr_slot, path, self.paths.component_id()),
            anchor_at,
        });
        let void = el.is_void();
        if !void {
            self.containers.push(Container::default());
            self.lower_children(&el.children);
            self.containers.pop();
        }

        if let Some(open) = self.frames.pop() {
            self.extractor.extract_all(&open.frame);
            if let Some(anchor) = open.frame.anchor() {
                self.insert_anchor(open.anchor_at, &anchor);
            }
        }

        if !void {
            self.buf.push_str("</");
            self.buf.push_str(&el.tag);
            self.buf.push('>');
        }
        self.paths.leave();
    }

    fn insert_anchor(&mut self, (index, offset): (usize, usize), anchor: &str) {
        let mut attr = std::string::String::new();
        write_attr(&mut attr, &self.options.anchor_attribute, anchor);
        match self.statics.get_mut(index) {
            Some(fixed) => fixed.insert_str(offset, &attr),
            None => self.buf.insert_str(offset, &attr),
        }
    }

    fn lower_text(&mut self, text: &Text) {
        // An empty text renders no DOM node, so it claims no position.
        if text.value.is_empty() {
            if text.mutable {
                let slot = self.push_dynamic(Slot::Text(text.value.clone()));
                if let Some(open) = self.frames.last_mut() {
                    open.frame.slot_bindings.push((slot, -1));
                }
            }
            return;
        }

        let container = self.container();
        let joined = container.text_run.as_mut().map(|run| {
            run.shared = true;
            run.position
        });
        let (position, shared) = match joined {
            Some(position) => (position, true),
            None => {
                let position = container.next;
                container.next += 1;
                container.text_run = Some(TextRun {
                    position,
                    shared: false,
                    bindings: SmallVec::new(),
                });
                (position, false)
            }
        };
        self.paths.touch(position);

        if shared {
            self.unanchor_text_run();
        }

        if !text.mutable {
            escape_html_into(&mut self.buf, &text.value);
            return;
        }

        let slot = self.push_dynamic(Slot::Text(text.value.clone()));
        let child_index = if shared { -1 } else { position as i32 };
        if let Some(open) = self.frames.last_mut() {
            open.frame.slot_bindings.push((slot, child_index));
            let binding = open.frame.slot_bindings.len() - 1;
            if let Some(run) = self.container().text_run.as_mut() {
                run.bindings.push(binding);
            }
        }
    }

    /// Texts merged with a neighbour are not addressable children.
    fn unanchor_text_run(&mut self) {
        let indices = match self.container().text_run.as_ref() {
            Some(run) if run.shared => run.bindings.clone(),
            _ => return,
        };
        if let Some(open) = self.frames.last_mut() {
            for index in indices {
                if let Some(binding) = open.frame.slot_bindings.get_mut(index) {
                    binding.1 = -1;
                }
            }
        }
    }

    fn lower_list(&mut self, children: &'a [Node], keys: Vec<&str>) {
        let owner = self.paths.component_id();
        let rows: Vec<Row> = children
            .iter()
            .zip(keys)
            .map(|(child, key)| {
                let mut sub = Builder::for_row(self.options, &owner);
                sub.lower_node(child);
                let lowered = sub.finish();
                Row::new(key, lowered.rendered, lowered.bindings)
                    .with_component_spans(lowered.component_spans)
            })
            .collect();
        tracing::trace!(rows = rows.len(), "lowered keyed run");

        let container = self.container();
        container.text_run = None;
        let position = container.next;

        let slot = self.push_dynamic(Slot::List(rows));
        let list = self.paths.record_list_path(slot);
        self.extractor.push_list_path(list);
        if let Some(open) = self.frames.last_mut() {
            open.frame.slot_bindings.push((slot, position as i32));
        }
    }

    fn lower_component(&mut self, component: &'a Component) {
        let statics_start = self.statics.len();
        let dynamics_start = self.dynamics.len();

        self.paths.push_component(&component.id);
        self.lower_node(&component.child);
        if let Some(path) = self.paths.pop_component() {
            self.extractor.push_component_path(path);
        }

        if !component.id.is_empty() {
            self.spans.insert(
                component.id.clone(),
                ComponentSpan {
                    statics_start,
                    statics_end: self.statics.len() + 1,
                    dynamics_start,
                    dynamics_end: self.dynamics.len(),
                },
            );
        }
    }
}

fn write_attr(out: &mut std::string::String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_html_into(out, value);
    out.push('"');
}

/// Contents of an element's `Attrs` slot.
fn dynamic_attrs(el: &Element, attrs: &[FinalAttr<'_>]) -> AttrMap {
    let mut map = AttrMap::new();
    for attr in attrs.iter().filter(|a| a.mutable) {
        map.insert(String::from(attr.name.as_ref()), String::from(attr.value.as_ref()));
    }
    for handler in &el.handlers {
        let mut name = String::from(HANDLER_ATTR_PREFIX);
        name.push_str(&handler.event);
        map.insert(name, handler.handler_id.clone());
    }
    if let Some(upload) = &el.upload {
        map.insert(String::from(UPLOAD_ATTR), upload.id.clone());
    }
    if let Some(ref_id) = el.trimmed_ref() {
        map.insert(String::from(REF_ATTR), String::from(ref_id));
    }
    // Router attributes written by hand are already part of the markup.
    if el.router.is_some() {
        let link = router_link(el);
        for (field, value) in [("path", &link.path), ("query", &link.query), ("hash", &link.hash)] {
            if !value.is_empty() {
                map.insert(router_attr(field), value.clone());
            }
        }
        if link.replace {
            map.insert(router_attr("replace"), String::from("true"));
        }
    }
    map
}

fn router_attr(field: &str) -> String {
    let mut name = String::from(tessera_relief::ROUTER_ATTR_PREFIX);
    name.push_str(field);
    name
}
