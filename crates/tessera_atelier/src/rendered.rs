//! Structured render model.
//!
//! A structured render alternates static markup with numbered dynamic slots:
//! `statics[0], dynamics[0], statics[1], ..., statics[n]`. Two renders of the
//! same template share their statics and differ only in slot values, which
//! is what makes slot-wise diffing possible.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tessera_carton::{escape_html_into, hash_segments, String};
use tessera_relief::ComponentSpan;

use crate::bindings::Bindings;

/// Attribute map of an `Attrs` slot, ordered by name.
pub type AttrMap = BTreeMap<String, String>;

/// Slot kind discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotKind {
    Text,
    Attrs,
    List,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Attrs => "attrs",
            Self::List => "list",
        })
    }
}

/// One dynamic position of a structured render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Slot {
    Text(String),
    /// `None` and an empty map are equivalent.
    Attrs(Option<AttrMap>),
    List(Vec<Row>),
}

impl Slot {
    pub fn kind(&self) -> SlotKind {
        match self {
            Self::Text(_) => SlotKind::Text,
            Self::Attrs(_) => SlotKind::Attrs,
            Self::List(_) => SlotKind::List,
        }
    }

    /// Attribute map of an `Attrs` slot, treating `None` as empty.
    pub fn attrs(&self) -> Option<&AttrMap> {
        static EMPTY: AttrMap = BTreeMap::new();
        match self {
            Self::Attrs(map) => Some(map.as_ref().unwrap_or(&EMPTY)),
            _ => None,
        }
    }

    /// Append the SSR markup of this slot to `out`.
    pub fn write_html(&self, out: &mut std::string::String) {
        match self {
            Self::Text(text) => escape_html_into(out, text),
            Self::Attrs(Some(map)) => {
                for (name, value) in map {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_html_into(out, value);
                    out.push('"');
                }
            }
            Self::Attrs(None) => {}
            Self::List(rows) => {
                for row in rows {
                    out.push_str(&row.html);
                }
            }
        }
    }
}

/// One keyed entry of a list slot.
///
/// A row is lowered as its own structured render; `slots` lists the indices
/// of that sub-render's dynamics owned by the row, in row-local numbering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub key: String,
    pub html: String,
    #[serde(default)]
    pub slots: Vec<usize>,
    #[serde(default)]
    pub render: Rendered,
    #[serde(default, skip_serializing_if = "Bindings::is_empty")]
    pub bindings: Bindings,
    /// Spans of components rendered inside the row, over the sub-render.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub component_spans: BTreeMap<String, ComponentSpan>,
}

impl Row {
    /// Build a row from its lowered sub-render.
    pub fn new(key: impl Into<String>, render: Rendered, bindings: Bindings) -> Self {
        let html = String::from(render.to_html());
        let slots = (0..render.dynamics.len()).collect();
        Self {
            key: key.into(),
            html,
            slots,
            render,
            bindings,
            component_spans: BTreeMap::new(),
        }
    }

    pub fn with_component_spans(mut self, spans: BTreeMap<String, ComponentSpan>) -> Self {
        self.component_spans = spans;
        self
    }

    /// A row carrying only markup, without a sub-render.
    pub fn markup(key: impl Into<String>, html: impl Into<String>) -> Self {
        let html = html.into();
        Self {
            key: key.into(),
            render: Rendered::new(vec![html.clone()], Vec::new()),
            html,
            slots: Vec::new(),
            bindings: Bindings::default(),
            component_spans: BTreeMap::new(),
        }
    }
}

/// Alternating statics and dynamics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rendered {
    pub statics: Vec<String>,
    pub dynamics: Vec<Slot>,
}

impl Default for Rendered {
    fn default() -> Self {
        Self {
            statics: vec![String::default()],
            dynamics: Vec::new(),
        }
    }
}

impl Rendered {
    pub fn new(statics: Vec<String>, dynamics: Vec<Slot>) -> Self {
        Self { statics, dynamics }
    }

    /// `len(statics) == len(dynamics) + 1`
    pub fn is_well_formed(&self) -> bool {
        self.statics.len() == self.dynamics.len() + 1
    }

    /// Concatenate statics and rendered slots into SSR markup.
    pub fn to_html(&self) -> std::string::String {
        let capacity = self.statics.iter().map(|s| s.len()).sum::<usize>() + self.dynamics.len() * 8;
        let mut out = std::string::String::with_capacity(capacity);
        for (i, fixed) in self.statics.iter().enumerate() {
            out.push_str(fixed);
            if let Some(slot) = self.dynamics.get(i) {
                slot.write_html(&mut out);
            }
        }
        out
    }

    /// Template identity: the xxHash3 of the statics sequence.
    pub fn fingerprint(&self) -> u64 {
        hash_segments(self.statics.iter().map(|s| s.as_str()))
    }

    pub fn slot_kinds(&self) -> impl Iterator<Item = SlotKind> + '_ {
        self.dynamics.iter().map(Slot::kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Slot {
        Slot::Attrs(Some(
            pairs
                .iter()
                .map(|(k, v)| (String::from(*k), String::from(*v)))
                .collect(),
        ))
    }

    #[test]
    fn test_to_html_interleaves_slots() {
        let rendered = Rendered::new(
            vec!["<p".into(), ">".into(), "</p>".into()],
            vec![
                attrs(&[("title", "a\"b"), ("class", "x")]),
                Slot::Text("1 < 2".into()),
            ],
        );
        assert!(rendered.is_well_formed());
        insta::assert_snapshot!(rendered.to_html(), @r#"<p class="x" title="a&quot;b">1 &lt; 2</p>"#);
    }

    #[test]
    fn test_list_slot_renders_rows() {
        let rendered = Rendered::new(
            vec!["<ul>".into(), "</ul>".into()],
            vec![Slot::List(vec![
                Row::markup("a", "<li>a</li>"),
                Row::markup("b", "<li>b</li>"),
            ])],
        );
        assert_eq!(rendered.to_html(), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_nil_attrs_render_nothing() {
        let rendered = Rendered::new(
            vec!["<i".into(), "></i>".into()],
            vec![Slot::Attrs(None)],
        );
        assert_eq!(rendered.to_html(), "<i></i>");
        assert_eq!(Slot::Attrs(None).attrs(), Some(&AttrMap::new()));
    }

    #[test]
    fn test_fingerprint_tracks_statics_only() {
        let a = Rendered::new(vec!["<b>".into(), "</b>".into()], vec![Slot::Text("x".into())]);
        let b = Rendered::new(vec!["<b>".into(), "</b>".into()], vec![Slot::Text("y".into())]);
        let c = Rendered::new(vec!["<i>".into(), "</i>".into()], vec![Slot::Text("x".into())]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_row_new_owns_all_sub_slots() {
        let render = Rendered::new(
            vec!["<li>".into(), "</li>".into()],
            vec![Slot::Text("one".into())],
        );
        let row = Row::new("k", render, Bindings::default());
        assert_eq!(row.html, "<li>one</li>");
        assert_eq!(row.slots, vec![0]);
    }

    #[test]
    fn test_slot_serde_shape() {
        let json = serde_json::to_string(&vec![Slot::Text("a".into()), Slot::Attrs(None)]).unwrap();
        insta::assert_snapshot!(json, @r#"[{"kind":"text","value":"a"},{"kind":"attrs","value":null}]"#);
        let back: Vec<Slot> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0].kind(), SlotKind::Text);
    }
}
