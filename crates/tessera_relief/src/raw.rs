//! Flat serde form of the node tree.
//!
//! JSON producers describe each node with one discriminator field (`tag`,
//! `text`, `fragment` or `component`) plus optional metadata. Converting a
//! [`RawNode`] into a [`Node`] rejects shapes the typed tree cannot express.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessera_carton::String;

use crate::{
    Attribute, ClassName, Component, Element, Fragment, Handler, Node, NodeKind, NodeLocation,
    RouterLink, StyleDecl, Text, TreeError, Upload,
};

/// Raw node as read from JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawNode {
    // Discriminators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fragment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    // Element metadata
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mutable_attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mutable_classes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mutable_styles: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub handlers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<Upload>,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router: Option<RouterLink>,

    // Element and fragment content
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawNode>,

    // Text metadata
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub mutable: bool,

    // Component content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<Box<RawNode>>,
}

impl RawNode {
    /// Convert into a typed, validated tree.
    pub fn into_node(self) -> Result<Node, TreeError> {
        let node = convert(self, &NodeLocation::root())?;
        node.validate()?;
        Ok(node)
    }

    fn kind(&self, at: &NodeLocation) -> Result<NodeKind, TreeError> {
        let declared = [
            (self.tag.is_some(), NodeKind::Element),
            (self.text.is_some(), NodeKind::Text),
            (self.fragment, NodeKind::Fragment),
            (self.component.is_some(), NodeKind::Component),
        ];
        let mut kinds = declared.iter().filter(|(set, _)| *set).map(|(_, k)| *k);
        match (kinds.next(), kinds.next()) {
            (Some(kind), None) => Ok(kind),
            (Some(first), Some(second)) => Err(TreeError::ConflictingKinds {
                at: at.clone(),
                first,
                second,
            }),
            (None, _) => Err(TreeError::MissingKind { at: at.clone() }),
        }
    }

    /// Names of the element-only fields set on this node.
    fn element_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            ("attrs", !self.attrs.is_empty()),
            ("mutableAttrs", !self.mutable_attrs.is_empty()),
            ("classes", !self.classes.is_empty()),
            ("mutableClasses", !self.mutable_classes.is_empty()),
            ("styles", !self.styles.is_empty()),
            ("mutableStyles", !self.mutable_styles.is_empty()),
            ("key", self.key.is_some()),
            ("handlers", !self.handlers.is_empty()),
            ("upload", self.upload.is_some()),
            ("ref", self.ref_id.is_some()),
            ("router", self.router.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, set)| set.then_some(field))
    }
}

impl TryFrom<RawNode> for Node {
    type Error = TreeError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        raw.into_node()
    }
}

fn misplaced(at: &NodeLocation, kind: NodeKind, field: &'static str) -> TreeError {
    TreeError::MisplacedField {
        at: at.clone(),
        kind,
        field,
    }
}

fn convert(raw: RawNode, at: &NodeLocation) -> Result<Node, TreeError> {
    let kind = raw.kind(at)?;
    if kind != NodeKind::Element {
        if let Some(field) = raw.element_fields().next() {
            return Err(misplaced(at, kind, field));
        }
    }
    if raw.mutable && kind != NodeKind::Text {
        return Err(misplaced(at, kind, "mutable"));
    }
    if raw.child.is_some() && kind != NodeKind::Component {
        return Err(misplaced(at, kind, "child"));
    }
    if !raw.children.is_empty() && matches!(kind, NodeKind::Text | NodeKind::Component) {
        return Err(misplaced(at, kind, "children"));
    }

    match kind {
        NodeKind::Text => Ok(Node::Text(Text {
            value: raw.text.unwrap_or_default(),
            mutable: raw.mutable,
        })),
        NodeKind::Fragment => Ok(Node::Fragment(Fragment {
            children: convert_children(raw.children, at)?,
        })),
        NodeKind::Component => {
            let id = raw.component.unwrap_or_default();
            let Some(child) = raw.child else {
                return Err(TreeError::MissingChild { at: at.clone(), id });
            };
            Ok(Node::Component(Component {
                id,
                child: Box::new(convert(*child, &at.child(0))?),
            }))
        }
        NodeKind::Element => {
            let attrs = raw
                .attrs
                .into_iter()
                .map(|(name, value)| (name, value, false))
                .chain(
                    raw.mutable_attrs
                        .into_iter()
                        .map(|(name, value)| (name, value, true)),
                )
                .map(|(name, value, mutable)| Attribute {
                    name,
                    value,
                    mutable,
                })
                .collect();
            let classes = raw
                .classes
                .into_iter()
                .map(|name| ClassName {
                    name,
                    mutable: false,
                })
                .chain(
                    raw.mutable_classes
                        .into_iter()
                        .map(|name| ClassName {
                            name,
                            mutable: true,
                        }),
                )
                .collect();
            let styles = raw
                .styles
                .into_iter()
                .map(|(property, value)| (property, value, false))
                .chain(
                    raw.mutable_styles
                        .into_iter()
                        .map(|(property, value)| (property, value, true)),
                )
                .map(|(property, value, mutable)| StyleDecl {
                    property,
                    value,
                    mutable,
                })
                .collect();
            let handlers = raw
                .handlers
                .into_iter()
                .map(|(event, handler_id)| Handler { event, handler_id })
                .collect();

            Ok(Node::Element(Element {
                tag: raw.tag.unwrap_or_default(),
                attrs,
                classes,
                styles,
                children: convert_children(raw.children, at)?,
                key: raw.key,
                handlers,
                upload: raw.upload,
                ref_id: raw.ref_id,
                router: raw.router,
            }))
        }
    }
}

fn convert_children(children: Vec<RawNode>, at: &NodeLocation) -> Result<Vec<Node>, TreeError> {
    children
        .into_iter()
        .enumerate()
        .map(|(i, child)| convert(child, &at.child(i)))
        .collect()
}
