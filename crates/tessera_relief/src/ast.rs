//! Node tree types.
//!
//! This module defines the immutable input tree handed to the lowering pass:
//! elements, text, fragments and components. Trees are plain owned values, so
//! a caller can keep one across passes and lower it any number of times.

use serde::{Deserialize, Serialize};
use std::fmt;
use tessera_carton::String;

/// Node kind discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum NodeKind {
    Element = 0,
    Text = 1,
    Fragment = 2,
    Component = 3,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Element => "element",
            Self::Text => "text",
            Self::Fragment => "fragment",
            Self::Component => "component",
        })
    }
}

/// A node of the input tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(Text),
    Fragment(Fragment),
    Component(Component),
}

impl Node {
    /// Static text node.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(Text {
            value: value.into(),
            mutable: false,
        })
    }

    /// Text node whose value may change between renders.
    pub fn mutable_text(value: impl Into<String>) -> Self {
        Self::Text(Text {
            value: value.into(),
            mutable: true,
        })
    }

    pub fn fragment(children: impl IntoIterator<Item = Node>) -> Self {
        Self::Fragment(Fragment {
            children: children.into_iter().collect(),
        })
    }

    pub fn component(id: impl Into<String>, child: impl Into<Node>) -> Self {
        Self::Component(Component {
            id: id.into(),
            child: Box::new(child.into()),
        })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Element(_) => NodeKind::Element,
            Self::Text(_) => NodeKind::Text,
            Self::Fragment(_) => NodeKind::Fragment,
            Self::Component(_) => NodeKind::Component,
        }
    }

    /// The list key carried by this node.
    ///
    /// Elements expose their own non-empty key; a component exposes the key
    /// of the node it wraps. Text and fragments are never keyed.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Element(el) => el.key.as_deref().filter(|k| !k.is_empty()),
            Self::Component(c) => c.child.key(),
            Self::Text(_) | Self::Fragment(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

/// Text node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub value: String,
    /// Mutable text gets its own `Text` slot; static text is folded into markup.
    pub mutable: bool,
}

/// Fragment node - children lower directly into the parent's slot stream
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    pub children: Vec<Node>,
}

/// Component boundary wrapping exactly one child
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: String,
    pub child: Box<Node>,
}

/// Element attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub mutable: bool,
}

/// One entry of an element's class list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassName {
    pub name: String,
    #[serde(default)]
    pub mutable: bool,
}

/// One inline style declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDecl {
    pub property: String,
    pub value: String,
    #[serde(default)]
    pub mutable: bool,
}

/// Event handler assignment; `handler_id` comes from a [`crate::Registry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handler {
    pub event: String,
    pub handler_id: String,
}

/// File upload binding
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Upload {
    pub id: String,
    #[serde(default)]
    pub accept: Vec<String>,
    #[serde(default)]
    pub multiple: bool,
}

/// Client-side navigation metadata
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouterLink {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub replace: bool,
}

impl RouterLink {
    /// A link whose four fields are all empty carries no navigation.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.query.is_empty() && self.hash.is_empty() && !self.replace
    }
}

/// Element node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<Attribute>,
    pub classes: Vec<ClassName>,
    pub styles: Vec<StyleDecl>,
    pub children: Vec<Node>,
    pub key: Option<String>,
    pub handlers: Vec<Handler>,
    pub upload: Option<Upload>,
    pub ref_id: Option<String>,
    pub router: Option<RouterLink>,
}

/// Attribute name prefix that marks router metadata written as plain attributes.
pub const ROUTER_ATTR_PREFIX: &str = "data-router-";

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(Attribute {
            name: name.into(),
            value: value.into(),
            mutable: false,
        });
        self
    }

    pub fn mutable_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(Attribute {
            name: name.into(),
            value: value.into(),
            mutable: true,
        });
        self
    }

    pub fn class(mut self, name: impl Into<String>) -> Self {
        self.classes.push(ClassName {
            name: name.into(),
            mutable: false,
        });
        self
    }

    pub fn mutable_class(mut self, name: impl Into<String>) -> Self {
        self.classes.push(ClassName {
            name: name.into(),
            mutable: true,
        });
        self
    }

    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.push(StyleDecl {
            property: property.into(),
            value: value.into(),
            mutable: false,
        });
        self
    }

    pub fn mutable_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.push(StyleDecl {
            property: property.into(),
            value: value.into(),
            mutable: true,
        });
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn on(mut self, event: impl Into<String>, handler_id: impl Into<String>) -> Self {
        self.handlers.push(Handler {
            event: event.into(),
            handler_id: handler_id.into(),
        });
        self
    }

    pub fn upload(mut self, upload: Upload) -> Self {
        self.upload = Some(upload);
        self
    }

    pub fn ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    pub fn router(mut self, router: RouterLink) -> Self {
        self.router = Some(router);
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn is_void(&self) -> bool {
        tessera_carton::is_void_tag(&self.tag)
    }

    /// Ref id with surrounding whitespace removed; `None` when blank.
    pub fn trimmed_ref(&self) -> Option<&str> {
        self.ref_id.as_deref().map(str::trim).filter(|r| !r.is_empty())
    }

    pub fn has_router_attrs(&self) -> bool {
        self.attrs
            .iter()
            .any(|a| a.name.starts_with(ROUTER_ATTR_PREFIX))
    }

    /// Whether this element owns a dynamic-attributes slot.
    ///
    /// Shared by the lowering pass and the analyzer so that both agree on
    /// the slot count of a template.
    pub fn is_dynamic(&self) -> bool {
        !self.handlers.is_empty()
            || self.attrs.iter().any(|a| a.mutable)
            || self.classes.iter().any(|c| c.mutable)
            || self.styles.iter().any(|s| s.mutable)
            || self.upload.is_some()
            || self.trimmed_ref().is_some()
            || self.router.is_some()
            || self.has_router_attrs()
    }
}
