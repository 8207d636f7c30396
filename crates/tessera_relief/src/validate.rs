//! Validation of typed trees.

use crate::{Element, Node, NodeLocation, TreeError};

impl Node {
    /// Check the invariants lowering relies on: every element has a tag and
    /// every router path is absolute.
    pub fn validate(&self) -> Result<(), TreeError> {
        validate_node(self, &NodeLocation::root())
    }
}

fn validate_node(node: &Node, at: &NodeLocation) -> Result<(), TreeError> {
    match node {
        Node::Element(el) => {
            validate_element(el, at)?;
            validate_children(&el.children, at)
        }
        Node::Fragment(fragment) => validate_children(&fragment.children, at),
        Node::Component(component) => validate_node(&component.child, &at.child(0)),
        Node::Text(_) => Ok(()),
    }
}

fn validate_children(children: &[Node], at: &NodeLocation) -> Result<(), TreeError> {
    children
        .iter()
        .enumerate()
        .try_for_each(|(i, child)| validate_node(child, &at.child(i)))
}

fn validate_element(el: &Element, at: &NodeLocation) -> Result<(), TreeError> {
    if el.tag.trim().is_empty() {
        return Err(TreeError::EmptyTag { at: at.clone() });
    }
    if let Some(router) = &el.router {
        if !router.path.is_empty() && !router.path.starts_with('/') {
            return Err(TreeError::InvalidRouterPath {
                at: at.clone(),
                path: router.path.clone(),
            });
        }
    }
    Ok(())
}
