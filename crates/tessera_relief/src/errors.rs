//! Tree validation errors.

use crate::NodeKind;
use std::fmt;
use thiserror::Error;
use tessera_carton::String;

/// Position of a node in the tree as a sequence of child indices.
///
/// Component children count as index `0` of the component.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeLocation(pub Vec<usize>);

impl NodeLocation {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }
}

impl fmt::Display for NodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

/// Errors surfaced by tree validation. Lowering never runs on a tree that
/// produced one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("element at {at} has an empty tag")]
    EmptyTag { at: NodeLocation },

    #[error("{kind} node at {at} cannot carry `{field}`")]
    MisplacedField {
        at: NodeLocation,
        kind: NodeKind,
        field: &'static str,
    },

    #[error("node at {at} declares conflicting kinds `{first}` and `{second}`")]
    ConflictingKinds {
        at: NodeLocation,
        first: NodeKind,
        second: NodeKind,
    },

    #[error("node at {at} declares no kind (expected one of tag, text, fragment, component)")]
    MissingKind { at: NodeLocation },

    #[error("component `{id}` at {at} has no child")]
    MissingChild { at: NodeLocation, id: String },

    #[error("router path `{path}` at {at} must start with `/`")]
    InvalidRouterPath { at: NodeLocation, path: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        assert_eq!(NodeLocation::root().to_string(), "root");
        assert_eq!(NodeLocation::root().child(0).child(3).to_string(), "root/0/3");
    }

    #[test]
    fn test_error_messages() {
        let err = TreeError::MisplacedField {
            at: NodeLocation::root().child(1),
            kind: NodeKind::Text,
            field: "handlers",
        };
        assert_eq!(err.to_string(), "text node at root/1 cannot carry `handlers`");
    }
}
