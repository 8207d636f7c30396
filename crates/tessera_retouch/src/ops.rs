//! Patch operations and their wire shape.
//!
//! Every op serializes as a tagged, fixed-arity JSON tuple:
//!
//! | Op | Tuple |
//! |---|---|
//! | `SetText` | `["setText", slot, text]` |
//! | `SetAttrs` | `["setAttrs", slot, {upserts}, [removed]]` |
//! | `List` | `["list", slot, childOp...]` |
//! | `Ins` | `["ins", pos, {key, html, slots?}]` |
//! | `Del` | `["del", key]` |
//! | `Mov` | `["mov", from, to]` |
//! | `Set` | `["set", key, subSlot, value]` |

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use tessera_atelier::{AttrMap, Row, Slot};
use tessera_carton::String;

/// Slot-level patch operation
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    SetText {
        slot: usize,
        text: String,
    },
    SetAttrs {
        slot: usize,
        upsert: AttrMap,
        remove: Vec<String>,
    },
    List {
        slot: usize,
        ops: Vec<ListOp>,
    },
}

impl Op {
    pub fn slot(&self) -> usize {
        match self {
            Self::SetText { slot, .. } | Self::SetAttrs { slot, .. } | Self::List { slot, .. } => {
                *slot
            }
        }
    }
}

/// Operation on the rows of a list slot
#[derive(Debug, Clone, PartialEq)]
pub enum ListOp {
    Ins { pos: usize, row: Row },
    Del { key: String },
    Mov { from: usize, to: usize },
    /// Replace one slot of a row's sub-render. Part of the protocol; the
    /// diff engine replaces changed rows wholesale instead.
    Set { key: String, slot: usize, value: Slot },
}

#[derive(Serialize)]
struct RowWire<'a> {
    key: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "no_slots")]
    slots: &'a [usize],
}

fn no_slots(slots: &&[usize]) -> bool {
    slots.is_empty()
}

impl Serialize for Op {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::SetText { slot, text } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element("setText")?;
                seq.serialize_element(slot)?;
                seq.serialize_element(text)?;
                seq.end()
            }
            Self::SetAttrs {
                slot,
                upsert,
                remove,
            } => {
                let mut seq = serializer.serialize_seq(Some(4))?;
                seq.serialize_element("setAttrs")?;
                seq.serialize_element(slot)?;
                seq.serialize_element(upsert)?;
                seq.serialize_element(remove)?;
                seq.end()
            }
            Self::List { slot, ops } => {
                let mut seq = serializer.serialize_seq(Some(2 + ops.len()))?;
                seq.serialize_element("list")?;
                seq.serialize_element(slot)?;
                for op in ops {
                    seq.serialize_element(op)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for ListOp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Ins { pos, row } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element("ins")?;
                seq.serialize_element(pos)?;
                seq.serialize_element(&RowWire {
                    key: &row.key,
                    html: &row.html,
                    slots: &row.slots,
                })?;
                seq.end()
            }
            Self::Del { key } => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element("del")?;
                seq.serialize_element(key)?;
                seq.end()
            }
            Self::Mov { from, to } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element("mov")?;
                seq.serialize_element(from)?;
                seq.serialize_element(to)?;
                seq.end()
            }
            Self::Set { key, slot, value } => {
                let mut seq = serializer.serialize_seq(Some(4))?;
                seq.serialize_element("set")?;
                seq.serialize_element(key)?;
                seq.serialize_element(slot)?;
                seq.serialize_element(value)?;
                seq.end()
            }
        }
    }
}

/// Serialize a patch list into its JSON wire form.
pub fn to_wire(ops: &[Op]) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(ops)
}

pub fn to_wire_string(ops: &[Op]) -> serde_json::Result<std::string::String> {
    serde_json::to_string(ops)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_text_and_attrs_tuples() {
        let mut upsert = AttrMap::new();
        upsert.insert("class".into(), "y".into());
        let ops = vec![
            Op::SetText {
                slot: 0,
                text: "B".into(),
            },
            Op::SetAttrs {
                slot: 1,
                upsert,
                remove: vec!["data-old".into()],
            },
        ];
        insta::assert_snapshot!(to_wire_string(&ops).unwrap(), @r#"[["setText",0,"B"],["setAttrs",1,{"class":"y"},["data-old"]]]"#);
    }

    #[test]
    fn test_list_child_tuples() {
        let ops = vec![Op::List {
            slot: 2,
            ops: vec![
                ListOp::Del { key: "b".into() },
                ListOp::Mov { from: 1, to: 0 },
                ListOp::Ins {
                    pos: 2,
                    row: Row::markup("d", "<li>d</li>"),
                },
            ],
        }];
        insta::assert_snapshot!(to_wire_string(&ops).unwrap(), @r#"[["list",2,["del","b"],["mov",1,0],["ins",2,{"key":"d","html":"<li>d</li>"}]]]"#);
    }

    #[test]
    fn test_ins_carries_owned_slots() {
        let mut row = Row::markup("a", "<li>a</li>");
        row.slots = vec![0, 1];
        let op = ListOp::Ins { pos: 0, row };
        insta::assert_snapshot!(serde_json::to_string(&op).unwrap(), @r#"["ins",0,{"key":"a","html":"<li>a</li>","slots":[0,1]}]"#);
    }

    #[test]
    fn test_set_tuple() {
        let op = ListOp::Set {
            key: "a".into(),
            slot: 0,
            value: Slot::Text("x".into()),
        };
        insta::assert_snapshot!(serde_json::to_string(&op).unwrap(), @r#"["set","a",0,{"kind":"text","value":"x"}]"#);
    }
}
