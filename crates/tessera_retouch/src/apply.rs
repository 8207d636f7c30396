//! Reference patch application.
//!
//! Applies a patch list to a structured render the way a client applies it
//! to a live document. Ops are applied strictly in order.

use tessera_atelier::{Rendered, Row, Slot, SlotKind};

use crate::errors::ApplyError;
use crate::ops::{ListOp, Op};

/// Apply `ops` to a copy of `rendered`.
pub fn apply(rendered: &Rendered, ops: &[Op]) -> Result<Rendered, ApplyError> {
    let mut out = rendered.clone();
    for op in ops {
        apply_op(&mut out, op)?;
    }
    Ok(out)
}

fn slot_mut(rendered: &mut Rendered, slot: usize, expected: SlotKind) -> Result<&mut Slot, ApplyError> {
    let len = rendered.dynamics.len();
    let target = rendered
        .dynamics
        .get_mut(slot)
        .ok_or(ApplyError::SlotOutOfRange { slot, len })?;
    if target.kind() != expected {
        return Err(ApplyError::KindMismatch {
            slot,
            expected,
            found: target.kind(),
        });
    }
    Ok(target)
}

fn apply_op(rendered: &mut Rendered, op: &Op) -> Result<(), ApplyError> {
    match op {
        Op::SetText { slot, text } => {
            *slot_mut(rendered, *slot, SlotKind::Text)? = Slot::Text(text.clone());
        }
        Op::SetAttrs {
            slot,
            upsert,
            remove,
        } => {
            if let Slot::Attrs(map) = slot_mut(rendered, *slot, SlotKind::Attrs)? {
                let map = map.get_or_insert_with(Default::default);
                for name in remove {
                    map.remove(name);
                }
                for (name, value) in upsert {
                    map.insert(name.clone(), value.clone());
                }
            }
        }
        Op::List { slot, ops } => {
            if let Slot::List(rows) = slot_mut(rendered, *slot, SlotKind::List)? {
                for op in ops {
                    apply_list_op(*slot, rows, op)?;
                }
            }
        }
    }
    Ok(())
}

fn position(slot: usize, rows: &[Row], key: &str) -> Result<usize, ApplyError> {
    rows.iter()
        .position(|row| row.key == key)
        .ok_or_else(|| ApplyError::UnknownKey {
            slot,
            key: key.into(),
        })
}

fn apply_list_op(slot: usize, rows: &mut Vec<Row>, op: &ListOp) -> Result<(), ApplyError> {
    match op {
        ListOp::Ins { pos, row } => {
            if *pos > rows.len() {
                return Err(ApplyError::PositionOutOfRange {
                    slot,
                    pos: *pos,
                    len: rows.len(),
                });
            }
            rows.insert(*pos, row.clone());
        }
        ListOp::Del { key } => {
            let index = position(slot, rows, key)?;
            rows.remove(index);
        }
        ListOp::Mov { from, to } => {
            let len = rows.len();
            if *from >= len || *to >= len {
                return Err(ApplyError::PositionOutOfRange {
                    slot,
                    pos: (*from).max(*to),
                    len,
                });
            }
            let row = rows.remove(*from);
            rows.insert(*to, row);
        }
        ListOp::Set {
            key,
            slot: sub_slot,
            value,
        } => {
            let index = position(slot, rows, key)?;
            let row = &mut rows[index];
            let target = row
                .render
                .dynamics
                .get_mut(*sub_slot)
                .ok_or_else(|| ApplyError::RowSlotOutOfRange {
                    key: key.clone(),
                    slot: *sub_slot,
                })?;
            *target = value.clone();
            row.html = row.render.to_html().into();
        }
    }
    Ok(())
}
