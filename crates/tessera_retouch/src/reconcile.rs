//! Keyed list reconciliation.
//!
//! A single left-to-right pass over the next key order. Deletions come
//! first, in previous order; inserts and moves follow in target order. The
//! op sequence applied in order always turns the previous keys into the
//! next keys, though complex permutations may take more moves than strictly
//! necessary.

use tessera_atelier::Row;
use tessera_carton::FxHashMap;

use crate::ops::ListOp;

/// Compute the ops turning `prev` rows into `next` rows.
///
/// A row kept under the same key but with different markup is replaced:
/// it is deleted with the other removed rows and re-inserted at its target.
pub fn reconcile(prev: &[Row], next: &[Row]) -> Vec<ListOp> {
    let next_rows: FxHashMap<&str, &Row> = next.iter().map(|r| (r.key.as_str(), r)).collect();
    let retained = |row: &Row| {
        next_rows
            .get(row.key.as_str())
            .is_some_and(|next| next.html == row.html)
    };

    let mut ops = Vec::new();
    let mut current: Vec<&str> = Vec::with_capacity(prev.len());
    for row in prev {
        if retained(row) {
            current.push(&row.key);
        } else {
            ops.push(ListOp::Del {
                key: row.key.clone(),
            });
        }
    }

    for (target, row) in next.iter().enumerate() {
        let from = current.iter().position(|key| *key == row.key.as_str());
        match from {
            Some(from) => {
                // Only a repeated key in `next` can point past the end.
                let to = target.min(current.len() - 1);
                if from != to {
                    ops.push(ListOp::Mov { from, to });
                    let key = current.remove(from);
                    current.insert(to, key);
                }
            }
            None => {
                ops.push(ListOp::Ins {
                    pos: target,
                    row: row.clone(),
                });
                current.insert(target.min(current.len()), &row.key);
            }
        }
    }

    tracing::trace!(
        prev = prev.len(),
        next = next.len(),
        ops = ops.len(),
        "reconciled keyed list"
    );
    ops
}

/// Apply list ops to a key sequence.
pub fn apply_keys<'a>(keys: &[&'a str], ops: &'a [ListOp]) -> Vec<&'a str> {
    let mut keys = keys.to_vec();
    for op in ops {
        match op {
            ListOp::Del { key } => keys.retain(|k| *k != key.as_str()),
            ListOp::Ins { pos, row } => keys.insert((*pos).min(keys.len()), row.key.as_str()),
            ListOp::Mov { from, to } => {
                if *from < keys.len() {
                    let key = keys.remove(*from);
                    keys.insert((*to).min(keys.len()), key);
                }
            }
            ListOp::Set { .. } => {}
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rows(keys: &[&str]) -> Vec<Row> {
        keys.iter()
            .map(|k| Row::markup(*k, format!("<li>{k}</li>")))
            .collect()
    }

    fn describe(ops: &[ListOp]) -> Vec<std::string::String> {
        ops.iter()
            .map(|op| match op {
                ListOp::Ins { pos, row } => format!("ins {pos} {}", row.key),
                ListOp::Del { key } => format!("del {key}"),
                ListOp::Mov { from, to } => format!("mov {from} {to}"),
                ListOp::Set { key, slot, .. } => format!("set {key} {slot}"),
            })
            .collect()
    }

    #[test]
    fn test_delete_then_move() {
        let ops = reconcile(&rows(&["a", "b", "c"]), &rows(&["c", "a"]));
        assert_eq!(describe(&ops), vec!["del b", "mov 1 0"]);
    }

    #[test]
    fn test_append() {
        let ops = reconcile(&rows(&["a"]), &rows(&["a", "b"]));
        assert_eq!(describe(&ops), vec!["ins 1 b"]);
    }

    #[test]
    fn test_unchanged_list_is_empty() {
        assert!(reconcile(&rows(&["a", "b"]), &rows(&["a", "b"])).is_empty());
        assert!(reconcile(&[], &[]).is_empty());
    }

    #[test]
    fn test_changed_row_is_replaced() {
        let prev = rows(&["a", "b"]);
        let mut next = rows(&["a", "b"]);
        next[0].html = "<li>A!</li>".into();
        let ops = reconcile(&prev, &next);
        assert_eq!(describe(&ops), vec!["del a", "ins 0 a"]);
        assert!(!ops.iter().any(|op| matches!(op, ListOp::Set { .. })));
    }

    #[test]
    fn test_repeated_next_key_does_not_panic() {
        assert!(reconcile(&rows(&["a"]), &rows(&["a", "a"])).is_empty());
        let ops = reconcile(&rows(&["a", "b"]), &rows(&["b", "a", "b"]));
        assert_eq!(describe(&ops), vec!["mov 1 0", "mov 0 1"]);
    }

    #[test]
    fn test_reverse() {
        let ops = reconcile(&rows(&["a", "b", "c"]), &rows(&["c", "b", "a"]));
        assert_eq!(describe(&ops), vec!["mov 2 0", "mov 2 1"]);
    }

    fn key_order() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::btree_set(0u8..16, 0..10)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_shuffle()
    }

    proptest! {
        #[test]
        fn prop_ops_transform_prev_into_next(prev in key_order(), next in key_order()) {
            let prev: Vec<std::string::String> = prev.iter().map(|k| format!("k{k}")).collect();
            let next: Vec<std::string::String> = next.iter().map(|k| format!("k{k}")).collect();
            let prev_keys: Vec<&str> = prev.iter().map(|s| s.as_str()).collect();
            let next_keys: Vec<&str> = next.iter().map(|s| s.as_str()).collect();

            let ops = reconcile(&rows(&prev_keys), &rows(&next_keys));
            prop_assert_eq!(apply_keys(&prev_keys, &ops), next_keys);

            // deletions strictly precede inserts and moves
            let first_other = ops.iter().position(|op| !matches!(op, ListOp::Del { .. }));
            if let Some(first_other) = first_other {
                let no_del_after = ops[first_other..].iter().all(|op| !matches!(op, ListOp::Del { .. }));
                prop_assert!(no_del_after);
            }
        }
    }
}
