//! Slot-wise diffing of structured renders.

use tessera_atelier::{AttrMap, Rendered, Slot};

use crate::config::DiffConfig;
use crate::errors::TemplateMismatch;
use crate::ops::Op;
use crate::reconcile::reconcile;

/// Compute the patch turning `prev` into `next`.
///
/// Both renders are expected to come from the same template. A statics or
/// slot-count mismatch yields no patch at all; a slot whose kind changed is
/// skipped while the remaining slots are still compared. Either case goes
/// through [`DiffConfig::handle_mismatch`], which panics in strict mode.
pub fn diff(prev: &Rendered, next: &Rendered, config: &DiffConfig) -> Vec<Op> {
    if let Err(mismatch) = check_compatible(prev, next) {
        config.handle_mismatch(&mismatch);
        return Vec::new();
    }

    let mut ops = Vec::new();
    for (slot, (before, after)) in prev.dynamics.iter().zip(&next.dynamics).enumerate() {
        match (before, after) {
            (Slot::Text(before), Slot::Text(after)) => {
                if before != after {
                    ops.push(Op::SetText {
                        slot,
                        text: after.clone(),
                    });
                }
            }
            (Slot::Attrs(before), Slot::Attrs(after)) => {
                if let Some(op) = diff_attrs(slot, before.as_ref(), after.as_ref()) {
                    ops.push(op);
                }
            }
            (Slot::List(before), Slot::List(after)) => {
                let child_ops = reconcile(before, after);
                if !child_ops.is_empty() {
                    ops.push(Op::List {
                        slot,
                        ops: child_ops,
                    });
                }
            }
            _ => config.handle_mismatch(&TemplateMismatch::SlotKind {
                slot,
                prev: before.kind(),
                next: after.kind(),
            }),
        }
    }

    tracing::debug!(slots = next.dynamics.len(), ops = ops.len(), "diffed renders");
    ops
}

/// Check that two renders share statics and slot count.
pub fn check_compatible(prev: &Rendered, next: &Rendered) -> Result<(), TemplateMismatch> {
    if prev.statics.len() != next.statics.len() {
        return Err(TemplateMismatch::StaticsLength {
            prev: prev.statics.len(),
            next: next.statics.len(),
        });
    }
    if let Some(index) = prev
        .statics
        .iter()
        .zip(&next.statics)
        .position(|(a, b)| a != b)
    {
        return Err(TemplateMismatch::StaticsDiffer { index });
    }
    if prev.dynamics.len() != next.dynamics.len() {
        return Err(TemplateMismatch::DynamicsLength {
            prev: prev.dynamics.len(),
            next: next.dynamics.len(),
        });
    }
    Ok(())
}

/// Upsert changed or added attributes, remove dropped ones. A missing map
/// is the same as an empty one.
fn diff_attrs(slot: usize, before: Option<&AttrMap>, after: Option<&AttrMap>) -> Option<Op> {
    let empty = AttrMap::new();
    let before = before.unwrap_or(&empty);
    let after = after.unwrap_or(&empty);

    let upsert: AttrMap = after
        .iter()
        .filter(|(name, value)| before.get(*name) != Some(*value))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    let remove: Vec<_> = before
        .keys()
        .filter(|name| !after.contains_key(*name))
        .cloned()
        .collect();

    if upsert.is_empty() && remove.is_empty() {
        return None;
    }
    Some(Op::SetAttrs {
        slot,
        upsert,
        remove,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tessera_atelier::Row;

    fn single(slot: Slot) -> Rendered {
        Rendered::new(vec!["<p>".into(), "</p>".into()], vec![slot])
    }

    fn attrs(pairs: &[(&str, &str)]) -> Slot {
        Slot::Attrs(Some(
            pairs.iter().map(|(k, v)| ((*k).into(), (*v).into())).collect(),
        ))
    }

    fn list(keys: &[&str]) -> Slot {
        Slot::List(
            keys.iter()
                .map(|k| Row::markup(*k, format!("<li>{k}</li>")))
                .collect(),
        )
    }

    #[test]
    fn test_text_change() {
        let ops = diff(
            &single(Slot::Text("A".into())),
            &single(Slot::Text("B".into())),
            &DiffConfig::lenient(),
        );
        assert_eq!(
            ops,
            vec![Op::SetText {
                slot: 0,
                text: "B".into()
            }]
        );
    }

    #[test]
    fn test_attrs_upsert_and_remove() {
        let ops = diff(
            &single(attrs(&[("class", "x"), ("data-old", "remove")])),
            &single(attrs(&[("class", "y"), ("title", "new")])),
            &DiffConfig::lenient(),
        );
        let [Op::SetAttrs {
            slot,
            upsert,
            remove,
        }] = ops.as_slice()
        else {
            panic!("expected one SetAttrs op, got {ops:?}");
        };
        assert_eq!(*slot, 0);
        assert_eq!(upsert.len(), 2);
        assert_eq!(upsert["class"], "y");
        assert_eq!(upsert["title"], "new");
        assert_eq!(remove, &vec![tessera_carton::String::from("data-old")]);
    }

    #[test]
    fn test_nil_and_empty_attrs_are_equivalent() {
        let config = DiffConfig::lenient();
        assert!(diff(&single(Slot::Attrs(None)), &single(attrs(&[])), &config).is_empty());
        assert!(diff(&single(attrs(&[])), &single(Slot::Attrs(None)), &config).is_empty());
    }

    #[test]
    fn test_list_regression_anchor() {
        let ops = diff(
            &single(list(&["a", "b", "c"])),
            &single(list(&["c", "a"])),
            &DiffConfig::lenient(),
        );
        insta::assert_snapshot!(crate::to_wire_string(&ops).unwrap(), @r#"[["list",0,["del","b"],["mov",1,0]]]"#);
    }

    #[test]
    fn test_list_append() {
        let ops = diff(
            &single(list(&["a"])),
            &single(list(&["a", "b"])),
            &DiffConfig::lenient(),
        );
        insta::assert_snapshot!(crate::to_wire_string(&ops).unwrap(), @r#"[["list",0,["ins",1,{"key":"b","html":"<li>b</li>"}]]]"#);
    }

    #[test]
    fn test_repeated_row_keys_do_not_panic() {
        let ops = diff(
            &single(list(&["a"])),
            &single(list(&["a", "a"])),
            &DiffConfig::lenient(),
        );
        assert!(ops.is_empty());
    }

    #[test]
    fn test_kind_mismatch_lenient_invokes_callback_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let config = DiffConfig::lenient().with_callback(move |mismatch| {
            assert!(matches!(mismatch, TemplateMismatch::SlotKind { slot: 0, .. }));
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let ops = diff(
            &single(Slot::Text("A".into())),
            &single(attrs(&[("a", "b")])),
            &config,
        );
        assert!(ops.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[should_panic(expected = "template mismatch")]
    fn test_kind_mismatch_strict_panics() {
        diff(
            &single(Slot::Text("A".into())),
            &single(attrs(&[])),
            &DiffConfig::strict(),
        );
    }

    #[test]
    fn test_kind_mismatch_skips_only_that_slot() {
        let prev = Rendered::new(
            vec!["<p>".into(), "".into(), "</p>".into()],
            vec![Slot::Text("A".into()), Slot::Text("x".into())],
        );
        let next = Rendered::new(
            vec!["<p>".into(), "".into(), "</p>".into()],
            vec![Slot::Attrs(None), Slot::Text("y".into())],
        );
        let ops = diff(&prev, &next, &DiffConfig::lenient());
        assert_eq!(
            ops,
            vec![Op::SetText {
                slot: 1,
                text: "y".into()
            }]
        );
    }

    #[test]
    fn test_statics_mismatch_yields_no_patch() {
        let prev = single(Slot::Text("A".into()));
        let next = Rendered::new(
            vec!["<b>".into(), "</b>".into()],
            vec![Slot::Text("B".into())],
        );
        assert_eq!(
            check_compatible(&prev, &next),
            Err(TemplateMismatch::StaticsDiffer { index: 0 })
        );
        assert!(diff(&prev, &next, &DiffConfig::lenient()).is_empty());

        let shorter = Rendered::default();
        assert_eq!(
            check_compatible(&prev, &shorter),
            Err(TemplateMismatch::StaticsLength { prev: 2, next: 1 })
        );
    }
}
