//! Sequential and concurrent analysis must agree on every tree.

use proptest::prelude::*;
use tessera_croquis::{analyze, analyze_sequential, AnalyzerOptions};
use tessera_relief::{Element, Node};

fn leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        "[a-z]{0,3}".prop_map(|s| Node::text(s)),
        "[a-z]{1,3}".prop_map(|s| Node::mutable_text(s)),
        (any::<bool>(), any::<bool>()).prop_map(|(handler, mutable)| {
            let mut el = Element::new("span");
            if handler {
                el = el.on("click", "h1");
            }
            if mutable {
                el = el.mutable_attr("title", "t");
            }
            el.into()
        }),
    ]
}

fn tree() -> impl Strategy<Value = Node> {
    leaf().prop_recursive(4, 48, 8, |inner| {
        prop_oneof![
            (
                prop::collection::vec((inner.clone(), prop::option::of(0u8..6)), 0..8),
                any::<bool>()
            )
                .prop_map(|(children, dynamic)| {
                    let mut el = Element::new("div");
                    if dynamic {
                        el = el.mutable_class("on");
                    }
                    el.children(children.into_iter().map(|(child, key)| match (child, key) {
                        (Node::Element(child), Some(key)) => child.key(format!("k{key}")).into(),
                        (child, _) => child,
                    }))
                    .into()
                }),
            prop::collection::vec(inner.clone(), 0..6).prop_map(|c| Node::fragment(c)),
            ("[a-c]", inner).prop_map(|(id, child)| Node::component(id, child)),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn concurrent_analysis_matches_sequential(
        node in tree(),
        threshold in 1usize..5,
        workers in 1usize..4,
    ) {
        let sequential = analyze_sequential(&node);
        let options = AnalyzerOptions {
            concurrency_threshold: Some(threshold),
            workers: Some(workers),
        };
        let concurrent = analyze(&node, &options).unwrap();
        prop_assert_eq!(concurrent, sequential);
    }
}
