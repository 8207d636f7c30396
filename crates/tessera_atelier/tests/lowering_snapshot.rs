//! Lowering snapshot tests.
//!
//! Each test lowers a small view and checks the SSR markup together with
//! the side tables a client uses to address slots.

use tessera_atelier::{lower, Lowered, LowerOptions, Slot};
use tessera_relief::{Element, Node, RawNode};

fn lower_view(node: &Node) -> Lowered {
    lower(node, &LowerOptions::default()).unwrap()
}

fn paths_of(lowered: &Lowered) -> Vec<std::string::String> {
    lowered
        .bindings
        .slot_paths
        .iter()
        .map(|s| format!("{}@{} {}", s.slot, s.child_index, s.path))
        .collect()
}

// =============================================================================
// Markup
// =============================================================================

mod markup {
    use super::*;

    #[test]
    fn fragments_are_transparent() {
        let node: Node = Element::new("div")
            .child(Node::fragment([
                Element::new("span").child(Node::text("a")).into(),
                Node::mutable_text("b"),
            ]))
            .child(Element::new("i"))
            .into();
        let lowered = lower_view(&node);
        insta::assert_snapshot!(lowered.rendered.to_html(), @r#"<div data-tessera-slots="0@1"><span>a</span>b<i></i></div>"#);
        assert_eq!(paths_of(&lowered), vec!["0@1 r0"]);
    }

    #[test]
    fn static_and_mutable_attributes_split() {
        let node: Node = Element::new("a")
            .attr("href", "/home")
            .mutable_attr("aria-current", "page")
            .class("link")
            .style("color", "red")
            .into();
        let lowered = lower_view(&node);
        assert_eq!(
            lowered.rendered.statics[0],
            r#"<a href="/home" class="link" style="color: red;" data-tessera-slots="0@-1""#
        );
        let attrs = lowered.rendered.dynamics[0].attrs().unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs["aria-current"], "page");
    }

    #[test]
    fn statics_and_dynamics_interleave() {
        let node: Node = Element::new("ul")
            .children((0..3).map(|i| {
                Element::new("li")
                    .child(Node::mutable_text(format!("item {i}")))
                    .into()
            }))
            .into();
        let lowered = lower_view(&node);
        assert!(lowered.rendered.is_well_formed());
        assert_eq!(lowered.rendered.dynamics.len(), 3);
        assert!(lowered
            .rendered
            .dynamics
            .iter()
            .all(|slot| matches!(slot, Slot::Text(_))));
        assert_eq!(
            paths_of(&lowered),
            vec!["0@0 r0/d0", "1@0 r0/d1", "2@0 r0/d2"]
        );
    }
}

// =============================================================================
// Components
// =============================================================================

mod components {
    use super::*;

    #[test]
    fn nested_component_paths_are_scope_relative() {
        let node = Node::component(
            "page",
            Element::new("main")
                .child(Element::new("h1").child(Node::text("Title")))
                .child(Node::component(
                    "card",
                    Element::new("section").child(Node::mutable_text("body")),
                )),
        );
        let lowered = lower_view(&node);

        let card = &lowered.bindings.component_paths[0];
        assert_eq!(card.component_id, "card");
        assert_eq!(card.parent_id.as_deref(), Some("page"));
        assert_eq!(card.parent_path.to_string(), "r0");
        assert_eq!(card.first_child.as_ref().unwrap().to_string(), "r0/d1");
        assert_eq!(card.last_child.as_ref().unwrap().to_string(), "r0/d1");

        let page = &lowered.bindings.component_paths[1];
        assert_eq!(page.component_id, "page");
        assert!(page.at_root);

        assert_eq!(paths_of(&lowered), vec!["0@0 r0/d1"]);
        assert_eq!(lowered.bindings.slot_paths[0].component_id, "card");
    }

    #[test]
    fn list_at_component_root_is_marked_at_root() {
        let node = Node::component(
            "todos",
            Node::fragment([
                Element::new("li").key("1").child(Node::text("one")).into(),
                Element::new("li").key("2").child(Node::text("two")).into(),
            ]),
        );
        let lowered = lower_view(&node);
        let list = &lowered.bindings.list_paths[0];
        assert!(list.at_root);
        assert!(list.path.is_none());
        assert_eq!(list.component_id, "todos");
        insta::assert_snapshot!(lowered.rendered.to_html(), @"<li>one</li><li>two</li>");
    }

    #[test]
    fn keyed_components_use_child_keys() {
        let row = |key: &str| -> Node {
            Node::component("row", Element::new("tr").key(key).child(Node::mutable_text(key)))
        };
        let node: Node = Element::new("tbody").children([row("x"), row("y")]).into();
        let lowered = lower_view(&node);
        let Slot::List(rows) = &lowered.rendered.dynamics[0] else {
            panic!("expected a list slot");
        };
        let keys: Vec<_> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["x", "y"]);
        assert_eq!(rows[0].bindings.component_paths[0].component_id, "row");
        assert_eq!(rows[1].render.dynamics, vec![Slot::Text("y".into())]);
    }

    #[test]
    fn duplicate_component_ids_keep_last_span() {
        let node: Node = Element::new("div")
            .child(Node::component("c", Element::new("b").mutable_attr("x", "1")))
            .child(Node::component("c", Element::new("i").mutable_attr("y", "2")))
            .into();
        let lowered = lower_view(&node);
        let span = lowered.component_spans["c"];
        assert_eq!((span.dynamics_start, span.dynamics_end), (1, 2));
    }
}

// =============================================================================
// Raw input
// =============================================================================

mod raw {
    use super::*;

    #[test]
    fn lowers_json_tree() {
        let raw: RawNode = serde_json::from_str(
            r#"{
                "component": "greeting",
                "child": {
                    "tag": "p",
                    "mutableAttrs": {"title": "hi"},
                    "handlers": {"click": "h1"},
                    "children": [{"text": "Hello, "}, {"text": "Ada", "mutable": true}]
                }
            }"#,
        )
        .unwrap();
        let node = raw.into_node().unwrap();
        let lowered = lower_view(&node);
        insta::assert_snapshot!(lowered.rendered.to_html(), @r#"<p data-tessera-slots="0@-1 1@-1" data-tessera-on-click="h1" title="hi">Hello, Ada</p>"#);
        assert_eq!(lowered.bindings.handlers[0].event, "click");
    }
}
