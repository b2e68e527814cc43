use mockall::mock;
use mockall::predicate::eq;
use proptest::prelude::*;
use std::collections::HashSet;

use sop_tree::app::App;
use sop_tree::config::Config;
use sop_tree::document::{Document, IconKind, NodeType, TreeNode};
use sop_tree::expand_state::ExpandState;
use sop_tree::render::{outline_lines, render, to_text, Indicator, LineKind, RenderedNode, Renderer};
use sop_tree::style::{style_for, AsciiIcons, IconProvider, DEFAULT_STYLE};

mock! {
    pub Icons {}
    impl IconProvider for Icons {
        fn glyph(&self, icon: IconKind) -> Option<&'static str>;
    }
}

fn phase_with_child() -> Vec<TreeNode> {
    vec![TreeNode::new("r", "Root", NodeType::Phase)
        .with_children(vec![TreeNode::new("a", "X", NodeType::Step)])]
}

fn visible_titles<'a>(nodes: &[RenderedNode<'a>]) -> Vec<&'a str> {
    fn walk<'a>(node: &RenderedNode<'a>, out: &mut Vec<&'a str>) {
        out.push(node.title);
        for child in &node.children {
            walk(child, out);
        }
    }
    let mut titles = Vec::new();
    for node in nodes {
        walk(node, &mut titles);
    }
    titles
}

#[test]
fn test_toggle_root_hides_and_restores_child() {
    let roots = phase_with_child();
    let mut state = ExpandState::with_expanded(["r"]);

    let rendered = render(&roots, &state, &AsciiIcons);
    assert_eq!(rendered[0].indicator, Some(Indicator::Expanded));
    assert_eq!(visible_titles(&rendered), ["Root", "X"]);

    state.toggle("r");
    let rendered = render(&roots, &state, &AsciiIcons);
    assert_eq!(rendered[0].indicator, Some(Indicator::Collapsed));
    assert!(rendered[0].children.is_empty());
    assert_eq!(visible_titles(&rendered), ["Root"]);

    state.toggle("r");
    let rendered = render(&roots, &state, &AsciiIcons);
    assert_eq!(visible_titles(&rendered), ["Root", "X"]);
}

#[test]
fn test_checklist_without_details() {
    let roots = vec![TreeNode::new("n", "Node", NodeType::Step).with_checklist(["A", "B"])];
    let rendered = render(&roots, &ExpandState::new(), &AsciiIcons);
    let lines = outline_lines(&rendered);

    let checks = lines
        .iter()
        .filter(|line| matches!(line.kind, LineKind::Checklist(_)))
        .count();
    let arrows = lines
        .iter()
        .filter(|line| matches!(line.kind, LineKind::Detail(_)))
        .count();
    assert_eq!(checks, 2);
    assert_eq!(arrows, 0);

    let text = to_text(&rendered);
    assert_eq!(text.matches('✓').count(), 2);
    assert_eq!(text.matches('→').count(), 0);
}

#[test]
fn test_details_render_before_checklist() {
    let roots = vec![TreeNode::new("n", "Node", NodeType::Info)
        .with_checklist(["c"])
        .with_details(["d1", "d2"])];
    let text = to_text(&render(&roots, &ExpandState::new(), &AsciiIcons));
    assert_eq!(text, "Node\n  → d1\n  → d2\n  ✓ c\n");
}

#[test]
fn test_bogus_type_uses_default_style() {
    let document = Document::from_json(r#"{"id":"b","title":"Odd","type":"bogus"}"#).unwrap();
    let rendered = render(&document.roots, &ExpandState::new(), &AsciiIcons);
    assert_eq!(rendered[0].node_type, NodeType::Plain);
    assert_eq!(rendered[0].style, DEFAULT_STYLE);
    assert_eq!(to_text(&rendered), "Odd\n");
}

#[test]
fn test_missing_type_uses_default_style() {
    let document = Document::from_json(r#"{"id":"b","title":"Untyped"}"#).unwrap();
    let rendered = render(&document.roots, &ExpandState::new(), &AsciiIcons);
    assert_eq!(rendered[0].style, DEFAULT_STYLE);
}

#[test]
fn test_typed_nodes_use_their_style() {
    for node_type in NodeType::ALL {
        let roots = vec![TreeNode::new("n", "N", node_type)];
        let rendered = render(&roots, &ExpandState::new(), &AsciiIcons);
        assert_eq!(rendered[0].style, style_for(node_type));
    }
}

#[test]
fn test_children_order_preserved() {
    let roots = vec![TreeNode::new("p", "P", NodeType::Phase).with_children(vec![
        TreeNode::new("a", "A", NodeType::Step),
        TreeNode::new("b", "B", NodeType::Step),
        TreeNode::new("c", "C", NodeType::Step),
    ])];
    let rendered = render(&roots, &ExpandState::with_expanded(["p"]), &AsciiIcons);
    let ids: Vec<&str> = rendered[0].children.iter().map(|child| child.id).collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[test]
fn test_reexpand_restores_descendant_state() {
    let roots = vec![TreeNode::new("p", "P", NodeType::Phase).with_children(vec![
        TreeNode::new("c", "C", NodeType::Step)
            .with_children(vec![TreeNode::new("g", "G", NodeType::Substep)]),
    ])];
    let mut state = ExpandState::with_expanded(["p", "c"]);
    let before = to_text(&render(&roots, &state, &AsciiIcons));

    state.toggle("p");
    assert_eq!(to_text(&render(&roots, &state, &AsciiIcons)), "▶ P\n");
    assert!(state.is_expanded("c"));

    state.toggle("p");
    assert_eq!(to_text(&render(&roots, &state, &AsciiIcons)), before);
}

#[test]
fn test_leaf_activation_leaves_state_alone() {
    let document = Document::from_roots(phase_with_child());
    let mut app = App::new(document, Config::default());
    let before = app.expand_state.clone();

    assert!(!app.activate("a"));
    assert!(!app.activate("nope"));
    assert_eq!(app.expand_state, before);
}

#[test]
fn test_icon_provider_queried_per_visible_icon() {
    let roots = vec![TreeNode::new("p", "P", NodeType::Phase)
        .with_icon(IconKind::Mail)
        .with_children(vec![
            TreeNode::new("a", "A", NodeType::Critical).with_icon(IconKind::Bell),
            TreeNode::new("b", "B", NodeType::Step),
        ])];

    let mut icons = MockIcons::new();
    icons
        .expect_glyph()
        .with(eq(IconKind::Mail))
        .times(1)
        .return_const(Some("M"));
    // Collapsed: the child's icon must never be requested
    icons.expect_glyph().with(eq(IconKind::Bell)).times(0);

    let rendered = Renderer::new(&icons).render(&roots, &ExpandState::new());
    assert_eq!(to_text(&rendered), "▶ M P\n");
}

#[test]
fn test_icon_provider_may_decline() {
    let roots = vec![TreeNode::new("a", "A", NodeType::Info).with_icon(IconKind::Upload)];

    let mut icons = MockIcons::new();
    icons.expect_glyph().times(1).return_const(None::<&'static str>);

    let rendered = Renderer::new(&icons).render(&roots, &ExpandState::new());
    assert_eq!(rendered[0].icon, None);
    assert_eq!(to_text(&rendered), "A\n");
}

/// Tree shape without content; ids are assigned in pre-order
#[derive(Debug, Clone)]
struct Shape(Vec<Shape>);

fn shape() -> impl Strategy<Value = Shape> {
    Just(Shape(Vec::new())).prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Shape)
    })
}

fn build(shapes: &[Shape], next: &mut usize) -> Vec<TreeNode> {
    shapes
        .iter()
        .map(|shape| {
            let id = format!("n{}", *next);
            *next += 1;
            let node = TreeNode::new(id.clone(), id.to_uppercase(), NodeType::Step)
                .with_details([format!("{} detail", id)]);
            if shape.0.is_empty() {
                node
            } else {
                node.with_children(build(&shape.0, next))
            }
        })
        .collect()
}

fn forest() -> impl Strategy<Value = Vec<TreeNode>> {
    prop::collection::vec(shape(), 1..4).prop_map(|shapes| {
        let mut next = 0;
        build(&shapes, &mut next)
    })
}

fn expand_set() -> impl Strategy<Value = ExpandState> {
    prop::collection::hash_set(0usize..64, 0..32)
        .prop_map(|indices| ExpandState::with_expanded(indices.into_iter().map(|i| format!("n{}", i))))
}

fn preorder_ids(nodes: &[TreeNode], out: &mut Vec<String>) {
    for node in nodes {
        out.push(node.id.clone());
        preorder_ids(node.children(), out);
    }
}

fn all_expanded(nodes: &[TreeNode]) -> ExpandState {
    let mut ids = Vec::new();
    preorder_ids(nodes, &mut ids);
    ExpandState::with_expanded(ids)
}

/// Every rendered node's children are present exactly when it is an expanded parent
fn check_visibility(nodes: &[RenderedNode<'_>], model: &[TreeNode], state: &ExpandState) {
    assert_eq!(nodes.len(), model.len());
    for (rendered, node) in nodes.iter().zip(model) {
        assert_eq!(rendered.id, node.id);
        let open = node.has_children() && state.is_expanded(&node.id);
        assert_eq!(rendered.is_activatable(), node.has_children());
        if open {
            check_visibility(&rendered.children, node.children(), state);
        } else {
            assert!(rendered.children.is_empty());
        }
    }
}

proptest! {
    #[test]
    fn prop_toggle_twice_is_identity(roots in forest(), state in expand_set(), pick in 0usize..64) {
        let id = format!("n{}", pick);
        let mut toggled = state.clone();
        toggled.toggle(&id);
        toggled.toggle(&id);

        prop_assert_eq!(toggled.is_expanded(&id), state.is_expanded(&id));
        prop_assert_eq!(
            to_text(&render(&roots, &toggled, &AsciiIcons)),
            to_text(&render(&roots, &state, &AsciiIcons))
        );
    }

    #[test]
    fn prop_toggle_touches_only_its_id(state in expand_set(), pick in 0usize..64, other in 0usize..64) {
        prop_assume!(pick != other);
        let other_id = format!("n{}", other);
        let mut toggled = state.clone();
        toggled.toggle(&format!("n{}", pick));
        prop_assert_eq!(toggled.is_expanded(&other_id), state.is_expanded(&other_id));
    }

    #[test]
    fn prop_render_is_pure(roots in forest(), state in expand_set()) {
        let first = render(&roots, &state, &AsciiIcons);
        let second = render(&roots, &state, &AsciiIcons);
        prop_assert_eq!(to_text(&first), to_text(&second));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_fully_expanded_preserves_preorder(roots in forest()) {
        let state = all_expanded(&roots);
        let rendered = render(&roots, &state, &AsciiIcons);

        let mut expected = Vec::new();
        preorder_ids(&roots, &mut expected);
        let mut visible = Vec::new();
        for node in &rendered {
            node.visible_ids(&mut visible);
        }
        prop_assert_eq!(visible, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn prop_collapsed_subtrees_are_absent(roots in forest(), state in expand_set()) {
        let rendered = render(&roots, &state, &AsciiIcons);
        check_visibility(&rendered, &roots, &state);
    }

    #[test]
    fn prop_indent_grows_with_depth(roots in forest()) {
        let state = all_expanded(&roots);
        let rendered = render(&roots, &state, &AsciiIcons);
        let mut seen = HashSet::new();
        for line in outline_lines(&rendered) {
            if line.is_header() {
                prop_assert!(seen.insert(line.node_id));
            }
        }
        fn walk(node: &RenderedNode<'_>) -> bool {
            node.children
                .iter()
                .all(|child| child.indent > node.indent && child.depth == node.depth + 1 && walk(child))
        }
        prop_assert!(rendered.iter().all(|root| root.depth == 0 && root.indent == 0 && walk(root)));
    }
}
