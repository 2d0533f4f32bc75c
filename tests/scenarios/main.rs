use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use graph_visualiser::engine::ScreenPoint;
use graph_visualiser::engine::recording::RecordingEngine;
use graph_visualiser::input::PointerPayload;
use graph_visualiser::input::pin::{ManualClock, PinOutcome};
use graph_visualiser::registries::atomic::ThemeRegistry;
use graph_visualiser::{
    EventKind, NetworkEvent, NodeId, NodeSpec, PropertyValue, VERSION, Visualiser,
    VisualiserConfig, VisualiserError,
};
use proptest::prelude::*;
use rstest::rstest;

fn harness() -> (Visualiser<RecordingEngine>, ManualClock) {
    let clock = ManualClock::new();
    let vis = Visualiser::with_parts(
        RecordingEngine::new(),
        VisualiserConfig::default(),
        Box::new(ThemeRegistry::default()),
        Box::new(clock.clone()),
    );
    (vis, clock)
}

fn id(raw: &str) -> NodeId {
    NodeId::from(raw)
}

fn person(raw: &str) -> NodeSpec {
    NodeSpec::new(raw, "person", "entity", raw)
}

fn pinned(vis: &Visualiser<RecordingEngine>) -> Vec<String> {
    let mut ids: Vec<String> = vis
        .store()
        .nodes()
        .filter(|node| node.pinned)
        .map(|node| node.id.to_string())
        .collect();
    ids.sort();
    ids
}

#[test]
fn scenarios_binary_smoke_runs() {
    assert!(!VERSION.is_empty());
}

#[test]
fn repeated_add_node_keeps_single_entry() {
    let (mut vis, _) = harness();
    vis.render("graph".to_string()).unwrap();
    assert!(vis.add_node(person("a")));
    assert!(!vis.add_node(NodeSpec::new("a", "company", "entity", "other")));

    assert_eq!(vis.store().node_count(), 1);
    assert_eq!(vis.node_type(&id("a")), Some("person"));
    assert_eq!(vis.engine().nodes.len(), 1);
}

#[test]
fn edges_are_deduplicated_in_both_directions() {
    let (mut vis, _) = harness();
    vis.add_node(person("a"));
    vis.add_node(person("b"));

    assert!(vis.add_edge(&id("a"), &id("b"), "knows").is_some());
    assert!(vis.add_edge(&id("b"), &id("a"), "knows").is_none());
    assert!(vis.add_edge(&id("a"), &id("b"), "likes").is_none());
    assert!(vis.add_edge(&id("a"), &id("ghost"), "knows").is_none());
    assert_eq!(vis.store().edge_count(), 1);
}

#[test]
fn delete_node_cascades_to_engine() {
    let (mut vis, _) = harness();
    vis.render("graph".to_string()).unwrap();
    for raw in ["a", "b", "c"] {
        vis.add_node(person(raw));
    }
    vis.add_edge(&id("a"), &id("b"), "knows");
    vis.add_edge(&id("c"), &id("a"), "knows");
    vis.add_edge(&id("b"), &id("c"), "knows");

    assert!(vis.delete_node(&id("a")));
    assert!(!vis.delete_node(&id("a")));

    assert!(!vis.node_exists(&id("a")));
    assert_eq!(vis.store().edge_count(), 1);
    let engine = vis.engine();
    assert_eq!(engine.nodes.len(), 2);
    assert_eq!(engine.edges.len(), 1);
    assert!(
        engine
            .edges
            .values()
            .all(|edge| edge.from != id("a") && edge.to != id("a"))
    );
}

#[test]
fn display_properties_relabel_existing_nodes() {
    let (mut vis, _) = harness();
    vis.render("graph".to_string()).unwrap();
    vis.add_node(
        person("p1")
            .property("name", PropertyValue::text("Ann"))
            .property("age", PropertyValue::text("30")),
    );
    assert_eq!(vis.node_label(&id("p1")), Some("p1"));

    vis.set_display_properties("person", vec!["name".into(), "age".into()]);
    assert_eq!(vis.node_label(&id("p1")), Some("name: Ann\nage: 30"));
    assert_eq!(vis.engine().nodes[&id("p1")].label, "name: Ann\nage: 30");

    vis.set_display_properties("person", Vec::new());
    assert_eq!(vis.node_label(&id("p1")), Some("p1"));
    assert_eq!(vis.all_property_names(&id("p1")), vec!["age", "name"]);
}

#[rstest]
#[case(45, format!("bio: {}...", "x".repeat(40)))]
#[case(40, format!("bio: {}", "x".repeat(40)))]
fn long_values_truncate_past_forty_characters(#[case] len: usize, #[case] expected: String) {
    let (mut vis, _) = harness();
    vis.set_display_properties("person", vec!["bio".into()]);
    vis.add_node(person("p").property("bio", PropertyValue::text("x".repeat(len))));
    assert_eq!(vis.node_label(&id("p")), Some(expected.as_str()));
}

#[test]
fn marquee_selects_inclusive_and_direction_free() {
    let (mut vis, _) = harness();
    vis.render("graph".to_string()).unwrap();
    for (raw, x, y) in [("in", 75.0, 75.0), ("corner", 100.0, 100.0), ("out", 101.0, 75.0)] {
        vis.add_node(person(raw));
        vis.engine_mut().place(raw, x, y);
    }

    vis.start_rectangle(100.0, 100.0);
    vis.update_rectangle(50.0, 50.0);
    let backward = vis.reset_rectangle();

    vis.start_rectangle(50.0, 50.0);
    vis.update_rectangle(100.0, 100.0);
    let forward = vis.reset_rectangle();

    assert_eq!(backward, forward);
    assert_eq!(forward, vec![id("in"), id("corner")]);
    assert_eq!(vis.engine().last_selection(), Some(forward.as_slice()));
    assert!(!vis.selection().is_dragging());
}

#[test]
fn update_without_start_is_ignored() {
    let (mut vis, _) = harness();
    vis.render("graph".to_string()).unwrap();
    vis.update_rectangle(10.0, 10.0);
    assert_eq!(vis.engine().redraws, 0);
}

#[test]
fn reset_without_start_keeps_engine_selection() {
    let (mut vis, _) = harness();
    vis.render("graph".to_string()).unwrap();
    vis.add_node(person("origin"));
    vis.engine_mut().place("origin", 0.0, 0.0);

    assert!(vis.reset_rectangle().is_empty());
    assert!(vis.engine().selections.is_empty());
}

#[rstest]
#[case(50, PinOutcome::Debounced)]
#[case(99, PinOutcome::Debounced)]
#[case(100, PinOutcome::Pinned(1))]
#[case(150, PinOutcome::Pinned(1))]
fn pin_batches_are_debounced(#[case] gap_ms: u64, #[case] expected: PinOutcome) {
    let (mut vis, clock) = harness();
    vis.render("graph".to_string()).unwrap();
    vis.add_node(person("a"));
    vis.add_node(person("b"));

    assert_eq!(vis.fix_nodes(Some(&[id("a")])), PinOutcome::Pinned(1));
    clock.advance(Duration::from_millis(gap_ms));
    assert_eq!(vis.fix_nodes(Some(&[id("b")])), expected);
}

#[test]
fn release_unpins_immediately() {
    let (mut vis, _) = harness();
    vis.render("graph".to_string()).unwrap();
    vis.add_node(person("a"));
    vis.add_node(person("b"));
    vis.fix_nodes(None);
    assert_eq!(pinned(&vis), vec!["a", "b"]);

    assert_eq!(vis.release_nodes(&[id("a"), id("ghost")]), 1);
    assert_eq!(pinned(&vis), vec!["b"]);
    assert!(!vis.engine().nodes[&id("a")].fixed.x);
}

#[test]
fn drag_cycle_pins_dropped_node() {
    let (mut vis, clock) = harness();
    vis.render("graph".to_string()).unwrap();
    vis.add_node(person("a"));
    vis.add_node(person("b"));

    vis.handle_event(NetworkEvent::DragStart(PointerPayload::on_nodes(
        vec![id("a")],
        ScreenPoint::new(1.0, 1.0),
    )));
    vis.handle_event(NetworkEvent::Stabilized { iterations: 12 });
    assert!(pinned(&vis).is_empty());

    clock.advance(Duration::from_millis(200));
    vis.handle_event(NetworkEvent::DragEnd(PointerPayload::on_nodes(
        vec![id("a")],
        ScreenPoint::new(30.0, 30.0),
    )));
    assert_eq!(pinned(&vis), vec!["a"]);

    clock.advance(Duration::from_millis(200));
    vis.handle_event(NetworkEvent::Stabilized { iterations: 3 });
    assert_eq!(pinned(&vis), vec!["a", "b"]);
}

#[test]
fn host_callbacks_see_their_events() {
    let (mut vis, _) = harness();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    vis.set_callback_on_event(EventKind::Click, move |event| {
        if let NetworkEvent::Click(payload) = event {
            sink.borrow_mut().push(payload.nodes.clone());
        }
    });
    vis.render("graph".to_string()).unwrap();

    vis.handle_event(NetworkEvent::Click(PointerPayload::on_nodes(
        vec![id("a")],
        ScreenPoint::new(0.0, 0.0),
    )));
    vis.handle_event(NetworkEvent::HoverNode { node: id("a") });
    assert_eq!(*log.borrow(), vec![vec![id("a")]]);
    assert!(vis.engine().subscriptions.contains(&EventKind::Click));

    vis.set_callback_on_event(EventKind::HoverNode, |_| {});
    assert!(vis.engine().subscriptions.contains(&EventKind::HoverNode));
}

#[test]
fn clear_then_rebuild() {
    let (mut vis, _) = harness();
    vis.render("graph".to_string()).unwrap();
    vis.add_node(person("a"));
    vis.add_node(person("b"));
    vis.add_edge(&id("a"), &id("b"), "knows");

    vis.clear_graph();
    assert_eq!(vis.store().node_count(), 0);
    assert_eq!(vis.store().edge_count(), 0);
    assert!(vis.engine().nodes.is_empty());

    vis.add_node(person("a"));
    assert_eq!(vis.engine().nodes.len(), 1);
}

#[test]
fn render_lifecycle() {
    let (mut vis, _) = harness();
    vis.add_node(person("early"));
    vis.render("graph".to_string()).unwrap();
    assert_eq!(vis.engine().nodes.len(), 1);
    assert!(vis.engine().applied.is_empty());
    assert_eq!(
        vis.render("graph".to_string()),
        Err(VisualiserError::AlreadyRendered)
    );

    assert!(vis.fit_to_window_once());
    assert!(!vis.fit_to_window_once());
    assert_eq!(vis.engine().fits, 1);
}

#[test]
fn toml_config_drives_pinning_and_labels() {
    let config = VisualiserConfig::from_toml_str(
        r#"
        [pinning]
        interval_ms = 10

        [labels]
        value_limit = 2
        "#,
    )
    .unwrap();
    let clock = ManualClock::new();
    let mut vis = Visualiser::with_parts(
        RecordingEngine::new(),
        config,
        Box::new(ThemeRegistry::default()),
        Box::new(clock.clone()),
    );
    vis.set_display_properties("person", vec!["name".into()]);
    vis.add_node(person("a").property("name", PropertyValue::text("Ann")));
    assert_eq!(vis.node_label(&id("a")), Some("name: An..."));

    vis.fix_nodes(None);
    clock.advance(Duration::from_millis(10));
    assert_eq!(vis.fix_nodes(None), PinOutcome::Pinned(1));
}

proptest! {
    #[test]
    fn node_count_matches_distinct_ids(raw in proptest::collection::vec(0i64..20, 0..40)) {
        let (mut vis, _) = harness();
        for n in &raw {
            vis.add_node(NodeSpec::new(*n, "thing", "entity", n.to_string()));
        }
        let mut distinct = raw.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(vis.store().node_count(), distinct.len());
    }
}
