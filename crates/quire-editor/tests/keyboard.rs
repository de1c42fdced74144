//! Integration tests: keyboard shortcuts routed through the editor.
//!
//! Covers directional focus, keyboard divider snapping (including the
//! boundary fallback), directional merges and page shortcuts.

use quire_core::snap::SnapKind;
use quire_core::{ChildSlot, Direction, EngineConfig, NodeId, Orientation, Viewport};
use quire_editor::{Editor, EditorEvent, InputEvent, Modifiers};
use std::cell::RefCell;
use std::rc::Rc;

const MAGAZINE: &str = include_str!("fixtures/magazine.json");

const VIEWPORT: Viewport = Viewport {
    width: 1008.0,
    height: 508.0,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn id(s: &str) -> NodeId {
    NodeId::intern(s)
}

fn key(ed: &mut Editor, name: &str, modifiers: Modifiers) -> bool {
    ed.handle_input(&InputEvent::key(name, modifiers))
}

fn record(ed: &mut Editor) -> Rc<RefCell<Vec<EditorEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    ed.subscribe(move |e| sink.borrow_mut().push(*e));
    log
}

fn last_snap(events: &RefCell<Vec<EditorEvent>>) -> Option<(SnapKind, f32)> {
    events.borrow().iter().rev().find_map(|e| match e {
        EditorEvent::SnapEngaged { kind, percent } => Some((*kind, *percent)),
        _ => None,
    })
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

fn size(ed: &Editor, node: NodeId) -> f32 {
    ed.active_tree().get_by_id(node).unwrap().size
}

/// `[a | b]` with `a` focused.
fn two_pane() -> (Editor, NodeId, NodeId, NodeId) {
    init_logger();
    let mut ed = Editor::new(EngineConfig::default(), VIEWPORT);
    let root = ed.active_tree().root_id();
    let (a, b) = ed
        .split_at(root, Orientation::Vertical, ChildSlot::First)
        .unwrap();
    (ed, root, a, b)
}

/// Drag the two-pane divider (centre x = 504) to `x` without snapping.
fn drag_root_divider_to(ed: &mut Editor, x: f32) {
    assert!(ed.handle_input(&InputEvent::PointerDown {
        x: 504.0,
        y: 250.0,
        modifiers: Modifiers::NONE,
    }));
    ed.handle_input(&InputEvent::PointerMove {
        x,
        y: 250.0,
        modifiers: Modifiers::NONE,
    });
    assert!(ed.end_drag());
}

/// The magazine fixture with its first page active.
fn magazine() -> Editor {
    init_logger();
    let mut ed = Editor::new(
        EngineConfig::default(),
        Viewport {
            width: 808.0,
            height: 1008.0,
        },
    );
    ed.load_json(MAGAZINE).unwrap();
    assert!(key(&mut ed, "PageUp", Modifiers::NONE));
    ed
}

// ─── Focus ───────────────────────────────────────────────────────────────

#[test]
fn arrows_walk_between_leaves() {
    let mut ed = magazine();
    assert_eq!(ed.focused(), None);

    // Nothing focused: the first leaf is picked.
    assert!(key(&mut ed, "ArrowRight", Modifiers::NONE));
    assert_eq!(ed.focused(), Some(id("n2")));

    // The lower right pane is closer on the cross axis.
    key(&mut ed, "ArrowRight", Modifiers::NONE);
    assert_eq!(ed.focused(), Some(id("n5")));
    key(&mut ed, "ArrowUp", Modifiers::NONE);
    assert_eq!(ed.focused(), Some(id("n4")));
    key(&mut ed, "ArrowLeft", Modifiers::NONE);
    assert_eq!(ed.focused(), Some(id("n2")));

    assert!(!key(&mut ed, "ArrowLeft", Modifiers::NONE));
    assert_eq!(ed.focused(), Some(id("n2")));

    assert!(key(&mut ed, "Escape", Modifiers::NONE));
    assert_eq!(ed.focused(), None);
    assert!(!key(&mut ed, "v", Modifiers::NONE));
}

// ─── Keyboard snapping ───────────────────────────────────────────────────

#[test]
fn shift_arrow_steps_through_subdivisions() {
    let (mut ed, root, a, b) = two_pane();
    let events = record(&mut ed);

    assert!(key(&mut ed, "ArrowRight", Modifiers::SHIFT));
    assert_eq!(last_snap(&events), Some((SnapKind::Subdivision, 62.5)));
    assert!(approx(size(&ed, a), 62.5));
    assert!(approx(size(&ed, b), 37.5));
    assert_eq!(ed.focused(), Some(a));

    // `a` cannot grow leftward: it is the first child.
    assert!(!key(&mut ed, "ArrowLeft", Modifiers::SHIFT));

    // Only the wider gap behind the divider is subdivided now, so nothing
    // lies ahead and the boundary takes over.
    assert!(key(&mut ed, "ArrowRight", Modifiers::SHIFT));
    assert_eq!(last_snap(&events), Some((SnapKind::Boundary, 99.0)));
    assert!(ed.active_tree().get_by_id(b).is_none());
    assert!(ed.active_tree().get_by_id(root).unwrap().is_leaf());
    assert_eq!(ed.focused(), Some(root));
}

#[test]
fn snap_ignores_subdivisions_of_the_narrow_gap() {
    let (mut ed, root, a, b) = two_pane();
    // Divider at 70%: the 30% gap ahead is the narrower one.
    drag_root_divider_to(&mut ed, 704.0);
    assert!(approx(size(&ed, a), 70.0));
    let events = record(&mut ed);

    assert!(ed.snap_divider(a, Direction::Right));
    assert_eq!(last_snap(&events), Some((SnapKind::Boundary, 99.0)));
    assert!(ed.active_tree().get_by_id(b).is_none());
    assert!(ed.active_tree().get_by_id(root).unwrap().is_leaf());
}

#[test]
fn snap_back_uses_subdivisions_of_the_wide_gap() {
    let (mut ed, _, a, b) = two_pane();
    drag_root_divider_to(&mut ed, 704.0);
    let events = record(&mut ed);

    // Behind 70%: grid 50 and subdivisions 35, 17.5, 52.5.
    assert!(ed.focus(b));
    assert!(key(&mut ed, "ArrowLeft", Modifiers::SHIFT));
    let (kind, percent) = last_snap(&events).unwrap();
    assert_eq!(kind, SnapKind::Subdivision);
    assert!(approx(percent, 52.5), "{percent}");
    assert!(approx(size(&ed, a), 52.5));
}

// ─── Merges ──────────────────────────────────────────────────────────────

#[test]
fn command_arrow_merges_toward_neighbor() {
    let mut ed = magazine();
    assert!(ed.focus(id("n5")));
    assert!(key(&mut ed, "ArrowLeft", Modifiers::CTRL));

    let tree = ed.active_tree();
    assert!(tree.get_by_id(id("n2")).is_none());
    assert_eq!(
        tree.get_by_id(id("n1")).unwrap().orientation(),
        Some(Orientation::Horizontal)
    );
    assert_eq!(ed.focused(), Some(id("n5")));
}

#[test]
fn alt_click_on_divider_partially_consumes_neighbor() {
    init_logger();
    let json = r#"{
        "pages": [{ "id": "page-0", "root": {
            "id": "n1", "splitState": "split", "orientation": "vertical", "size": "100%",
            "children": [
                { "id": "n2", "splitState": "unsplit", "size": "40%" },
                { "id": "n3", "splitState": "split", "orientation": "vertical", "size": "60%",
                  "children": [
                    { "id": "n4", "splitState": "unsplit", "size": "30%" },
                    { "id": "n5", "splitState": "unsplit", "size": "70%" }
                  ] }
            ]
        }}],
        "currentPageIndex": 0,
        "idCounter": 6
    }"#;
    let mut ed = Editor::new(EngineConfig::default(), VIEWPORT);
    ed.load_json(json).unwrap();
    assert!(ed.focus(id("n2")));

    // Root divider spans x 400..408.
    assert!(ed.handle_input(&InputEvent::PointerDown {
        x: 404.0,
        y: 250.0,
        modifiers: Modifiers::ALT,
    }));

    let tree = ed.active_tree();
    assert!(tree.get_by_id(id("n3")).is_none());
    assert!(tree.get_by_id(id("n4")).is_none());
    assert!(approx(size(&ed, id("n2")), 58.0));
    assert!(approx(size(&ed, id("n5")), 42.0));
    assert_eq!(
        ed.active_tree().find_parent(id("n5")).map(|p| p.id),
        Some(id("n1"))
    );
    assert_eq!(ed.focused(), Some(id("n2")));
}

// ─── Structure and pages ─────────────────────────────────────────────────

#[test]
fn split_then_delete_round_trips_structure() {
    let (mut ed, _, a, _) = two_pane();
    assert!(key(&mut ed, "h", Modifiers::NONE));
    assert!(!ed.active_tree().get_by_id(a).unwrap().is_leaf());
    assert_eq!(ed.active_tree().len(), 5);

    assert!(key(&mut ed, "Delete", Modifiers::NONE));
    assert!(ed.active_tree().get_by_id(a).unwrap().is_leaf());
    assert_eq!(ed.active_tree().len(), 3);
    assert_eq!(ed.focused(), Some(a));
}

#[test]
fn page_shortcuts() {
    let mut ed = magazine();
    let events = record(&mut ed);

    assert!(key(&mut ed, "Enter", Modifiers::CTRL));
    assert_eq!(ed.document().page_count(), 3);
    assert_eq!(ed.document().current_page_index(), 1);
    assert_eq!(ed.active_tree().len(), 1);

    assert!(key(&mut ed, "PageUp", Modifiers::NONE));
    assert!(key(&mut ed, "d", Modifiers::CTRL));
    assert_eq!(ed.document().page_count(), 4);
    assert_eq!(ed.document().current_page_index(), 1);
    // The copy has the same shape under fresh ids.
    assert_eq!(ed.active_tree().len(), 5);
    assert!(ed.active_tree().get_by_id(id("n2")).is_none());

    assert!(key(&mut ed, "PageUp", Modifiers::NONE));
    assert_eq!(ed.document().current_page_index(), 0);
    assert!(!key(&mut ed, "PageUp", Modifiers::NONE));
    assert!(events
        .borrow()
        .iter()
        .any(|e| matches!(e, EditorEvent::PageChanged { index: 1 })));
}
