//! Integration tests: pointer-driven divider and edge drags.
//!
//! Drives the [`Editor`] through raw input events and checks the committed
//! tree, the history and the emitted events.

use quire_core::snap::SnapKind;
use quire_core::{ChildSlot, EngineConfig, NodeId, Orientation, Viewport};
use quire_editor::{Editor, EditorEvent, InputEvent, Modifiers};
use std::cell::RefCell;
use std::rc::Rc;

/// 1000px of content on either axis once the 8px divider is taken out.
const VIEWPORT: Viewport = Viewport {
    width: 1008.0,
    height: 508.0,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `[a | b]`, divider centre at x = 504.
fn two_pane() -> (Editor, NodeId, NodeId, NodeId) {
    init_logger();
    let mut ed = Editor::new(EngineConfig::default(), VIEWPORT);
    let root = ed.active_tree().root_id();
    let (a, b) = ed
        .split_at(root, Orientation::Vertical, ChildSlot::First)
        .unwrap();
    (ed, root, a, b)
}

fn record(ed: &mut Editor) -> Rc<RefCell<Vec<EditorEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    ed.subscribe(move |e| sink.borrow_mut().push(*e));
    log
}

fn down(x: f32, y: f32) -> InputEvent {
    InputEvent::PointerDown {
        x,
        y,
        modifiers: Modifiers::NONE,
    }
}

fn move_to(x: f32, y: f32, modifiers: Modifiers) -> InputEvent {
    InputEvent::PointerMove { x, y, modifiers }
}

fn size(ed: &Editor, id: NodeId) -> f32 {
    ed.active_tree().get_by_id(id).unwrap().size
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

// ─── Divider drags ───────────────────────────────────────────────────────

#[test]
fn divider_drag_commits_on_release() {
    let (mut ed, _, a, b) = two_pane();
    assert!(ed.handle_input(&down(504.0, 250.0)));
    assert!(ed.is_dragging());

    assert!(ed.handle_input(&move_to(604.0, 250.0, Modifiers::NONE)));
    // Preview proportions are already in the tree.
    assert!(approx(size(&ed, a), 60.0));

    assert!(ed.handle_input(&InputEvent::PointerUp { x: 604.0, y: 250.0 }));
    assert!(!ed.is_dragging());
    assert!(approx(size(&ed, a), 60.0));
    assert!(approx(size(&ed, b), 40.0));
    // One entry for the split, one for the whole drag.
    assert_eq!(ed.history().undo_depth(), 2);

    assert!(ed.undo(|_| {}));
    assert_eq!(size(&ed, a), 50.0);
}

#[test]
fn dragging_to_the_edge_removes_collapsed_side() {
    let (mut ed, root, a, b) = two_pane();
    ed.handle_input(&down(504.0, 250.0));
    ed.handle_input(&move_to(1007.0, 250.0, Modifiers::NONE));
    ed.handle_input(&InputEvent::PointerUp { x: 1007.0, y: 250.0 });

    let tree = ed.active_tree();
    assert_eq!(tree.len(), 1);
    assert!(tree.get_by_id(root).unwrap().is_leaf());
    assert!(tree.get_by_id(a).is_none());
    assert!(tree.get_by_id(b).is_none());
    assert_eq!(ed.focused(), Some(root));

    assert!(ed.undo(|_| {}));
    assert_eq!(ed.active_tree().len(), 3);
}

#[test]
fn pointer_cancel_commits_like_release() {
    let (mut ed, _, a, _) = two_pane();
    ed.handle_input(&down(504.0, 250.0));
    ed.handle_input(&move_to(304.0, 250.0, Modifiers::NONE));
    assert!(ed.handle_input(&InputEvent::PointerCancel));
    assert!(!ed.is_dragging());
    assert!(approx(size(&ed, a), 30.0));
}

#[test]
fn shift_drag_engages_snap_once() {
    let (mut ed, _, a, _) = two_pane();
    let events = record(&mut ed);

    ed.handle_input(&down(504.0, 250.0));
    ed.handle_input(&move_to(700.0, 250.0, Modifiers::SHIFT));
    // Within the 8px threshold of the 50% grid point.
    ed.handle_input(&move_to(509.0, 250.0, Modifiers::SHIFT));
    ed.handle_input(&move_to(507.0, 250.0, Modifiers::SHIFT));
    ed.handle_input(&InputEvent::PointerUp { x: 507.0, y: 250.0 });

    let snaps: Vec<EditorEvent> = events
        .borrow()
        .iter()
        .copied()
        .filter(|e| matches!(e, EditorEvent::SnapEngaged { .. }))
        .collect();
    assert_eq!(snaps.len(), 1);
    assert!(matches!(
        snaps[0],
        EditorEvent::SnapEngaged { kind: SnapKind::Grid, percent } if approx(percent, 50.0)
    ));
    assert!(approx(size(&ed, a), 50.0));
    assert_eq!(events.borrow().last(), Some(&EditorEvent::LayoutChanged));
}

#[test]
fn second_pointer_down_is_ignored_while_dragging() {
    let (mut ed, _, _, _) = two_pane();
    assert!(ed.handle_input(&down(504.0, 250.0)));
    assert!(!ed.handle_input(&down(2.0, 250.0)));
    assert!(ed.end_drag());
    assert_eq!(ed.history().undo_depth(), 2);
}

// ─── Edge drags ──────────────────────────────────────────────────────────

#[test]
fn edge_drag_grows_new_pane() {
    let (mut ed, old_root, a, _) = two_pane();
    assert!(ed.handle_input(&down(2.0, 250.0)));

    let new_root = ed.active_tree().root_id();
    assert_ne!(new_root, old_root);
    assert_eq!(
        ed.active_tree().find_parent(old_root).map(|p| p.id),
        Some(new_root)
    );

    ed.handle_input(&move_to(302.0, 250.0, Modifiers::NONE));
    ed.handle_input(&InputEvent::PointerUp { x: 302.0, y: 250.0 });

    let tree = ed.active_tree();
    let root_idx = tree.index_of(new_root).unwrap();
    let [fresh, _] = tree.children(root_idx).unwrap();
    let fresh = tree.node(fresh);
    assert!(fresh.is_leaf());
    assert!(tree.leaf_content(fresh.id).unwrap().is_empty());
    assert!(approx(fresh.size, 30.5), "{}", fresh.size);
    assert!(tree.get_by_id(a).is_some());
}

#[test]
fn edge_tap_leaves_layout_as_it_was() {
    let (mut ed, _, a, b) = two_pane();
    ed.handle_input(&down(1006.0, 250.0));
    ed.handle_input(&InputEvent::PointerUp { x: 1006.0, y: 250.0 });

    // The seed pane never grew past the minimum area and is swept again.
    let tree = ed.active_tree();
    assert_eq!(tree.len(), 3);
    let root = tree.node(tree.root);
    assert_eq!(root.orientation(), Some(Orientation::Vertical));
    assert_eq!(size(&ed, a), 50.0);
    assert_eq!(size(&ed, b), 50.0);
}
