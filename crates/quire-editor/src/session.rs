//! The editor session.
//!
//! [`Editor`] is the single context object that owns the document, its
//! history, the active drag, the focus cache and the outbound channels.
//! Every entry point runs to completion before returning, then redraws and
//! emits its events. Mutating entry points snapshot history first and are
//! refused while a drag is in progress.

use crate::drag::{DragCommit, DragController, DragUpdate, SplitGeometry, outside_leaf_lengths};
use crate::events::{EditorEvent, EventBus, Renderer, SubscriptionId};
use crate::focus::FocusNavigator;
use crate::history::History;
use crate::input::InputEvent;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use quire_core::snap;
use quire_core::tree::normalize_pair;
use quire_core::{
    ChildSlot, Direction, Document, EngineConfig, HitTarget, ImageRef, LayoutTree, LeafContent,
    LoadError, NodeId, Orientation, PageEdge, ResolvedLayout, TextAlign, Viewport, hit_test,
    lint_tree, resolve_layout,
};

pub struct Editor {
    doc: Document,
    history: History,
    drag: DragController,
    navigator: FocusNavigator,
    config: EngineConfig,
    viewport: Viewport,
    layout: ResolvedLayout,
    focused: Option<NodeId>,
    renderer: Option<Box<dyn Renderer>>,
    events: EventBus,
}

impl Editor {
    /// A session on a new single-page document.
    pub fn new(config: EngineConfig, viewport: Viewport) -> Self {
        Self::with_document(Document::new(), config, viewport)
    }

    pub fn with_document(doc: Document, config: EngineConfig, viewport: Viewport) -> Self {
        let layout = resolve_layout(doc.active_tree(), viewport, config.divider_thickness);
        Self {
            history: History::new(config.history_depth),
            drag: DragController::new(),
            navigator: FocusNavigator::new(),
            focused: None,
            renderer: None,
            events: EventBus::new(),
            doc,
            config,
            viewport,
            layout,
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn active_tree(&self) -> &LayoutTree {
        self.doc.active_tree()
    }

    pub fn layout(&self) -> &ResolvedLayout {
        &self.layout
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    // ─── Collaborators ──────────────────────────────────────────────────

    /// Install the redraw hook and draw the current page once.
    pub fn set_renderer(&mut self, renderer: impl Renderer + 'static) {
        self.renderer = Some(Box::new(renderer));
        self.render();
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.relayout();
        self.render();
    }

    // ─── Focus ──────────────────────────────────────────────────────────

    /// Focus a leaf of the active page.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.doc.find_node(id).is_some_and(|n| n.is_leaf()) {
            return false;
        }
        self.focused = Some(id);
        self.render();
        true
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
        self.render();
    }

    /// Move focus to the nearest leaf in `direction`. Without a focused
    /// leaf, the first leaf of the page is focused instead.
    pub fn navigate(&mut self, direction: Direction) -> Option<NodeId> {
        let current = self.focused.filter(|id| self.doc.find_node(*id).is_some());
        let next = match current {
            Some(current) => self.navigator.closest_in_direction(
                current,
                direction,
                self.doc.active_tree(),
                &self.layout,
            )?,
            None => first_leaf_under(self.doc.active_tree(), self.doc.active_tree().root_id())?,
        };
        self.focused = Some(next);
        self.render();
        Some(next)
    }

    // ─── Structure ──────────────────────────────────────────────────────

    /// Split a leaf in two. The leaf's content moves to `content_target`,
    /// which also receives focus.
    pub fn split_at(
        &mut self,
        leaf: NodeId,
        orientation: Orientation,
        content_target: ChildSlot,
    ) -> Option<(NodeId, NodeId)> {
        if self.refuse_while_dragging("split") {
            return None;
        }
        if !self.doc.find_node(leaf).is_some_and(|n| n.is_leaf()) {
            return None;
        }
        self.history.save_state(&self.doc);
        let (tree, ids) = self.doc.active_tree_and_ids();
        let children = tree.split_leaf(leaf, orientation, content_target, ids)?;
        let focus = match content_target {
            ChildSlot::First => children.0,
            ChildSlot::Second => children.1,
        };
        self.commit(&[focus]);
        Some(children)
    }

    /// Delete a node; its sibling takes the parent's place. Deleting the
    /// page root is a no-op.
    pub fn delete_node(&mut self, id: NodeId) -> Option<NodeId> {
        if self.refuse_while_dragging("delete") {
            return None;
        }
        self.doc.active_tree().find_parent(id)?;
        self.history.save_state(&self.doc);
        let parent = self.doc.active_tree_mut().delete_and_collapse(id)?;
        self.commit(&[parent]);
        Some(parent)
    }

    /// Merge the two children of `parent`; the child containing `initiator`
    /// expands.
    pub fn merge(&mut self, parent: NodeId, initiator: Option<NodeId>) -> Option<NodeId> {
        if self.refuse_while_dragging("merge") {
            return None;
        }
        let tree = self.doc.active_tree();
        let idx = tree.index_of(parent)?;
        if !tree.is_mergeable(idx) {
            return None;
        }
        self.history.save_state(&self.doc);
        let focus = self
            .doc
            .active_tree_mut()
            .merge_directional(parent, initiator)?;
        self.commit(&[focus, parent]);
        Some(focus)
    }

    /// Grow `leaf` across the divider on its `direction` side.
    pub fn merge_toward(&mut self, leaf: NodeId, direction: Direction) -> Option<NodeId> {
        let tree = self.doc.active_tree();
        let split = tree.growth_ancestor(leaf, direction)?;
        let split = tree.node(split).id;
        self.merge(split, Some(leaf))
    }

    // ─── Drag ───────────────────────────────────────────────────────────

    /// Start dragging the divider of `split` from pointer `(x, y)`.
    pub fn begin_divider_drag(&mut self, split: NodeId, x: f32, y: f32) -> bool {
        let started = self.drag.begin(
            self.doc.active_tree(),
            &self.layout,
            split,
            (x, y),
            self.config.cache_drag_snaps,
            &self.config,
        );
        if started {
            self.history.save_state(&self.doc);
        }
        started
    }

    /// Grow a new empty pane from a paper edge.
    ///
    /// The page root is wrapped in a new split whose new leaf starts at
    /// `edge_seed_percent`; from then on the drag is an ordinary divider
    /// drag of that split.
    pub fn begin_edge_drag(&mut self, edge: PageEdge, x: f32, y: f32) -> bool {
        if self.drag.is_dragging() {
            log::warn!("edge drag refused: a drag is already active");
            return false;
        }
        let before = self.doc.clone();
        let seed = self.config.edge_seed_percent;
        let (tree, ids) = self.doc.active_tree_and_ids();
        let (split, _) = tree.wrap_root(edge, seed, ids);
        self.relayout();

        let started = self.drag.begin(
            self.doc.active_tree(),
            &self.layout,
            split,
            (x, y),
            self.config.cache_drag_snaps,
            &self.config,
        );
        if !started {
            self.discard_edge_seed(before);
            return false;
        }
        self.history.save_state(&before);
        self.render();
        true
    }

    /// Put back the document from before an edge seed was wrapped in. Ids
    /// minted for the seed stay spent.
    fn discard_edge_seed(&mut self, before: Document) {
        let counter = self.doc.ids.counter();
        self.doc = before;
        self.doc.ids.advance_to(counter);
        self.relayout();
        log::debug!("edge seed discarded: drag did not start");
    }

    /// Move the active drag. The tree holds the preview proportions
    /// afterwards so the rendered geometry matches it during the gesture.
    pub fn drag_to(&mut self, x: f32, y: f32, snap: bool) -> Option<DragUpdate> {
        let update = self.drag.update((x, y), snap)?;
        self.doc.active_tree_mut().set_split_sizes(
            update.split,
            update.first_percent,
            update.second_percent,
        );
        self.relayout();
        self.render();
        if let Some(point) = update.engaged {
            self.events.emit(EditorEvent::SnapEngaged {
                kind: point.kind,
                percent: update.first_percent,
            });
        }
        Some(update)
    }

    /// Release the active drag: commit proportions, then remove anything
    /// whose area became negligible.
    pub fn end_drag(&mut self) -> bool {
        let commit = self.drag.finish();
        self.apply_drag_commit(commit)
    }

    /// Pointer capture was lost. Runs the same commit as [`end_drag`](Self::end_drag).
    pub fn cancel_drag(&mut self) -> bool {
        let commit = self.drag.cancel();
        self.apply_drag_commit(commit)
    }

    fn apply_drag_commit(&mut self, commit: Option<DragCommit>) -> bool {
        let Some(commit) = commit else {
            return false;
        };
        let tree = self.doc.active_tree_mut();
        if !tree.set_split_sizes(commit.split, commit.first_percent, commit.second_percent) {
            log::warn!("drag target {} no longer exists", commit.split);
        }
        self.sweep_and_commit(commit.split);
        true
    }

    fn sweep_and_commit(&mut self, split: NodeId) {
        let min_area = self.config.min_area_percent;
        let removed = self.doc.active_tree_mut().sweep_degenerate(split, min_area);
        if !removed.is_empty() {
            log::debug!("removed {} degenerate node(s) under {split}", removed.len());
        }
        let keep = self.focused.unwrap_or(split);
        self.commit(&[keep, split]);
    }

    // ─── Keyboard snap ──────────────────────────────────────────────────

    /// Move the divider that grows `leaf` in `direction` to the next snap
    /// point.
    ///
    /// Falls back to the boundary when no candidate qualifies. A side that
    /// ends at or below `min_area_percent` is removed. Returns `false` when
    /// there is no such divider or nothing to snap to.
    pub fn snap_divider(&mut self, leaf: NodeId, direction: Direction) -> bool {
        if self.refuse_while_dragging("snap") {
            return false;
        }
        let tree = self.doc.active_tree();
        let Some(split_idx) = tree.growth_ancestor(leaf, direction) else {
            return false;
        };
        let split = tree.node(split_idx).id;
        let Some(geometry) = SplitGeometry::resolve(tree, &self.layout, split) else {
            return false;
        };
        let Some([first, second]) = tree.children(split_idx) else {
            return false;
        };
        let orientation = geometry.orientation;
        let current = normalize_pair(tree.node(first).size, tree.node(second).size)
            .map(|(p, _)| p)
            .unwrap_or(50.0);

        let snap_config = &self.config.snap;
        let total = tree.count_parallel_leaves(first, orientation)
            + tree.count_parallel_leaves(second, orientation);
        let mut standard = snap::grid_candidates(total);
        standard.extend(snap::subdivision_candidates(
            current,
            snap_config.subdivision_min_gap,
        ));

        let content = geometry.content_len();
        let lengths = outside_leaf_lengths(tree, &self.layout, split_idx, orientation);
        let mut priority = snap::size_match_candidates(&lengths, content);
        priority.extend(snap::alignment_candidates(
            &self.layout.divider_centers(orientation, split),
            geometry.container_start,
            content,
            geometry.divider_px,
        ));

        let target = snap::find_next_snap_point(current, &standard, &priority, direction, snap_config)
            .or_else(|| snap::boundary_fallback(current, direction, snap_config));
        let Some(target) = target else {
            return false;
        };
        log::debug!(
            "snap {split} {direction:?}: {current:.2}% → {:.2}% ({})",
            target.value,
            target.kind
        );

        self.history.save_state(&self.doc);
        let min_area = self.config.min_area_percent;
        let tree = self.doc.active_tree_mut();
        tree.set_split_sizes(split, target.value, 100.0 - target.value);
        tree.sweep_degenerate(split, min_area);
        self.commit(&[leaf, split]);
        self.events.emit(EditorEvent::SnapEngaged {
            kind: target.kind,
            percent: target.value,
        });
        true
    }

    // ─── Pages ──────────────────────────────────────────────────────────

    pub fn add_page(&mut self) -> Option<usize> {
        if self.refuse_while_dragging("add page") {
            return None;
        }
        self.history.save_state(&self.doc);
        let index = self.doc.add_page();
        self.page_changed();
        Some(index)
    }

    pub fn duplicate_page(&mut self, index: usize) -> Option<usize> {
        if self.refuse_while_dragging("duplicate page") || index >= self.doc.page_count() {
            return None;
        }
        self.history.save_state(&self.doc);
        let at = self.doc.duplicate_page(index)?;
        self.page_changed();
        Some(at)
    }

    /// Remove a page. The last remaining page is kept.
    pub fn remove_page(&mut self, index: usize) -> bool {
        if self.refuse_while_dragging("remove page")
            || self.doc.page_count() <= 1
            || index >= self.doc.page_count()
        {
            return false;
        }
        self.history.save_state(&self.doc);
        self.doc.remove_page(index);
        self.page_changed();
        true
    }

    pub fn move_page(&mut self, from: usize, to: usize) -> bool {
        let count = self.doc.page_count();
        if self.refuse_while_dragging("move page") || from >= count || to >= count || from == to {
            return false;
        }
        self.history.save_state(&self.doc);
        self.doc.move_page(from, to);
        self.page_changed();
        true
    }

    pub fn switch_page(&mut self, index: usize) -> bool {
        if self.refuse_while_dragging("switch page") || !self.doc.switch_page(index) {
            return false;
        }
        self.page_changed();
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.switch_page(self.doc.current_page_index() + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        match self.doc.current_page_index().checked_sub(1) {
            Some(index) => self.switch_page(index),
            None => false,
        }
    }

    fn page_changed(&mut self) {
        self.focused = None;
        self.relayout();
        self.render();
        self.events.emit(EditorEvent::PageChanged {
            index: self.doc.current_page_index(),
        });
    }

    // ─── Content ────────────────────────────────────────────────────────

    pub fn set_image(&mut self, leaf: NodeId, image: ImageRef) -> bool {
        self.edit_content(leaf, |c| c.image = Some(image))
    }

    pub fn set_text(&mut self, leaf: NodeId, text: Option<String>) -> bool {
        self.edit_content(leaf, |c| c.text = text)
    }

    pub fn set_text_align(&mut self, leaf: NodeId, align: TextAlign) -> bool {
        self.edit_content(leaf, |c| c.text_align = align)
    }

    /// Mirror the leaf's image. No-op without an image.
    pub fn toggle_flip(&mut self, leaf: NodeId) -> bool {
        if !self.has_image(leaf) {
            return false;
        }
        self.edit_content(leaf, |c| {
            if let Some(image) = &mut c.image {
                image.flipped = !image.flipped;
            }
        })
    }

    /// Switch the leaf's image between cover and contain.
    pub fn toggle_fit(&mut self, leaf: NodeId) -> bool {
        if !self.has_image(leaf) {
            return false;
        }
        self.edit_content(leaf, |c| {
            if let Some(image) = &mut c.image {
                image.fit = image.fit.toggled();
            }
        })
    }

    pub fn clear_content(&mut self, leaf: NodeId) -> bool {
        self.edit_content(leaf, |c| *c = LeafContent::default())
    }

    fn has_image(&self, leaf: NodeId) -> bool {
        self.doc
            .active_tree()
            .leaf_content(leaf)
            .is_some_and(|c| c.image.is_some())
    }

    fn edit_content(&mut self, leaf: NodeId, edit: impl FnOnce(&mut LeafContent)) -> bool {
        if self.refuse_while_dragging("content edit")
            || self.doc.active_tree().leaf_content(leaf).is_none()
        {
            return false;
        }
        self.history.save_state(&self.doc);
        if let Some(content) = self.doc.active_tree_mut().leaf_content_mut(leaf) {
            edit(content);
        }
        self.render();
        self.events.emit(EditorEvent::LayoutChanged);
        true
    }

    // ─── History ────────────────────────────────────────────────────────

    /// Step back one snapshot. `on_restored` runs after the document is
    /// replaced and before the redraw.
    pub fn undo(&mut self, on_restored: impl FnOnce(&Document)) -> bool {
        if self.refuse_while_dragging("undo") || !self.history.undo(&mut self.doc) {
            return false;
        }
        self.restored(on_restored);
        true
    }

    pub fn redo(&mut self, on_restored: impl FnOnce(&Document)) -> bool {
        if self.refuse_while_dragging("redo") || !self.history.redo(&mut self.doc) {
            return false;
        }
        self.restored(on_restored);
        true
    }

    fn restored(&mut self, on_restored: impl FnOnce(&Document)) {
        self.relayout();
        self.settle_focus(&[]);
        on_restored(&self.doc);
        self.render();
        self.events.emit(EditorEvent::StateRestored);
    }

    // ─── Persistence ────────────────────────────────────────────────────

    /// Replace the document with one loaded from JSON. History is cleared.
    /// On error the current document is kept.
    ///
    /// # Errors
    /// See [`LoadError`].
    pub fn load_json(&mut self, json: &str) -> Result<(), LoadError> {
        let doc = Document::from_json(json)?;
        self.doc = doc;
        self.drag = DragController::new();
        self.history.clear();
        self.page_changed();
        Ok(())
    }

    /// # Errors
    /// Fails only if `serde_json` cannot encode the document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        self.doc.to_json()
    }

    // ─── Input ──────────────────────────────────────────────────────────

    /// Route a pointer or key event. Returns whether it did anything.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y, modifiers } => {
                if self.drag.is_dragging() {
                    return false;
                }
                let target = hit_test(
                    self.doc.active_tree(),
                    &self.layout,
                    self.viewport,
                    *x,
                    *y,
                    &self.config,
                );
                match target {
                    Some(HitTarget::Edge(edge)) => self.begin_edge_drag(edge, *x, *y),
                    Some(HitTarget::Divider(split)) if modifiers.alt => {
                        self.merge(split, self.focused).is_some()
                    }
                    Some(HitTarget::Divider(split)) => self.begin_divider_drag(split, *x, *y),
                    Some(HitTarget::Leaf(leaf)) => self.focus(leaf),
                    None => false,
                }
            }
            InputEvent::PointerMove { x, y, modifiers } => {
                self.drag_to(*x, *y, modifiers.shift).is_some()
            }
            InputEvent::PointerUp { .. } => self.end_drag(),
            InputEvent::PointerCancel => self.cancel_drag(),
            InputEvent::Key { key, modifiers } => match ShortcutMap::resolve(key, *modifiers) {
                Some(action) => self.dispatch(action),
                None => false,
            },
        }
    }

    /// Perform a shortcut action against the focused leaf / current page.
    pub fn dispatch(&mut self, action: ShortcutAction) -> bool {
        let focused = self.focused;
        match action {
            ShortcutAction::Navigate(direction) => self.navigate(direction).is_some(),
            ShortcutAction::ClearFocus => {
                self.clear_focus();
                true
            }
            ShortcutAction::Undo => self.undo(|_| {}),
            ShortcutAction::Redo => self.redo(|_| {}),
            ShortcutAction::PrevPage => self.prev_page(),
            ShortcutAction::NextPage => self.next_page(),
            ShortcutAction::NewPage => self.add_page().is_some(),
            ShortcutAction::DuplicatePage => {
                self.duplicate_page(self.doc.current_page_index()).is_some()
            }
            _ => {
                let Some(leaf) = focused else {
                    return false;
                };
                match action {
                    ShortcutAction::Merge(direction) => self.merge_toward(leaf, direction).is_some(),
                    ShortcutAction::SnapDivider(direction) => self.snap_divider(leaf, direction),
                    ShortcutAction::SplitVertical => self
                        .split_at(leaf, Orientation::Vertical, ChildSlot::First)
                        .is_some(),
                    ShortcutAction::SplitHorizontal => self
                        .split_at(leaf, Orientation::Horizontal, ChildSlot::First)
                        .is_some(),
                    ShortcutAction::Delete => self.delete_node(leaf).is_some(),
                    ShortcutAction::ToggleFlip => self.toggle_flip(leaf),
                    ShortcutAction::ToggleFit => self.toggle_fit(leaf),
                    _ => false,
                }
            }
        }
    }

    // ─── Internals ──────────────────────────────────────────────────────

    fn refuse_while_dragging(&self, what: &str) -> bool {
        if self.drag.is_dragging() {
            log::warn!("{what} refused while a drag is active");
            true
        } else {
            false
        }
    }

    fn relayout(&mut self) {
        self.layout = resolve_layout(
            self.doc.active_tree(),
            self.viewport,
            self.config.divider_thickness,
        );
        self.navigator.invalidate();
    }

    /// Finish a committed structural change: relayout, restore focus to the
    /// first surviving candidate, redraw, notify.
    fn commit(&mut self, focus_candidates: &[NodeId]) {
        self.relayout();
        self.settle_focus(focus_candidates);
        let diagnostics = lint_tree(self.doc.active_tree());
        for diag in &diagnostics {
            log::debug!("lint [{}] {}", diag.rule, diag.message);
        }
        self.render();
        self.events.emit(EditorEvent::LayoutChanged);
    }

    /// Focus the first of `candidates`, then the current focus, that still
    /// exists. A split resolves to its first leaf.
    fn settle_focus(&mut self, candidates: &[NodeId]) {
        let tree = self.doc.active_tree();
        self.focused = candidates
            .iter()
            .copied()
            .chain(self.focused)
            .find_map(|id| first_leaf_under(tree, id));
    }

    fn render(&mut self) {
        if let Some(renderer) = &mut self.renderer {
            renderer.render(self.doc.active_page(), &self.layout, self.focused);
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EngineConfig::default(), Viewport::default())
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("pages", &self.doc.page_count())
            .field("current_page", &self.doc.current_page_index())
            .field("focused", &self.focused)
            .field("dragging", &self.drag.is_dragging())
            .finish_non_exhaustive()
    }
}

fn first_leaf_under(tree: &LayoutTree, id: NodeId) -> Option<NodeId> {
    let idx = tree.index_of(id)?;
    tree.descendants(idx)
        .into_iter()
        .find(|i| tree.node(*i).is_leaf())
        .map(|i| tree.node(i).id)
}
