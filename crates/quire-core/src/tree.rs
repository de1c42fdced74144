//! Structural operations on a [`LayoutTree`].
//!
//! Lookups return `Option` and every mutation silently does nothing when an
//! id is unknown: by the time an input event is handled, the tree may have
//! changed underneath it.
//!
//! Collapsing (delete, merge) rewrites the surviving *parent* in place so it
//! keeps its id and its size along the grandparent's axis; the absorbed
//! child's node is dropped and its children are re-attached to the parent.

use crate::id::{IdGenerator, NodeId};
use crate::model::*;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// Tolerance used when comparing percentages that should sum to 100.
pub const SIZE_EPSILON: f32 = 0.01;

impl LayoutTree {
    // ─── Queries ─────────────────────────────────────────────────────────

    /// Find a node by id.
    pub fn find_node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.get_by_id(id)
    }

    /// Direct parent of `id`; `None` for the root or an unknown id.
    pub fn find_parent(&self, id: NodeId) -> Option<&LayoutNode> {
        let idx = self.index_of(id)?;
        self.parent(idx).map(|p| &self.graph[p])
    }

    /// Count leaves of the subtree that line up along `axis`.
    ///
    /// A split along `axis` sums its children; a split along the other axis
    /// does not subdivide `axis` and counts as one, as does a leaf.
    pub fn count_parallel_leaves(&self, idx: NodeIndex, axis: Orientation) -> usize {
        match self.graph[idx].kind {
            NodeKind::Split { orientation } if orientation == axis => self
                .children(idx)
                .map(|[a, b]| {
                    self.count_parallel_leaves(a, axis) + self.count_parallel_leaves(b, axis)
                })
                .unwrap_or(1),
            _ => 1,
        }
    }

    /// A split node with both child slots filled.
    pub fn is_mergeable(&self, idx: NodeIndex) -> bool {
        self.graph[idx].orientation().is_some() && self.children(idx).is_some()
    }

    /// Nearest ancestor split of `leaf` whose divider moves along
    /// `direction` and on which `leaf` sits on the side that grows when that
    /// divider moves in `direction`.
    pub fn growth_ancestor(&self, leaf: NodeId, direction: Direction) -> Option<NodeIndex> {
        let axis = direction.orientation();
        let growing = ChildSlot::growing_toward(direction);
        let mut current = self.index_of(leaf)?;
        while let Some(parent) = self.parent(current) {
            if self.graph[parent].orientation() == Some(axis)
                && self.slot_of(current) == Some(growing)
            {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    /// Content of a leaf, `None` for splits and unknown ids.
    pub fn leaf_content(&self, id: NodeId) -> Option<&LeafContent> {
        self.get_by_id(id)?.content()
    }

    pub fn leaf_content_mut(&mut self, id: NodeId) -> Option<&mut LeafContent> {
        self.get_by_id_mut(id)?.content_mut()
    }

    // ─── Split ───────────────────────────────────────────────────────────

    /// Split a leaf into two fresh 50/50 leaves.
    ///
    /// The leaf keeps its id and size and becomes the split; its content
    /// moves to the `content_target` child, the other child starts empty.
    /// Returns the new `(first, second)` ids.
    pub fn split_leaf(
        &mut self,
        id: NodeId,
        orientation: Orientation,
        content_target: ChildSlot,
        ids: &mut IdGenerator,
    ) -> Option<(NodeId, NodeId)> {
        let idx = self.index_of(id)?;
        let content = match &mut self.graph[idx].kind {
            NodeKind::Leaf(content) => std::mem::take(content),
            NodeKind::Split { .. } => return None,
        };
        self.graph[idx].kind = NodeKind::Split { orientation };

        let first_id = ids.next_id();
        let second_id = ids.next_id();
        let (first_content, second_content) = match content_target {
            ChildSlot::First => (content, LeafContent::default()),
            ChildSlot::Second => (LeafContent::default(), content),
        };
        self.add_child(
            idx,
            ChildSlot::First,
            LayoutNode::leaf(first_id, 50.0, first_content),
        );
        self.add_child(
            idx,
            ChildSlot::Second,
            LayoutNode::leaf(second_id, 50.0, second_content),
        );
        log::debug!("split {id} {orientation:?} into {first_id} | {second_id}");
        Some((first_id, second_id))
    }

    /// Wrap the page root in a new split for an edge drag.
    ///
    /// The old root becomes one child sized `100 - seed_percent`; a new empty
    /// leaf sized `seed_percent` takes the slot on the dragged edge's side.
    /// Returns `(new_root_id, new_leaf_id)`.
    pub fn wrap_root(
        &mut self,
        edge: PageEdge,
        seed_percent: f32,
        ids: &mut IdGenerator,
    ) -> (NodeId, NodeId) {
        let seed = seed_percent.clamp(0.0, 100.0);
        let root_id = ids.next_id();
        let leaf_id = ids.next_id();
        let old_root = self.root;
        let new_root = self.add_node(LayoutNode::split(root_id, 100.0, edge.orientation()));
        self.graph[old_root].size = 100.0 - seed;
        let leaf_slot = edge.new_leaf_slot();
        self.attach(new_root, old_root, leaf_slot.other());
        self.add_child(
            new_root,
            leaf_slot,
            LayoutNode::leaf(leaf_id, seed, LeafContent::default()),
        );
        self.root = new_root;
        log::debug!("wrapped root for {edge:?} edge: {root_id} (new leaf {leaf_id})");
        (root_id, leaf_id)
    }

    // ─── Delete / merge ──────────────────────────────────────────────────

    /// Delete `id` and let its sibling take the parent's place.
    ///
    /// Returns the parent's id (which now shows what used to be the
    /// sibling), or `None` if `id` is unknown or the root.
    pub fn delete_and_collapse(&mut self, id: NodeId) -> Option<NodeId> {
        let target = self.index_of(id)?;
        let parent = self.parent(target)?;
        let slot = self.slot_of(target)?;
        let sibling = self.child(parent, slot.other())?;
        self.remove_subtree(target);
        self.absorb(parent, sibling);
        let parent_id = self.graph[parent].id;
        log::debug!("deleted {id}, {parent_id} collapsed onto its sibling");
        Some(parent_id)
    }

    /// Direction-aware expand/consume merge of the two children of
    /// `parent_id`.
    ///
    /// The child containing `initiator` expands; the other child (the
    /// neighbor) is consumed. Without an initiator inside either child the
    /// first child expands. A neighbor split along the same axis loses only
    /// its half adjacent to the expander; any other neighbor is consumed
    /// whole and the parent takes over the expander's structure.
    ///
    /// Returns the node that should receive focus afterwards.
    pub fn merge_directional(
        &mut self,
        parent_id: NodeId,
        initiator: Option<NodeId>,
    ) -> Option<NodeId> {
        let parent = self.index_of(parent_id)?;
        if !self.is_mergeable(parent) {
            return None;
        }
        let orientation = self.graph[parent].orientation()?;
        let [first, second] = self.children(parent)?;

        let initiator_idx = initiator.and_then(|id| self.index_of(id));
        let expander_slot = match initiator_idx {
            Some(i) if self.is_within(i, second) => ChildSlot::Second,
            _ => ChildSlot::First,
        };
        let (expander, neighbor) = match expander_slot {
            ChildSlot::First => (first, second),
            ChildSlot::Second => (second, first),
        };
        let neighbor_slot = expander_slot.other();

        let same_axis = self.graph[neighbor].orientation() == Some(orientation);
        if same_axis && self.children(neighbor).is_some() {
            // The neighbor's child touching the shared boundary sits in the
            // same slot the expander occupies.
            let consumed = self.child(neighbor, expander_slot)?;
            let kept = self.child(neighbor, neighbor_slot)?;

            let neighbor_size = self.graph[neighbor].size;
            let consumed_size = self.graph[consumed].size;
            let expanded = self.graph[expander].size + neighbor_size * (consumed_size / 100.0);
            self.graph[expander].size = expanded;
            self.graph[kept].size = 100.0 - expanded;

            self.remove_subtree(consumed);
            self.detach(kept);
            self.remove_node(neighbor);
            self.attach(parent, kept, neighbor_slot);
            log::debug!(
                "merge {parent_id}: partial consume, expander now {expanded:.3}%"
            );

            let focus = initiator_idx
                .filter(|i| self.graph.contains_node(*i) && self.is_within(*i, expander))
                .unwrap_or(expander);
            return Some(self.graph[focus].id);
        }

        self.remove_subtree(neighbor);
        self.absorb(parent, expander);
        log::debug!("merge {parent_id}: neighbor consumed whole");

        let focus = initiator
            .and_then(|id| self.index_of(id))
            .filter(|i| self.is_within(*i, parent))
            .unwrap_or(parent);
        Some(self.graph[focus].id)
    }

    /// Overwrite `host` with the kind of its only remaining child `donor`,
    /// re-attaching the donor's children under the host. The host keeps its
    /// id and size; the donor node is removed.
    fn absorb(&mut self, host: NodeIndex, donor: NodeIndex) {
        for (child, slot) in self.child_edges(donor) {
            self.detach(child);
            self.attach(host, child, slot);
        }
        if let Some(donor_node) = self.remove_node(donor) {
            self.graph[host].kind = donor_node.kind;
        }
    }

    // ─── Sizes ───────────────────────────────────────────────────────────

    /// Write the two child sizes of `split_id`.
    ///
    /// NaN or negative inputs are clamped to 0 and the pair is rescaled to
    /// sum to exactly 100. If both are 0 the existing sizes are kept and
    /// `false` is returned.
    pub fn set_split_sizes(&mut self, split_id: NodeId, first: f32, second: f32) -> bool {
        let Some(idx) = self.index_of(split_id) else {
            return false;
        };
        let Some([a, b]) = self.children(idx) else {
            return false;
        };
        let Some((first, second)) = normalize_pair(first, second) else {
            return false;
        };
        self.graph[a].size = first;
        self.graph[b].size = second;
        true
    }

    // ─── Degenerate-area cleanup ─────────────────────────────────────────

    /// Nodes under `split` whose effective area, the product of percentages
    /// from `split` down, is at or below `min_area` percent.
    ///
    /// A node that qualifies is reported without its descendants, since
    /// removing it removes them too. The result is ordered deepest first.
    pub fn degenerate_descendants(&self, split: NodeIndex, min_area: f32) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.collect_degenerate(split, 1.0, 0, min_area, &mut found);
        found.sort_by(|a, b| b.0.cmp(&a.0));
        found.into_iter().map(|(_, id)| id).collect()
    }

    fn collect_degenerate(
        &self,
        idx: NodeIndex,
        area: f32,
        depth: usize,
        min_area: f32,
        out: &mut Vec<(usize, NodeId)>,
    ) {
        let Some(children) = self.children(idx) else {
            return;
        };
        for child in children {
            let size = self.graph[child].size;
            let child_area = if size.is_finite() {
                area * size.max(0.0) / 100.0
            } else {
                0.0
            };
            if child_area * 100.0 <= min_area {
                out.push((depth + 1, self.graph[child].id));
            } else {
                self.collect_degenerate(child, child_area, depth + 1, min_area, out);
            }
        }
    }

    /// Remove every degenerate descendant of `split_id`, bottom-up.
    ///
    /// Returns the ids that were actually collapsed. An id that vanished
    /// because an earlier collapse absorbed it is skipped.
    pub fn sweep_degenerate(&mut self, split_id: NodeId, min_area: f32) -> Vec<NodeId> {
        let Some(split) = self.index_of(split_id) else {
            return Vec::new();
        };
        let queued = self.degenerate_descendants(split, min_area);
        let mut removed = Vec::with_capacity(queued.len());
        for id in queued {
            if self.delete_and_collapse(id).is_some() {
                removed.push(id);
            }
        }
        if !removed.is_empty() {
            log::debug!("degenerate sweep under {split_id} removed {removed:?}");
        }
        removed
    }

    // ─── Cloning ─────────────────────────────────────────────────────────

    /// Deep copy of the whole tree with every node id rewritten to a fresh
    /// value from `ids`.
    pub fn deep_clone_with_fresh_ids(&self, ids: &mut IdGenerator) -> LayoutTree {
        let mut mapping: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let order = self.descendants(self.root);

        let mut root_node = self.graph[self.root].clone();
        root_node.id = ids.next_id();
        let mut clone = LayoutTree::with_root(root_node);
        mapping.insert(self.root, clone.root);

        for idx in order.into_iter().skip(1) {
            let (Some(parent), Some(slot)) = (self.parent(idx), self.slot_of(idx)) else {
                continue;
            };
            let Some(&new_parent) = mapping.get(&parent) else {
                continue;
            };
            let mut node = self.graph[idx].clone();
            node.id = ids.next_id();
            let new_idx = clone.add_child(new_parent, slot, node);
            mapping.insert(idx, new_idx);
        }
        clone
    }
}

/// Sanitize a pair of sibling sizes so both are finite, non-negative and
/// sum to 100. `None` when nothing usable is left.
pub fn normalize_pair(first: f32, second: f32) -> Option<(f32, f32)> {
    let clean = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
    let (first, second) = (clean(first), clean(second));
    let total = first + second;
    if total <= 0.0 {
        return None;
    }
    let first = first / total * 100.0;
    Some((first, 100.0 - first))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leaf(id: &str, size: f32, text: Option<&str>) -> LayoutNode {
        let content = text.map(LeafContent::text).unwrap_or_default();
        LayoutNode::leaf(NodeId::intern(id), size, content)
    }

    /// `[a 40 | g 60 [b 30 | c 70]]`, all vertical.
    fn nested_vertical(prefix: &str) -> LayoutTree {
        let id = |s: &str| format!("{prefix}_{s}");
        let mut tree = LayoutTree::with_root(LayoutNode::split(
            NodeId::intern(&id("root")),
            100.0,
            Orientation::Vertical,
        ));
        let root = tree.root;
        tree.add_child(root, ChildSlot::First, leaf(&id("a"), 40.0, Some("A")));
        let g = tree.add_child(
            root,
            ChildSlot::Second,
            LayoutNode::split(NodeId::intern(&id("g")), 60.0, Orientation::Vertical),
        );
        tree.add_child(g, ChildSlot::First, leaf(&id("b"), 30.0, Some("B")));
        tree.add_child(g, ChildSlot::Second, leaf(&id("c"), 70.0, Some("C")));
        tree
    }

    fn size_of(tree: &LayoutTree, id: &str) -> f32 {
        tree.get_by_id(NodeId::intern(id)).unwrap().size
    }

    #[test]
    fn find_parent_of_root_is_none() {
        let tree = nested_vertical("fp");
        assert!(tree.find_parent(NodeId::intern("fp_root")).is_none());
        assert!(tree.find_parent(NodeId::intern("fp_missing")).is_none());
        assert_eq!(
            tree.find_parent(NodeId::intern("fp_b")).unwrap().id,
            NodeId::intern("fp_g")
        );
    }

    #[test]
    fn count_parallel_leaves_respects_axis() {
        let mut tree = nested_vertical("cp");
        let mut ids = IdGenerator::from_counter(1000);
        // Split `a` horizontally: it still counts once along the vertical axis.
        tree.split_leaf(
            NodeId::intern("cp_a"),
            Orientation::Horizontal,
            ChildSlot::First,
            &mut ids,
        );
        let root = tree.root;
        assert_eq!(tree.count_parallel_leaves(root, Orientation::Vertical), 3);
        assert_eq!(tree.count_parallel_leaves(root, Orientation::Horizontal), 1);
        let a = tree.index_of(NodeId::intern("cp_a")).unwrap();
        assert_eq!(tree.count_parallel_leaves(a, Orientation::Horizontal), 2);
    }

    #[test]
    fn split_moves_content_to_target_only() {
        let mut tree = LayoutTree::with_root(leaf("sp_root", 100.0, Some("hello")));
        let mut ids = IdGenerator::new();
        let (first, second) = tree
            .split_leaf(
                NodeId::intern("sp_root"),
                Orientation::Horizontal,
                ChildSlot::Second,
                &mut ids,
            )
            .unwrap();

        let root = tree.root;
        assert!(tree.is_mergeable(root));
        assert_eq!(tree.node(root).size, 100.0);
        let total = tree.get_by_id(first).unwrap().size + tree.get_by_id(second).unwrap().size;
        assert!((total - 100.0).abs() < SIZE_EPSILON);
        assert!(tree.leaf_content(first).unwrap().is_empty());
        assert_eq!(
            tree.leaf_content(second).unwrap().text.as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn split_of_a_split_is_refused() {
        let mut tree = nested_vertical("ss");
        let mut ids = IdGenerator::new();
        let before = tree.len();
        assert!(
            tree.split_leaf(
                NodeId::intern("ss_g"),
                Orientation::Horizontal,
                ChildSlot::First,
                &mut ids
            )
            .is_none()
        );
        assert_eq!(tree.len(), before);
    }

    #[test]
    fn delete_collapses_sibling_into_parent() {
        let mut tree = nested_vertical("dc");
        let parent = tree.delete_and_collapse(NodeId::intern("dc_b")).unwrap();
        assert_eq!(parent, NodeId::intern("dc_g"));
        let g = tree.get_by_id(parent).unwrap();
        assert_eq!(g.size, 60.0);
        assert_eq!(g.content().unwrap().text.as_deref(), Some("C"));
        assert!(tree.get_by_id(NodeId::intern("dc_c")).is_none());
        assert!(tree.get_by_id(NodeId::intern("dc_b")).is_none());
    }

    #[test]
    fn delete_keeps_sibling_structure() {
        let mut tree = nested_vertical("dk");
        let parent = tree.delete_and_collapse(NodeId::intern("dk_a")).unwrap();
        assert_eq!(parent, NodeId::intern("dk_root"));
        let root = tree.root;
        assert_eq!(tree.node(root).orientation(), Some(Orientation::Vertical));
        let [b, c] = tree.children(root).unwrap();
        assert_eq!(tree.node(b).id, NodeId::intern("dk_b"));
        assert_eq!(tree.node(c).id, NodeId::intern("dk_c"));
        assert!(tree.get_by_id(NodeId::intern("dk_g")).is_none());
    }

    #[test]
    fn delete_root_is_noop() {
        let mut tree = nested_vertical("dr");
        let before = tree.len();
        assert!(tree.delete_and_collapse(NodeId::intern("dr_root")).is_none());
        assert_eq!(tree.len(), before);
    }

    #[test]
    fn merge_partially_consumes_same_axis_neighbor() {
        let mut tree = nested_vertical("mp");
        let focus = tree
            .merge_directional(NodeId::intern("mp_root"), Some(NodeId::intern("mp_a")))
            .unwrap();
        assert_eq!(focus, NodeId::intern("mp_a"));
        assert!((size_of(&tree, "mp_a") - 58.0).abs() < 1e-3);
        assert!((size_of(&tree, "mp_c") - 42.0).abs() < 1e-3);
        assert!(tree.get_by_id(NodeId::intern("mp_b")).is_none());
        assert!(tree.get_by_id(NodeId::intern("mp_g")).is_none());
        let root = tree.root;
        let [first, second] = tree.children(root).unwrap();
        assert_eq!(tree.node(first).id, NodeId::intern("mp_a"));
        assert_eq!(tree.node(second).id, NodeId::intern("mp_c"));
    }

    #[test]
    fn merge_from_second_side_consumes_leaf_neighbor_whole() {
        let mut tree = nested_vertical("mw");
        let focus = tree
            .merge_directional(NodeId::intern("mw_root"), Some(NodeId::intern("mw_c")))
            .unwrap();
        // The neighbor `a` is a leaf, so it is consumed whole and the root
        // takes over g's structure.
        assert_eq!(focus, NodeId::intern("mw_c"));
        let root = tree.root;
        assert_eq!(tree.node(root).id, NodeId::intern("mw_root"));
        assert_eq!(tree.node(root).size, 100.0);
        let [b, c] = tree.children(root).unwrap();
        assert_eq!(tree.node(b).id, NodeId::intern("mw_b"));
        assert_eq!(tree.node(c).id, NodeId::intern("mw_c"));
        assert!(tree.get_by_id(NodeId::intern("mw_a")).is_none());
        assert!(tree.get_by_id(NodeId::intern("mw_g")).is_none());
    }

    #[test]
    fn merge_without_initiator_expands_first_child() {
        let mut tree = nested_vertical("mn");
        let focus = tree
            .merge_directional(NodeId::intern("mn_root"), None)
            .unwrap();
        assert_eq!(focus, NodeId::intern("mn_a"));
        assert!((size_of(&tree, "mn_a") - 58.0).abs() < 1e-3);
    }

    #[test]
    fn merge_orthogonal_neighbor_is_consumed_whole() {
        let mut tree = LayoutTree::with_root(LayoutNode::split(
            NodeId::intern("mo_root"),
            70.0,
            Orientation::Vertical,
        ));
        let root = tree.root;
        tree.add_child(root, ChildSlot::First, leaf("mo_a", 50.0, Some("A")));
        let g = tree.add_child(
            root,
            ChildSlot::Second,
            LayoutNode::split(NodeId::intern("mo_g"), 50.0, Orientation::Horizontal),
        );
        tree.add_child(g, ChildSlot::First, leaf("mo_b", 50.0, None));
        tree.add_child(g, ChildSlot::Second, leaf("mo_c", 50.0, None));

        let focus = tree
            .merge_directional(NodeId::intern("mo_root"), Some(NodeId::intern("mo_a")))
            .unwrap();
        assert_eq!(focus, NodeId::intern("mo_root"));
        let node = tree.get_by_id(focus).unwrap();
        assert_eq!(node.size, 70.0);
        assert_eq!(node.content().unwrap().text.as_deref(), Some("A"));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn growth_ancestor_picks_growing_side() {
        let tree = nested_vertical("ga");
        let root = tree.root;
        let g = tree.index_of(NodeId::intern("ga_g")).unwrap();
        assert_eq!(
            tree.growth_ancestor(NodeId::intern("ga_a"), Direction::Right),
            Some(root)
        );
        assert_eq!(
            tree.growth_ancestor(NodeId::intern("ga_a"), Direction::Left),
            None
        );
        assert_eq!(
            tree.growth_ancestor(NodeId::intern("ga_b"), Direction::Left),
            Some(root)
        );
        assert_eq!(
            tree.growth_ancestor(NodeId::intern("ga_b"), Direction::Right),
            Some(g)
        );
        assert_eq!(
            tree.growth_ancestor(NodeId::intern("ga_b"), Direction::Down),
            None
        );
    }

    #[test]
    fn set_split_sizes_sanitizes() {
        let mut tree = nested_vertical("sz");
        let root_id = NodeId::intern("sz_root");
        assert!(tree.set_split_sizes(root_id, f32::NAN, 30.0));
        assert_eq!(size_of(&tree, "sz_a"), 0.0);
        assert_eq!(size_of(&tree, "sz_g"), 100.0);

        assert!(tree.set_split_sizes(root_id, 1.0, 3.0));
        assert_eq!(size_of(&tree, "sz_a"), 25.0);
        assert_eq!(size_of(&tree, "sz_g"), 75.0);

        assert!(!tree.set_split_sizes(root_id, -4.0, 0.0));
        assert_eq!(size_of(&tree, "sz_a"), 25.0);
    }

    #[test]
    fn degenerate_sweep_uses_effective_area() {
        let mut tree = nested_vertical("dg");
        // g = 60%, b = 1.5% of g → effective 0.9% of the root.
        let g = NodeId::intern("dg_g");
        tree.set_split_sizes(g, 1.5, 98.5);
        let root = tree.root;
        assert_eq!(
            tree.degenerate_descendants(root, 1.0),
            vec![NodeId::intern("dg_b")]
        );
        let removed = tree.sweep_degenerate(NodeId::intern("dg_root"), 1.0);
        assert_eq!(removed, vec![NodeId::intern("dg_b")]);
        let g_node = tree.get_by_id(g).unwrap();
        assert_eq!(g_node.content().unwrap().text.as_deref(), Some("C"));
        assert_eq!(size_of(&tree, "dg_a"), 40.0);
    }

    #[test]
    fn degenerate_whole_side_is_reported_once() {
        let mut tree = nested_vertical("dw");
        tree.set_split_sizes(NodeId::intern("dw_root"), 99.5, 0.5);
        let root = tree.root;
        // g qualifies; its children are not listed separately.
        assert_eq!(
            tree.degenerate_descendants(root, 1.0),
            vec![NodeId::intern("dw_g")]
        );
        tree.sweep_degenerate(NodeId::intern("dw_root"), 1.0);
        assert_eq!(tree.len(), 1);
        assert_eq!(
            tree.node(tree.root).content().unwrap().text.as_deref(),
            Some("A")
        );
    }

    #[test]
    fn deep_clone_rewrites_every_id() {
        let tree = nested_vertical("cl");
        let mut ids = IdGenerator::from_counter(500);
        let clone = tree.deep_clone_with_fresh_ids(&mut ids);
        assert_eq!(clone.len(), tree.len());
        for idx in clone.graph.node_indices() {
            assert!(tree.get_by_id(clone.node(idx).id).is_none());
        }
        let [a, g] = clone.children(clone.root).unwrap();
        assert_eq!(clone.node(a).size, 40.0);
        assert_eq!(clone.node(a).content().unwrap().text.as_deref(), Some("A"));
        assert_eq!(clone.count_parallel_leaves(g, Orientation::Vertical), 2);
        assert_eq!(ids.counter(), 505);
    }

    #[test]
    fn wrap_root_places_new_leaf_on_edge_side() {
        let mut tree = nested_vertical("wr");
        let mut ids = IdGenerator::from_counter(900);
        let (root_id, leaf_id) = tree.wrap_root(PageEdge::Left, 0.5, &mut ids);
        assert_eq!(tree.root_id(), root_id);
        let [first, second] = tree.children(tree.root).unwrap();
        assert_eq!(tree.node(first).id, leaf_id);
        assert_eq!(tree.node(first).size, 0.5);
        assert_eq!(tree.node(second).id, NodeId::intern("wr_root"));
        assert_eq!(tree.node(second).size, 99.5);
    }
}
