//! Directional focus navigation between leaves.
//!
//! Leaf centres are cached on first use and reused until [`invalidate`]
//! is called, which the editor does after any structural or geometric
//! change.
//!
//! [`invalidate`]: FocusNavigator::invalidate

use quire_core::{Direction, LayoutTree, NodeId, ResolvedLayout};

/// Weight of cross-axis deviation relative to travel along the requested
/// axis.
pub const CROSS_AXIS_WEIGHT: f32 = 2.0;

#[derive(Debug, Clone, Default)]
pub struct FocusNavigator {
    /// Leaf centres in reading order. `None` until first use.
    centers: Option<Vec<(NodeId, (f32, f32))>>,
}

impl FocusNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop cached bounds; they are rebuilt on the next query.
    pub fn invalidate(&mut self) {
        self.centers = None;
    }

    pub fn is_cached(&self) -> bool {
        self.centers.is_some()
    }

    /// The leaf nearest to `current` in `direction`, or `None`.
    ///
    /// Only leaves whose centre lies strictly past the current centre along
    /// the requested axis qualify. They are ranked by
    /// `primary + CROSS_AXIS_WEIGHT * cross`; on equal score the earlier leaf
    /// in reading order wins.
    pub fn closest_in_direction(
        &mut self,
        current: NodeId,
        direction: Direction,
        tree: &LayoutTree,
        layout: &ResolvedLayout,
    ) -> Option<NodeId> {
        let centers = self.centers.get_or_insert_with(|| leaf_centers(tree, layout));
        let origin = centers
            .iter()
            .find(|(id, _)| *id == current)
            .map(|(_, c)| *c)
            .or_else(|| layout.bounds(current).map(|b| b.center()))?;

        let mut best: Option<(f32, NodeId)> = None;
        for &(id, (cx, cy)) in centers.iter() {
            if id == current {
                continue;
            }
            let dx = cx - origin.0;
            let dy = cy - origin.1;
            let (primary, cross, sign) = match direction {
                Direction::Right => (dx, dy, 1.0),
                Direction::Left => (dx, dy, -1.0),
                Direction::Down => (dy, dx, 1.0),
                Direction::Up => (dy, dx, -1.0),
            };
            if sign * primary <= 0.0 {
                continue;
            }
            let score = primary.abs() + CROSS_AXIS_WEIGHT * cross.abs();
            if !score.is_finite() {
                continue;
            }
            if best.is_none_or(|(s, _)| score < s) {
                best = Some((score, id));
            }
        }
        best.map(|(_, id)| id)
    }
}

fn leaf_centers(tree: &LayoutTree, layout: &ResolvedLayout) -> Vec<(NodeId, (f32, f32))> {
    tree.leaves()
        .into_iter()
        .filter_map(|idx| {
            let id = tree.node(idx).id;
            layout.bounds(id).map(|b| (id, b.center()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quire_core::{ChildSlot, IdGenerator, Orientation, Viewport, resolve_layout};

    /// ```text
    /// ┌───┬───┐
    /// │ a │ b │
    /// ├───┼───┤
    /// │ c │ d │
    /// └───┴───┘
    /// ```
    fn grid(root: &str) -> (LayoutTree, ResolvedLayout, [NodeId; 4]) {
        let root = NodeId::intern(root);
        let mut tree = LayoutTree::new(root);
        let mut ids = IdGenerator::new();
        let (top, bottom) = tree
            .split_leaf(root, Orientation::Horizontal, ChildSlot::First, &mut ids)
            .unwrap();
        let (a, b) = tree
            .split_leaf(top, Orientation::Vertical, ChildSlot::First, &mut ids)
            .unwrap();
        let (c, d) = tree
            .split_leaf(bottom, Orientation::Vertical, ChildSlot::First, &mut ids)
            .unwrap();
        let layout = resolve_layout(&tree, Viewport::default(), 8.0);
        (tree, layout, [a, b, c, d])
    }

    #[test]
    fn horizontal_neighbors_are_symmetric() {
        let (tree, layout, [a, b, _, _]) = grid("focus_sym");
        let mut nav = FocusNavigator::new();
        assert_eq!(nav.closest_in_direction(a, Direction::Right, &tree, &layout), Some(b));
        assert_eq!(nav.closest_in_direction(b, Direction::Left, &tree, &layout), Some(a));
    }

    #[test]
    fn vertical_moves_stay_in_column() {
        let (tree, layout, [a, b, c, d]) = grid("focus_col");
        let mut nav = FocusNavigator::new();
        assert_eq!(nav.closest_in_direction(a, Direction::Down, &tree, &layout), Some(c));
        assert_eq!(nav.closest_in_direction(d, Direction::Up, &tree, &layout), Some(b));
    }

    #[test]
    fn nothing_past_the_edge() {
        let (tree, layout, [a, _, _, d]) = grid("focus_edge");
        let mut nav = FocusNavigator::new();
        assert_eq!(nav.closest_in_direction(a, Direction::Left, &tree, &layout), None);
        assert_eq!(nav.closest_in_direction(a, Direction::Up, &tree, &layout), None);
        assert_eq!(nav.closest_in_direction(d, Direction::Right, &tree, &layout), None);
    }

    #[test]
    fn cache_survives_until_invalidated() {
        let (mut tree, layout, [a, b, c, _]) = grid("focus_cache");
        let mut nav = FocusNavigator::new();
        assert!(!nav.is_cached());
        nav.closest_in_direction(a, Direction::Right, &tree, &layout);
        assert!(nav.is_cached());

        // Remove `b`: the top row collapses into one leaf. The stale cache
        // still answers with `b`.
        let top = tree.find_parent(b).unwrap().id;
        tree.delete_and_collapse(b);
        let layout = resolve_layout(&tree, Viewport::default(), 8.0);
        assert_eq!(nav.closest_in_direction(a, Direction::Right, &tree, &layout), Some(b));

        nav.invalidate();
        assert_eq!(nav.closest_in_direction(top, Direction::Right, &tree, &layout), None);
        assert_eq!(nav.closest_in_direction(top, Direction::Down, &tree, &layout), Some(c));
    }
}
