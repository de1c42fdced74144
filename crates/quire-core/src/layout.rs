//! Geometry resolution.
//!
//! Turns a page's percentage sizes into absolute pixel rectangles for every
//! node and every divider. The editor uses this as its model of what the
//! renderer has on screen: drag, hit testing, alignment snapping and focus
//! navigation all read from a `ResolvedLayout`.

use crate::id::NodeId;
use crate::model::*;
use crate::tree::normalize_pair;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// The page (paper) dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 1000.0,
        }
    }
}

/// The interactive strip between the two children of a split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividerBounds {
    pub split: NodeId,
    pub orientation: Orientation,
    pub bounds: ResolvedBounds,
}

impl DividerBounds {
    /// Centre of the divider along its split's main axis.
    pub fn center(&self) -> f32 {
        self.bounds.main_start(self.orientation) + self.bounds.main_len(self.orientation) / 2.0
    }
}

/// Pixel geometry of one page.
#[derive(Debug, Clone, Default)]
pub struct ResolvedLayout {
    pub nodes: HashMap<NodeId, ResolvedBounds>,
    pub dividers: Vec<DividerBounds>,
}

impl ResolvedLayout {
    pub fn bounds(&self, id: NodeId) -> Option<ResolvedBounds> {
        self.nodes.get(&id).copied()
    }

    pub fn divider(&self, split: NodeId) -> Option<&DividerBounds> {
        self.dividers.iter().find(|d| d.split == split)
    }

    /// Main-axis centres of every divider of `orientation` except `exclude`.
    pub fn divider_centers(&self, orientation: Orientation, exclude: NodeId) -> Vec<f32> {
        self.dividers
            .iter()
            .filter(|d| d.orientation == orientation && d.split != exclude)
            .map(DividerBounds::center)
            .collect()
    }
}

/// Resolve every node of `tree` into pixel bounds within `viewport`.
///
/// A split's content length is its main-axis length minus
/// `divider_thickness`; each child gets its `size` percent of that. Sizes
/// that do not sum to 100 are rescaled and unusable ones fall back to an
/// even split, so the result never contains NaN.
#[must_use]
pub fn resolve_layout(tree: &LayoutTree, viewport: Viewport, divider_thickness: f32) -> ResolvedLayout {
    let mut layout = ResolvedLayout::default();
    let page = ResolvedBounds {
        x: 0.0,
        y: 0.0,
        width: viewport.width.max(0.0),
        height: viewport.height.max(0.0),
    };
    let thickness = if divider_thickness.is_finite() {
        divider_thickness.max(0.0)
    } else {
        0.0
    };
    resolve_node(tree, tree.root, page, thickness, &mut layout);
    layout
}

fn resolve_node(
    tree: &LayoutTree,
    idx: NodeIndex,
    bounds: ResolvedBounds,
    thickness: f32,
    out: &mut ResolvedLayout,
) {
    let node = tree.node(idx);
    out.nodes.insert(node.id, bounds);

    let (Some(orientation), Some([first, second])) = (node.orientation(), tree.children(idx))
    else {
        return;
    };

    let main_len = bounds.main_len(orientation);
    let divider = thickness.min(main_len);
    let content = (main_len - divider).max(0.0);
    let (first_pct, _) = normalize_pair(tree.node(first).size, tree.node(second).size)
        .unwrap_or((50.0, 50.0));

    let start = bounds.main_start(orientation);
    let first_len = content * first_pct / 100.0;
    let second_len = content - first_len;

    let first_bounds = with_main(bounds, orientation, start, first_len);
    let divider_bounds = with_main(bounds, orientation, start + first_len, divider);
    let second_bounds = with_main(bounds, orientation, start + first_len + divider, second_len);

    out.dividers.push(DividerBounds {
        split: node.id,
        orientation,
        bounds: divider_bounds,
    });
    resolve_node(tree, first, first_bounds, thickness, out);
    resolve_node(tree, second, second_bounds, thickness, out);
}

/// Copy of `bounds` with its main-axis extent replaced.
fn with_main(bounds: ResolvedBounds, orientation: Orientation, start: f32, len: f32) -> ResolvedBounds {
    match orientation {
        Orientation::Vertical => ResolvedBounds {
            x: start,
            width: len,
            ..bounds
        },
        Orientation::Horizontal => ResolvedBounds {
            y: start,
            height: len,
            ..bounds
        },
    }
}
