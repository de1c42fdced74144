//! Hit testing: point → paper edge, divider or leaf.

use crate::config::EngineConfig;
use crate::id::NodeId;
use crate::layout::{ResolvedLayout, Viewport};
use crate::model::{LayoutTree, PageEdge};

/// What sits under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// The grab band along one of the paper edges.
    Edge(PageEdge),
    /// The divider of the split with this id.
    Divider(NodeId),
    Leaf(NodeId),
}

/// Find what is at `(px, py)` on the page.
///
/// Edge bands win over dividers, dividers (with their grab tolerance) win
/// over leaves. Where dividers cross, the most deeply nested one is hit.
/// Returns `None` outside the page.
pub fn hit_test(
    tree: &LayoutTree,
    layout: &ResolvedLayout,
    viewport: Viewport,
    px: f32,
    py: f32,
    config: &EngineConfig,
) -> Option<HitTarget> {
    if !(0.0..=viewport.width).contains(&px) || !(0.0..=viewport.height).contains(&py) {
        return None;
    }

    if let Some(edge) = edge_at(viewport, px, py, config.edge_grab_px) {
        return Some(HitTarget::Edge(edge));
    }

    // Dividers are stored parents first.
    if let Some(divider) = layout
        .dividers
        .iter()
        .rev()
        .find(|d| d.bounds.inflate(config.divider_grab_px).contains(px, py))
    {
        return Some(HitTarget::Divider(divider.split));
    }

    tree.leaves()
        .into_iter()
        .map(|idx| tree.node(idx).id)
        .find(|id| layout.bounds(*id).is_some_and(|b| b.contains(px, py)))
        .map(HitTarget::Leaf)
}

fn edge_at(viewport: Viewport, px: f32, py: f32, band: f32) -> Option<PageEdge> {
    if band <= 0.0 {
        return None;
    }
    if px <= band {
        Some(PageEdge::Left)
    } else if px >= viewport.width - band {
        Some(PageEdge::Right)
    } else if py <= band {
        Some(PageEdge::Top)
    } else if py >= viewport.height - band {
        Some(PageEdge::Bottom)
    } else {
        None
    }
}
