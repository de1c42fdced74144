//! Divider drag/resize state machine.
//!
//! ```text
//! Idle ──begin──▶ Dragging ──update*──▶ Dragging ──finish/cancel──▶ Idle
//! ```
//!
//! The controller works purely in pixels captured at `begin`: the two
//! siblings' lengths, the divider thickness and the container start along
//! the split axis. Pointer positions are turned into a new first-child
//! length relative to the pointer origin, so live preview writes into the
//! tree do not feed back into the computation.
//!
//! Snap points are cached as pixel centres at `begin`. While Shift is held,
//! a projected divider centre within `drag_threshold_px` of a cached centre
//! is pulled exactly onto it; the engagement is reported once per newly
//! engaged point rather than on every frame.
//!
//! Edge drags reuse this machine unchanged once the editor has wrapped the
//! page root in a new split.

use quire_core::snap::{
    SnapKind, alignment_candidates, grid_candidates, percent_to_center, size_match_candidates,
};
use quire_core::tree::normalize_pair;
use quire_core::{EngineConfig, LayoutTree, NodeId, NodeIndex, Orientation, ResolvedLayout};
use smallvec::SmallVec;

// ─── Split geometry ──────────────────────────────────────────────────────

/// Pixel geometry of a split and its two children along the split axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitGeometry {
    pub split: NodeId,
    pub orientation: Orientation,
    pub first: NodeId,
    pub second: NodeId,
    /// Main-axis start of the split's rectangle.
    pub container_start: f32,
    pub first_px: f32,
    pub second_px: f32,
    pub divider_px: f32,
}

impl SplitGeometry {
    /// Read the geometry of `split` from a resolved layout. `None` if the
    /// node is missing, not a split, or has no resolved bounds.
    pub fn resolve(tree: &LayoutTree, layout: &ResolvedLayout, split: NodeId) -> Option<Self> {
        let idx = tree.index_of(split)?;
        let orientation = tree.node(idx).orientation()?;
        let [first, second] = tree.children(idx)?;
        let first = tree.node(first).id;
        let second = tree.node(second).id;
        let container = layout.bounds(split)?;
        let first_bounds = layout.bounds(first)?;
        let second_bounds = layout.bounds(second)?;
        let divider = layout.divider(split)?;
        Some(Self {
            split,
            orientation,
            first,
            second,
            container_start: container.main_start(orientation),
            first_px: first_bounds.main_len(orientation),
            second_px: second_bounds.main_len(orientation),
            divider_px: divider.bounds.main_len(orientation),
        })
    }

    /// Length shared by the two children.
    pub fn content_len(&self) -> f32 {
        self.first_px + self.second_px
    }

    /// Current first-child share in percent.
    pub fn first_percent(&self) -> f32 {
        normalize_pair(self.first_px, self.second_px)
            .map(|(first, _)| first)
            .unwrap_or(50.0)
    }
}

/// Main-axis lengths of every leaf outside `split`, used for size matching.
pub fn outside_leaf_lengths(
    tree: &LayoutTree,
    layout: &ResolvedLayout,
    split: NodeIndex,
    orientation: Orientation,
) -> Vec<f32> {
    tree.leaves()
        .into_iter()
        .filter(|idx| !tree.is_within(*idx, split))
        .filter_map(|idx| layout.bounds(tree.node(idx).id))
        .map(|b| b.main_len(orientation))
        .collect()
}

// ─── Drag session ────────────────────────────────────────────────────────

/// A cached snap target in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    /// Divider centre along the split axis, in pixels.
    pub center: f32,
    pub kind: SnapKind,
}

/// Live state of one drag.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub geometry: SplitGeometry,
    /// Pointer position along the split axis at `begin`.
    origin: f32,
    /// First-child length after the latest update.
    current_first_px: f32,
    threshold_px: f32,
    snap_points: SmallVec<[SnapPoint; 16]>,
    engaged: Option<SnapPoint>,
}

impl DragSession {
    pub fn split(&self) -> NodeId {
        self.geometry.split
    }

    pub fn snap_points(&self) -> &[SnapPoint] {
        &self.snap_points
    }

    fn percentages(&self) -> (f32, f32) {
        let content = self.geometry.content_len();
        normalize_pair(self.current_first_px, content - self.current_first_px)
            .unwrap_or((50.0, 50.0))
    }
}

#[derive(Debug, Clone, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(Box<DragSession>),
}

/// Result of one pointer move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    pub split: NodeId,
    pub first_percent: f32,
    pub second_percent: f32,
    /// Set only on the frame a snap point becomes engaged.
    pub engaged: Option<SnapPoint>,
}

/// Final proportions to write on release. Always sums to 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragCommit {
    pub split: NodeId,
    pub first_percent: f32,
    pub second_percent: f32,
}

/// Owns the single active drag, if any.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session.as_ref()),
            DragState::Idle => None,
        }
    }

    /// Start dragging the divider of `split`.
    ///
    /// `pointer` is the pointer position in page pixels. Returns `false`
    /// (leaving the controller untouched) if a drag is already active or the
    /// split has no usable geometry.
    pub fn begin(
        &mut self,
        tree: &LayoutTree,
        layout: &ResolvedLayout,
        split: NodeId,
        pointer: (f32, f32),
        cache_snaps: bool,
        config: &EngineConfig,
    ) -> bool {
        if let DragState::Dragging(active) = &self.state {
            log::warn!(
                "drag on {split} refused: {} is already being dragged",
                active.split()
            );
            return false;
        }
        let Some(geometry) = SplitGeometry::resolve(tree, layout, split) else {
            log::debug!("drag on {split} ignored: no geometry");
            return false;
        };

        let snap_points = if cache_snaps {
            collect_snap_points(tree, layout, &geometry)
        } else {
            SmallVec::new()
        };
        log::debug!(
            "drag begin on {split}: {:.1}px | {:.1}px, {} snap points",
            geometry.first_px,
            geometry.second_px,
            snap_points.len()
        );

        self.state = DragState::Dragging(Box::new(DragSession {
            origin: main_axis(pointer, geometry.orientation),
            current_first_px: geometry.first_px,
            threshold_px: config.snap.drag_threshold_px,
            snap_points,
            engaged: None,
            geometry,
        }));
        true
    }

    /// Apply a pointer move. `snap` is whether Shift is held.
    pub fn update(&mut self, pointer: (f32, f32), snap: bool) -> Option<DragUpdate> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        let g = session.geometry;
        let content = g.content_len();
        let delta = main_axis(pointer, g.orientation) - session.origin;
        let mut first = clamp_len(g.first_px + delta, content);

        let mut newly_engaged = None;
        if snap {
            let center = g.container_start + first + g.divider_px / 2.0;
            let nearest = nearest_snap(&session.snap_points, center, session.threshold_px);
            match nearest {
                Some(point) => {
                    first = clamp_len(point.center - g.container_start - g.divider_px / 2.0, content);
                    if session.engaged != Some(point) {
                        session.engaged = Some(point);
                        newly_engaged = Some(point);
                    }
                }
                None => session.engaged = None,
            }
        } else {
            session.engaged = None;
        }

        session.current_first_px = first;
        let (first_percent, second_percent) = session.percentages();
        log::trace!(
            "drag {}: {first_percent:.2}% | {second_percent:.2}%",
            g.split
        );
        Some(DragUpdate {
            split: g.split,
            first_percent,
            second_percent,
            engaged: newly_engaged,
        })
    }

    /// End the drag and return the proportions to commit.
    pub fn finish(&mut self) -> Option<DragCommit> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        let (first_percent, second_percent) = session.percentages();
        log::debug!(
            "drag end on {}: {first_percent:.2}% | {second_percent:.2}%",
            session.split()
        );
        Some(DragCommit {
            split: session.split(),
            first_percent,
            second_percent,
        })
    }

    /// Pointer capture was lost. Commits like [`finish`](Self::finish) so
    /// the tree matches what was last rendered.
    pub fn cancel(&mut self) -> Option<DragCommit> {
        self.finish()
    }
}

fn main_axis(pointer: (f32, f32), orientation: Orientation) -> f32 {
    match orientation {
        Orientation::Vertical => pointer.0,
        Orientation::Horizontal => pointer.1,
    }
}

/// Clamp a first-child length into `[0, content]`, mapping NaN to 0.
fn clamp_len(len: f32, content: f32) -> f32 {
    if len.is_nan() {
        return 0.0;
    }
    len.clamp(0.0, content.max(0.0))
}

/// Closest cached point within `threshold` of `center`. Earlier points win
/// ties, so alignment (cached first) beats size matches and grid fractions.
fn nearest_snap(points: &[SnapPoint], center: f32, threshold: f32) -> Option<SnapPoint> {
    let mut best: Option<(f32, SnapPoint)> = None;
    for point in points {
        let distance = (point.center - center).abs();
        if distance <= threshold && best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, *point));
        }
    }
    best.map(|(_, p)| p)
}

/// Alignment, size-match and grid targets for `g`, as pixel centres.
fn collect_snap_points(
    tree: &LayoutTree,
    layout: &ResolvedLayout,
    g: &SplitGeometry,
) -> SmallVec<[SnapPoint; 16]> {
    let mut points = SmallVec::new();
    let content = g.content_len();
    let Some(split_idx) = tree.index_of(g.split) else {
        return points;
    };

    let centers = layout.divider_centers(g.orientation, g.split);
    let lengths = outside_leaf_lengths(tree, layout, split_idx, g.orientation);
    let total: usize = [g.first, g.second]
        .into_iter()
        .filter_map(|id| tree.index_of(id))
        .map(|idx| tree.count_parallel_leaves(idx, g.orientation))
        .sum();

    let candidates = alignment_candidates(&centers, g.container_start, content, g.divider_px)
        .into_iter()
        .chain(size_match_candidates(&lengths, content))
        .chain(grid_candidates(total));
    for candidate in candidates {
        points.push(SnapPoint {
            center: percent_to_center(candidate.value, g.container_start, content, g.divider_px),
            kind: candidate.kind,
        });
    }
    points
}
