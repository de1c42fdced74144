//! Snap candidate engine.
//!
//! Candidate positions are percentages of a split's content box, i.e. the
//! value the split's first child would take. Keyboard snapping works on these
//! percentages directly; drag snapping converts them to pixel centres once at
//! drag start (see `quire-editor::drag`).

use crate::config::SnapConfig;
use crate::model::Direction;
use std::fmt;

/// Smallest value any candidate is offered at.
pub const CANDIDATE_MIN: f32 = 1.0;
/// Largest value any candidate is offered at.
pub const CANDIDATE_MAX: f32 = 99.0;

/// Where a candidate came from. Surfaced to the user when a snap engages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapKind {
    Grid,
    Subdivision,
    SizeMatch,
    Alignment,
    Boundary,
}

impl fmt::Display for SnapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Grid => "grid",
            Self::Subdivision => "subdivision",
            Self::SizeMatch => "size match",
            Self::Alignment => "alignment",
            Self::Boundary => "boundary",
        })
    }
}

/// A proposed divider position, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapCandidate {
    pub value: f32,
    pub kind: SnapKind,
}

impl SnapCandidate {
    pub fn new(value: f32, kind: SnapKind) -> Self {
        Self {
            value: clamp_candidate(value),
            kind,
        }
    }
}

/// Clamp a candidate value into `[CANDIDATE_MIN, CANDIDATE_MAX]`.
pub fn clamp_candidate(value: f32) -> f32 {
    if value.is_nan() {
        return 50.0;
    }
    value.clamp(CANDIDATE_MIN, CANDIDATE_MAX)
}

// ─── Selection ───────────────────────────────────────────────────────────

/// Pick the next snap position from `current` moving in `direction`.
///
/// Only candidates strictly ahead of `current` are considered. Standard
/// candidates must be at least `min_jump` away, priority candidates only
/// `priority_epsilon`. The closest survivor wins; on equal distance the one
/// evaluated later wins, and priority candidates are evaluated after
/// standard ones.
pub fn find_next_snap_point(
    current: f32,
    standard: &[SnapCandidate],
    priority: &[SnapCandidate],
    direction: Direction,
    config: &SnapConfig,
) -> Option<SnapCandidate> {
    let forward = direction.is_forward();
    let tiers = [
        (standard, config.min_jump),
        (priority, config.priority_epsilon),
    ];

    let mut best: Option<(f32, SnapCandidate)> = None;
    for (candidates, threshold) in tiers {
        for candidate in candidates {
            let ahead = if forward {
                candidate.value > current
            } else {
                candidate.value < current
            };
            if !ahead {
                continue;
            }
            let distance = (candidate.value - current).abs();
            if distance < threshold {
                continue;
            }
            if best.is_none_or(|(d, _)| distance <= d) {
                best = Some((distance, *candidate));
            }
        }
    }
    best.map(|(_, c)| c)
}

/// Where a keyboard snap lands when no candidate qualified: the boundary in
/// `direction`, unless `current` is already there.
pub fn boundary_fallback(
    current: f32,
    direction: Direction,
    config: &SnapConfig,
) -> Option<SnapCandidate> {
    let target = if direction.is_forward() {
        (current < config.boundary_max).then_some(config.boundary_max)
    } else {
        (current > config.boundary_min).then_some(config.boundary_min)
    };
    target.map(|value| SnapCandidate {
        value,
        kind: SnapKind::Boundary,
    })
}

// ─── Candidate sources ───────────────────────────────────────────────────

/// Even fractions of the split for `total_parallel_leaves` leaves, plus 50.
pub fn grid_candidates(total_parallel_leaves: usize) -> Vec<SnapCandidate> {
    let mut out = vec![SnapCandidate::new(50.0, SnapKind::Grid)];
    if total_parallel_leaves > 1 {
        let total = total_parallel_leaves as f32;
        for i in 1..total_parallel_leaves {
            let value = i as f32 / total * 100.0;
            if (value - 50.0).abs() > f32::EPSILON {
                out.push(SnapCandidate::new(value, SnapKind::Grid));
            }
        }
    }
    out
}

/// Bisection points of the larger gap beside `current`, two levels deep.
/// When both gaps are equal both are bisected. A gap no wider than `min_gap`
/// is not subdivided.
pub fn subdivision_candidates(current: f32, min_gap: f32) -> Vec<SnapCandidate> {
    let current = current.clamp(0.0, 100.0);
    let before = current;
    let after = 100.0 - current;
    let mut out = Vec::new();
    if before >= after {
        bisect(0.0, current, min_gap, 2, &mut out);
    }
    if after >= before {
        bisect(current, 100.0, min_gap, 2, &mut out);
    }
    out
}

fn bisect(lo: f32, hi: f32, min_gap: f32, depth: u8, out: &mut Vec<SnapCandidate>) {
    if depth == 0 || hi - lo <= min_gap {
        return;
    }
    let mid = (lo + hi) / 2.0;
    out.push(SnapCandidate::new(mid, SnapKind::Subdivision));
    bisect(lo, mid, min_gap, depth - 1, out);
    bisect(mid, hi, min_gap, depth - 1, out);
}

/// Positions at which either side of the split would be exactly as long as
/// one of `lengths` (pixels, along the split axis). `content_len` is the
/// split's content length in pixels.
pub fn size_match_candidates(lengths: &[f32], content_len: f32) -> Vec<SnapCandidate> {
    if content_len.is_nan() || content_len <= 0.0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(lengths.len() * 2);
    for &len in lengths {
        if !len.is_finite() || len <= 0.0 || len >= content_len {
            continue;
        }
        let p = len / content_len * 100.0;
        out.push(SnapCandidate::new(p, SnapKind::SizeMatch));
        out.push(SnapCandidate::new(100.0 - p, SnapKind::SizeMatch));
    }
    out
}

/// Positions that put the dragged divider's centre on one of `centers`
/// (pixels along the split axis).
///
/// `container_start` is the split's main-axis start, `content_len` its
/// length minus `divider` (the divider thickness).
pub fn alignment_candidates(
    centers: &[f32],
    container_start: f32,
    content_len: f32,
    divider: f32,
) -> Vec<SnapCandidate> {
    if content_len.is_nan() || content_len <= 0.0 {
        return Vec::new();
    }
    centers
        .iter()
        .filter(|c| c.is_finite())
        .map(|&c| (c - container_start - divider / 2.0) / content_len * 100.0)
        .filter(|p| *p > 0.0 && *p < 100.0)
        .map(|p| SnapCandidate::new(p, SnapKind::Alignment))
        .collect()
}

/// Divider centre (pixels) for a first-child share of `percent`.
pub fn percent_to_center(percent: f32, container_start: f32, content_len: f32, divider: f32) -> f32 {
    container_start + content_len * percent / 100.0 + divider / 2.0
}
