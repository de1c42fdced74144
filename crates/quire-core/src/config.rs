//! Engine tuning knobs.
//!
//! Every threshold the engine uses lives here so hosts can load them from a
//! JSON settings blob. Missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

// ─── Snap ─────────────────────────────────────────────────────────────────

/// Thresholds for snap candidate selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnapConfig {
    /// Minimum distance (percentage points) a standard candidate must be from
    /// the current position to be taken by a keyboard snap.
    pub min_jump: f32,

    /// Minimum distance for priority candidates (alignment, size matches).
    pub priority_epsilon: f32,

    /// Screen-space distance (px) within which a Shift-drag engages a
    /// cached snap point.
    pub drag_threshold_px: f32,

    /// Gaps narrower than this (percentage points) are not subdivided.
    pub subdivision_min_gap: f32,

    /// Keyboard-snap fallback when no candidate qualifies moving backward.
    pub boundary_min: f32,

    /// Keyboard-snap fallback when no candidate qualifies moving forward.
    pub boundary_max: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            min_jump: 1.2,
            priority_epsilon: 0.01,
            drag_threshold_px: 8.0,
            subdivision_min_gap: 10.0,
            boundary_min: 1.0,
            boundary_max: 99.0,
        }
    }
}

// ─── Engine ───────────────────────────────────────────────────────────────

/// Top-level configuration for the layout engine and editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub snap: SnapConfig,

    /// A node whose effective area (percent of the resized split) ends at or
    /// below this value after a resize is removed.
    pub min_area_percent: f32,

    /// Maximum number of undo snapshots kept.
    pub history_depth: usize,

    /// Divider thickness in pixels; subtracted from a split's main axis
    /// before children are sized.
    pub divider_thickness: f32,

    /// Initial size (percent) of the empty leaf created by an edge drag.
    pub edge_seed_percent: f32,

    /// Width (px) of the paper-edge grab band.
    pub edge_grab_px: f32,

    /// Extra grab tolerance (px) around a divider.
    pub divider_grab_px: f32,

    /// Precompute divider centres and snap points at drag start.
    pub cache_drag_snaps: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snap: SnapConfig::default(),
            min_area_percent: 1.0,
            history_depth: 100,
            divider_thickness: 8.0,
            edge_seed_percent: 0.5,
            edge_grab_px: 6.0,
            divider_grab_px: 4.0,
            cache_drag_snaps: true,
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON settings object.
    ///
    /// # Errors
    /// Returns the `serde_json` error if the input is not valid JSON or a
    /// field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        log::debug!("loaded engine config: {config:?}");
        Ok(config)
    }
}
