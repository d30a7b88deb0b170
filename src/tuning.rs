//! Data-driven calibration constants
//!
//! These numbers calibrate the feel of the simulation rather than encode
//! physical law. Defaults are the values the game shipped with; load a
//! deserialized `Tuning` to re-balance without touching code.

use serde::{Deserialize, Serialize};

/// Calibration knobs shared by the physics, maze sizing and audio code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Converts the gravity dial into world units per second squared.
    pub gravity_scale: f32,
    /// Collision inflation as a fraction of the ball radius; keeps resolved
    /// positions visually clear of geometry at low frame rates.
    pub collision_margin_factor: f32,
    /// Iteration budget for penetration resolution. Overlap left when the
    /// budget runs out is accepted as-is.
    pub max_resolve_iterations: u32,
    /// Restitution ceiling. The margin push-out already adds energy, so a
    /// full 1.0 bounce would gain speed every hit.
    pub max_restitution: f32,
    /// Playback-rate delta below which a rate change applies in place
    /// instead of restarting the audio session.
    pub rate_change_threshold: f64,
    /// Frame delta clamp in seconds; bounds integration error on a stalled
    /// frame.
    pub max_frame_dt: f32,
    /// Smallest allowed boundary edge length.
    pub min_boundary_size: f32,
    /// Ball radius in world units.
    pub ball_radius: f32,
    /// Extra per-cell width beyond the ball diameter when sizing the
    /// boundary to fit a maze.
    pub cell_clearance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity_scale: 50.0,
            collision_margin_factor: 0.2,
            max_resolve_iterations: 10,
            max_restitution: 0.98,
            rate_change_threshold: 0.1,
            max_frame_dt: 0.1,
            min_boundary_size: 300.0,
            ball_radius: 10.0,
            cell_clearance: 10.0,
        }
    }
}

impl Tuning {
    /// Collision safety margin for a ball of the given radius.
    #[inline]
    pub fn margin(&self, radius: f32) -> f32 {
        radius * self.collision_margin_factor
    }
}
