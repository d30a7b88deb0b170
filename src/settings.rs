//! User-facing simulation parameters
//!
//! The four dials the host UI exposes. Values are clamped on the way in
//! so the simulation never sees an out-of-range dial.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Simulation parameter dials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Fraction of incoming normal velocity kept after a bounce.
    pub restitution: f32,
    /// Boundary angular speed magnitude, radians per second.
    pub rotation_speed: f32,
    /// Gravity dial, scaled into world units by `Tuning::gravity_scale`.
    pub gravity: f32,
    /// Maze grid dimension (complexity x complexity cells).
    pub maze_complexity: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            restitution: 0.7,
            rotation_speed: 1.0,
            gravity: 9.8,
            maze_complexity: 10,
        }
    }
}

impl Params {
    /// Set restitution, clamped to the tuning ceiling.
    pub fn set_restitution(&mut self, value: f32, tuning: &Tuning) {
        self.restitution = value.clamp(0.0, tuning.max_restitution);
    }

    /// Set maze complexity; a grid needs at least one cell per side.
    pub fn set_maze_complexity(&mut self, value: u32) {
        self.maze_complexity = value.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restitution_clamps_to_ceiling() {
        let tuning = Tuning::default();
        let mut params = Params::default();
        params.set_restitution(1.5, &tuning);
        assert_eq!(params.restitution, 0.98);
        params.set_restitution(-0.5, &tuning);
        assert_eq!(params.restitution, 0.0);
    }

    #[test]
    fn test_complexity_floor() {
        let mut params = Params::default();
        params.set_maze_complexity(0);
        assert_eq!(params.maze_complexity, 1);
    }

    #[test]
    fn test_params_round_trip_through_json() {
        let params = Params::default();
        let json = serde_json::to_string(&params).unwrap();
        let back: Params = serde_json::from_str(&json).unwrap();
        assert_eq!(back.maze_complexity, 10);
        assert_eq!(back.restitution, 0.7);
    }
}
