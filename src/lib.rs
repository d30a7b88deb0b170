//! Maze Concerto - a ball rolling through a rotating square maze
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision, maze generation, physics)
//! - `audio`: Direction-reversible loop playback synchronization
//! - `records`: Completed-run records with JSON import/export
//! - `settings`: User-facing parameter dials
//! - `tuning`: Data-driven calibration constants

pub mod audio;
pub mod records;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Params;
pub use tuning::Tuning;

use glam::Vec2;

/// Rotate a vector by `angle` radians, counter-clockwise.
#[inline]
pub fn rotate_vec(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}
