//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - No rendering or platform dependencies
//! - One mutator per piece of state per tick, in a fixed order

pub mod collision;
pub mod maze;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, CollisionSource, detect_boundary, detect_wall_segment};
pub use maze::{Maze, MazeError, MazeGrid, WallSegment};
pub use state::{Ball, Boundary, Firework, GamePhase, SimState, boundary_size_for, FIREWORK_COUNT};
pub use tick::{TickEvents, TickInput, physics_step, tick};
