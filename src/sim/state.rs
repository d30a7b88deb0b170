//! Simulation state and the owning session context
//!
//! `SimState` is the one owning context: the host constructs it, steps
//! it each frame, and reads state back out for rendering. No global
//! state anywhere. Boundary and Maze are replaced wholesale on restart;
//! the ball is mutated in place by the physics step.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::maze::{Maze, MazeError};
use crate::records::CompletionRecord;
use crate::rotate_vec;
use crate::settings::Params;
use crate::tuning::Tuning;

/// The rotating square container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boundary {
    pub center: Vec2,
    /// Edge length. Grows past the configured minimum to fit the maze.
    pub size: f32,
    /// Rotation about the center, radians.
    pub rotation: f32,
}

impl Boundary {
    /// Transform a point from the boundary's local frame to the global
    /// frame.
    #[inline]
    pub fn local_to_global(&self, p: Vec2) -> Vec2 {
        self.center + rotate_vec(p, self.rotation)
    }
}

/// The single dynamic body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball live inside the maze
    Playing,
    /// Goal reached; fireworks play out until the host restarts
    Completed,
}

/// A celebration particle spawned at the goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Firework {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in ticks
    pub lifetime: f32,
    /// Hue in degrees for the renderer's color lookup
    pub hue: f32,
}

/// Particles in one goal celebration burst
pub const FIREWORK_COUNT: usize = 100;

/// Complete simulation context owned by the host.
#[derive(Debug, Clone)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub boundary: Boundary,
    pub ball: Ball,
    pub maze: Maze,
    pub phase: GamePhase,
    /// Seconds of play accumulated since the rotation control was first
    /// engaged this run.
    pub time_spent: f32,
    /// Whether the rotation control has been engaged this run.
    pub started: bool,
    /// Set once the completion of this run has been reported.
    pub recorded: bool,
    pub fireworks: Vec<Firework>,
    rng: Pcg32,
}

impl SimState {
    /// Start a fresh session: new maze, boundary sized to fit it, ball
    /// resting at the start cell center.
    pub fn new(seed: u64, params: &Params, tuning: &Tuning) -> Result<Self, MazeError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let size = boundary_size_for(params.maze_complexity, tuning);
        let maze = Maze::generate(params.maze_complexity, size, &mut rng)?;
        let boundary = Boundary {
            center: Vec2::ZERO,
            size,
            rotation: 0.0,
        };
        let ball = Ball {
            pos: boundary.local_to_global(maze.start_center(size)),
            vel: Vec2::ZERO,
        };
        log::info!(
            "new run: {0}x{0} maze, boundary {1}",
            params.maze_complexity,
            size
        );
        Ok(Self {
            seed,
            boundary,
            ball,
            maze,
            phase: GamePhase::Playing,
            time_spent: 0.0,
            started: false,
            recorded: false,
            fireworks: Vec::new(),
            rng,
        })
    }

    /// Restart with a newly generated maze, continuing the RNG stream.
    pub fn restart(&mut self, params: &Params, tuning: &Tuning) -> Result<(), MazeError> {
        let size = boundary_size_for(params.maze_complexity, tuning);
        self.maze = Maze::generate(params.maze_complexity, size, &mut self.rng)?;
        self.boundary.size = size;
        self.reset_run();
        log::info!(
            "restart: {0}x{0} maze, boundary {1}",
            params.maze_complexity,
            size
        );
        Ok(())
    }

    /// Rebuild the session from an imported run record instead of
    /// generating. Updates the dials to the record's values.
    pub fn load_record(
        &mut self,
        record: &CompletionRecord,
        params: &mut Params,
        tuning: &Tuning,
    ) -> Result<(), MazeError> {
        let maze = record.to_maze()?;

        params.set_restitution(record.restitution, tuning);
        params.rotation_speed = record.rotation_speed;
        params.gravity = record.gravity;
        params.maze_complexity = record.maze_complexity;

        self.boundary.size = record.boundary_size;
        self.maze = maze;
        self.reset_run();
        log::info!(
            "loaded record: {0}x{0} maze, boundary {1}",
            record.maze_complexity,
            record.boundary_size
        );
        Ok(())
    }

    /// Put the run back at its initial conditions for the current maze.
    fn reset_run(&mut self) {
        self.boundary.rotation = 0.0;
        self.ball = Ball {
            pos: self
                .boundary
                .local_to_global(self.maze.start_center(self.boundary.size)),
            vel: Vec2::ZERO,
        };
        self.phase = GamePhase::Playing;
        self.time_spent = 0.0;
        self.started = false;
        self.recorded = false;
        self.fireworks.clear();
    }

    /// Spawn the goal celebration burst at a global position.
    pub(crate) fn spawn_fireworks(&mut self, at: Vec2) {
        self.fireworks.clear();
        for _ in 0..FIREWORK_COUNT {
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.random_range(2.0..5.0);
            self.fireworks.push(Firework {
                pos: at,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                lifetime: self.rng.random_range(60.0..120.0),
                hue: self.rng.random_range(0.0..360.0),
            });
        }
    }
}

/// Boundary edge length for a maze of the given complexity: every cell
/// must fit the ball plus clearance, but never below the configured
/// minimum.
pub fn boundary_size_for(complexity: u32, tuning: &Tuning) -> f32 {
    let required = complexity as f32 * (2.0 * tuning.ball_radius + tuning.cell_clearance);
    required.max(tuning.min_boundary_size)
}
