//! Per-frame simulation step
//!
//! `physics_step` advances the ball against the rotating boundary and the
//! maze walls; `tick` wraps it into the full session step: rotation,
//! timing, goal detection and the completion fireworks.

use super::collision::{CollisionSource, detect_boundary, detect_wall_segment};
use super::maze::Maze;
use super::state::{Ball, Boundary, GamePhase, SimState};
use crate::audio::PlaybackDirection;
use crate::rotate_vec;
use crate::settings::Params;
use crate::tuning::Tuning;

/// Downward pull on celebration particles, per tick.
const FIREWORK_GRAVITY: f32 = 0.05;

/// Host inputs for one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Externally supplied boundary angular velocity, radians per second.
    /// The host flips the sign while its rotation control is held.
    pub angular_velocity: f32,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickEvents {
    /// The ball touched the boundary or a wall this tick.
    pub collided: bool,
    /// The ball reached the goal this tick (reported once per run).
    pub completed: bool,
    /// Playback direction implied by the angular velocity sign.
    pub playback_direction: PlaybackDirection,
}

/// Advance the ball one time step.
///
/// Semi-implicit Euler: gravity integrates into velocity first, then the
/// tentative position is corrected by repeatedly resolving the deepest
/// penetration, up to the tuning iteration budget. Each resolution
/// reflects the inbound velocity component (restitution clamped to the
/// tuning ceiling) and pushes the position out along the contact normal
/// by the full penetration. Overlap still present when the budget runs
/// out is accepted.
///
/// Returns whether any collision occurred.
pub fn physics_step(
    ball: &mut Ball,
    boundary: &Boundary,
    maze: Option<&Maze>,
    params: &Params,
    dt: f32,
    tuning: &Tuning,
) -> bool {
    ball.vel.y += params.gravity * dt * tuning.gravity_scale;
    let mut pos = ball.pos + ball.vel * dt;

    let radius = tuning.ball_radius;
    let restitution = params.restitution.min(tuning.max_restitution);
    let mut collided = false;

    for _ in 0..tuning.max_resolve_iterations {
        let mut deepest = detect_boundary(pos, boundary, radius, tuning);
        if let Some(maze) = maze {
            for wall in &maze.walls {
                let a = boundary.local_to_global(wall.a);
                let b = boundary.local_to_global(wall.b);
                let hit = detect_wall_segment(pos, a, b, radius, tuning);
                if hit.hit && hit.penetration > deepest.penetration {
                    deepest = hit;
                }
            }
        }
        if !deepest.hit {
            break;
        }
        collided = true;

        // Boundary contacts report local-frame normals.
        let normal = match deepest.source {
            CollisionSource::Boundary => rotate_vec(deepest.normal, boundary.rotation),
            CollisionSource::Wall => deepest.normal,
        };

        let inbound = ball.vel.dot(normal);
        if inbound < 0.0 {
            ball.vel += -(1.0 + restitution) * inbound * normal;
        }
        pos += normal * deepest.penetration;
    }

    ball.pos = pos;
    collided
}

/// Advance the whole session one frame.
///
/// The frame delta is clamped before integration so a stalled frame
/// cannot tunnel the ball through geometry. Per-tick order is fixed:
/// rotation, physics, goal check. The returned events carry the playback
/// direction for the host to feed the audio synchronizer.
pub fn tick(
    state: &mut SimState,
    input: &TickInput,
    params: &Params,
    dt: f32,
    tuning: &Tuning,
) -> TickEvents {
    let dt = dt.min(tuning.max_frame_dt);
    let mut events = TickEvents::default();

    match state.phase {
        GamePhase::Playing => {
            events.playback_direction = if input.angular_velocity >= 0.0 {
                PlaybackDirection::Forward
            } else {
                PlaybackDirection::Reverse
            };
            if input.angular_velocity != 0.0 {
                state.started = true;
            }
            state.boundary.rotation += input.angular_velocity * dt;

            events.collided = physics_step(
                &mut state.ball,
                &state.boundary,
                Some(&state.maze),
                params,
                dt,
                tuning,
            );

            if state.started {
                state.time_spent += dt;
            }

            let goal = state.boundary.local_to_global(state.maze.endpoint);
            if state.ball.pos.distance(goal) < tuning.ball_radius {
                state.phase = GamePhase::Completed;
                state.spawn_fireworks(goal);
                log::info!("maze completed in {:.1}s", state.time_spent);
                if !state.recorded {
                    state.recorded = true;
                    events.completed = true;
                }
            }
        }
        GamePhase::Completed => {
            // The celebration always plays the track forward.
            for p in state.fireworks.iter_mut() {
                p.pos += p.vel;
                p.vel.y += FIREWORK_GRAVITY;
                p.lifetime -= 1.0;
            }
            state.fireworks.retain(|p| p.lifetime > 0.0);
        }
    }

    events
}
