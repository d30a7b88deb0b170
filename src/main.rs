//! Maze Concerto entry point
//!
//! Headless demo driver: runs the simulation at a fixed step with a
//! scripted rotation control, mirrors the spin sign into the audio
//! synchronizer, and prints the run log if the ball finds the goal.

use maze_concerto::audio::{LoopBuffer, MusicSynchronizer, PlaybackDirection, PlaybackSink};
use maze_concerto::records::{CompletionRecord, RunLog};
use maze_concerto::settings::Params;
use maze_concerto::sim::{SimState, TickInput, tick};
use maze_concerto::tuning::Tuning;

/// Sink that logs playback commands instead of touching a device.
struct LogSink;

impl PlaybackSink for LogSink {
    fn start(&mut self, direction: PlaybackDirection, rate: f64, offset: f64) {
        log::info!("audio start: {direction:?} rate {rate:.2} offset {offset:.2}s");
    }

    fn stop(&mut self) {
        log::debug!("audio stop");
    }

    fn set_rate(&mut self, rate: f64) {
        log::debug!("audio rate {rate:.2}");
    }
}

fn main() {
    env_logger::init();

    let tuning = Tuning::default();
    let params = Params::default();

    let mut state = match SimState::new(0xCC0FFEE, &params, &tuning) {
        Ok(state) => state,
        Err(e) => {
            log::error!("could not build session: {e}");
            return;
        }
    };

    let mut music = MusicSynchronizer::new(LogSink);
    // Stand-in for the host's decoded track: eight seconds of silence.
    match LoopBuffer::new(vec![0.0; 8 * 44_100], 44_100) {
        Ok(forward) => {
            let reverse = forward.reversed();
            if let Err(e) = music.set_buffers(forward, reverse) {
                log::warn!("music disabled: {e}");
            }
        }
        Err(e) => log::warn!("music disabled: {e}"),
    }

    let dt = 1.0 / 60.0f32;
    let mut now = 0.0f64;
    let mut runs = RunLog::new();

    // Up to five simulated minutes; flip the spin every four seconds the
    // way a player worrying the rotate button would.
    for frame in 0u32..5 * 60 * 60 {
        let hold_reverse = (frame / 240) % 2 == 1;
        let input = TickInput {
            angular_velocity: if hold_reverse {
                -params.rotation_speed
            } else {
                params.rotation_speed
            },
        };

        let events = tick(&mut state, &input, &params, dt, &tuning);
        music.update(now, events.playback_direction, 1.0, &tuning);
        now += dt as f64;

        if events.completed {
            let date = chrono::Utc::now().to_rfc3339();
            runs.push(CompletionRecord::from_run(&state, &params, date));
            break;
        }
    }

    if runs.is_empty() {
        log::info!("goal not reached within the demo window");
        return;
    }

    match runs.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("could not export run log: {e}"),
    }
}
