//! Completed-run records
//!
//! A finished run exports everything needed to replay its exact setup:
//! the dials, the boundary size, the maze walls and the goal. Importing a
//! record rebuilds the maze from those fields alone, without re-running
//! generation. Field names are part of the export format; previously
//! exported files must keep round-tripping.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::Params;
use crate::sim::maze::{Maze, MazeError, WallSegment, vec2_xy};
use crate::sim::state::SimState;

/// Errors on record import.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record JSON is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("record list is empty")]
    Empty,
}

/// One completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub restitution: f32,
    pub rotation_speed: f32,
    pub gravity: f32,
    pub maze_complexity: u32,
    pub boundary_size: f32,
    pub maze_walls: Vec<WallSegment>,
    #[serde(with = "vec2_xy")]
    pub endpoint: Vec2,
    /// Play time in seconds, rounded to a tenth.
    pub time_spent: f32,
    /// Wall-clock date string supplied by the host; the core has no clock.
    pub completion_date: String,
}

impl CompletionRecord {
    /// Snapshot a completed run.
    pub fn from_run(state: &SimState, params: &Params, completion_date: String) -> Self {
        Self {
            restitution: params.restitution,
            rotation_speed: params.rotation_speed,
            gravity: params.gravity,
            maze_complexity: params.maze_complexity,
            boundary_size: state.boundary.size,
            maze_walls: state.maze.walls.clone(),
            endpoint: state.maze.endpoint,
            time_spent: (state.time_spent * 10.0).round() / 10.0,
            completion_date,
        }
    }

    /// Rebuild the maze this record describes.
    pub fn to_maze(&self) -> Result<Maze, MazeError> {
        Maze::from_parts(
            self.maze_complexity,
            self.boundary_size,
            self.maze_walls.clone(),
            self.endpoint,
        )
    }

    /// Parse a record from JSON that may be either a single record or an
    /// exported array; an array yields its most recent (last) entry.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            Many(Vec<CompletionRecord>),
            One(Box<CompletionRecord>),
        }

        match serde_json::from_str(json)? {
            OneOrMany::One(record) => Ok(*record),
            OneOrMany::Many(mut records) => {
                if records.len() > 1 {
                    log::warn!("imported {} records, keeping the last", records.len());
                }
                records.pop().ok_or(RecordError::Empty)
            }
        }
    }
}

/// Records accumulated over a session, exported as a JSON array.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    entries: Vec<CompletionRecord>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: CompletionRecord) {
        self.entries.push(record);
    }

    pub fn latest(&self) -> Option<&CompletionRecord> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[CompletionRecord] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The export payload: a bare JSON array of records.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }

    /// Parse an exported array back into a log.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let entries: Vec<CompletionRecord> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn sample_record() -> CompletionRecord {
        let mut rng = Pcg32::seed_from_u64(9);
        let maze = Maze::generate(4, 300.0, &mut rng).unwrap();
        CompletionRecord {
            restitution: 0.7,
            rotation_speed: 1.0,
            gravity: 9.8,
            maze_complexity: 4,
            boundary_size: 300.0,
            maze_walls: maze.walls,
            endpoint: maze.endpoint,
            time_spent: 12.3,
            completion_date: "2024-05-01T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let back = CompletionRecord::from_json(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_record_uses_export_field_names() {
        let record = sample_record();
        let value = serde_json::to_value(&record).unwrap();
        for key in [
            "restitution",
            "rotationSpeed",
            "gravity",
            "mazeComplexity",
            "boundarySize",
            "mazeWalls",
            "endpoint",
            "timeSpent",
            "completionDate",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert!(value["mazeWalls"][0]["a"]["x"].is_number());
        assert!(value["endpoint"]["x"].is_number());
    }

    #[test]
    fn test_from_json_accepts_an_exported_array() {
        let mut newer = sample_record();
        newer.time_spent = 99.9;
        let json = serde_json::to_string(&vec![sample_record(), newer.clone()]).unwrap();

        let imported = CompletionRecord::from_json(&json).unwrap();
        assert_eq!(imported, newer);
    }

    #[test]
    fn test_from_json_rejects_an_empty_array() {
        assert!(matches!(
            CompletionRecord::from_json("[]"),
            Err(RecordError::Empty)
        ));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            CompletionRecord::from_json("{\"nope\": 1}"),
            Err(RecordError::Malformed(_))
        ));
    }

    #[test]
    fn test_to_maze_rebuilds_without_generation() {
        let record = sample_record();
        let maze = record.to_maze().unwrap();
        assert_eq!(maze.rows, 4);
        assert_eq!(maze.cell_size, 75.0);
        assert_eq!(maze.walls, record.maze_walls);
        assert_eq!(maze.endpoint, record.endpoint);
    }

    #[test]
    fn test_run_log_round_trips() {
        let mut runs = RunLog::new();
        runs.push(sample_record());
        runs.push(sample_record());
        assert_eq!(runs.len(), 2);

        let json = runs.to_json().unwrap();
        let back = RunLog::from_json(&json).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back.latest(), runs.latest());
    }

    #[test]
    fn test_from_run_snapshots_the_session() {
        let params = Params::default();
        let tuning = Tuning::default();
        let mut state = SimState::new(21, &params, &tuning).unwrap();
        state.time_spent = 7.4321;

        let record =
            CompletionRecord::from_run(&state, &params, "2024-06-02T08:30:00Z".to_string());
        assert_eq!(record.maze_complexity, params.maze_complexity);
        assert_eq!(record.boundary_size, state.boundary.size);
        assert_eq!(record.maze_walls, state.maze.walls);
        assert_eq!(record.time_spent, 7.4);

        // Loading the record back reproduces the same maze.
        let mut params2 = Params::default();
        let mut state2 = SimState::new(99, &params2, &tuning).unwrap();
        state2.load_record(&record, &mut params2, &tuning).unwrap();
        assert_eq!(state2.maze.walls, state.maze.walls);
        assert_eq!(state2.maze.endpoint, state.maze.endpoint);
        assert_eq!(state2.boundary.size, state.boundary.size);
    }
}
