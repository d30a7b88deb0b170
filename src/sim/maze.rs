//! Perfect maze generation
//!
//! A randomized depth-first backtracker carves a spanning tree over an
//! n x n grid of cells, which is then flattened into wall segments
//! centered on the boundary's local origin. Exactly one path exists
//! between any two cells.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid arguments to maze generation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze complexity must be at least 1, got {0}")]
    InvalidComplexity(u32),
    #[error("maze size must be positive")]
    InvalidSize,
}

/// Serde adapter: `Vec2` as a `{"x": .., "y": ..}` object, the shape the
/// exported run records use.
pub(crate) mod vec2_xy {
    use glam::Vec2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Xy {
        x: f32,
        y: f32,
    }

    pub fn serialize<S: Serializer>(v: &Vec2, serializer: S) -> Result<S::Ok, S::Error> {
        Xy { x: v.x, y: v.y }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec2, D::Error> {
        let xy = Xy::deserialize(deserializer)?;
        Ok(Vec2::new(xy.x, xy.y))
    }
}

/// A maze wall in the boundary's local (unrotated) frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    #[serde(with = "vec2_xy")]
    pub a: Vec2,
    #[serde(with = "vec2_xy")]
    pub b: Vec2,
}

/// Per-cell wall flags. A cleared flag is an open passage to that neighbor.
#[derive(Debug, Clone, Copy)]
pub struct CellWalls {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl CellWalls {
    fn closed() -> Self {
        Self {
            top: true,
            right: true,
            bottom: true,
            left: true,
        }
    }
}

/// Wall-flag grid produced by the carve pass.
#[derive(Debug, Clone)]
pub struct MazeGrid {
    rows: u32,
    cols: u32,
    cells: Vec<CellWalls>,
}

impl MazeGrid {
    /// Carve a perfect maze with a randomized depth-first backtracker.
    ///
    /// Starting from `(0, 0)`, the walk repeatedly tunnels to a uniformly
    /// chosen unvisited neighbor and backtracks when none remain. Every
    /// cell is pushed exactly once, so the carve terminates in
    /// O(rows * cols) and the open passages form a spanning tree.
    pub fn carve(complexity: u32, rng: &mut impl Rng) -> Self {
        let n = complexity.max(1);
        let mut grid = Self {
            rows: n,
            cols: n,
            cells: vec![CellWalls::closed(); (n * n) as usize],
        };

        let mut visited = vec![false; (n * n) as usize];
        let mut stack: Vec<(u32, u32)> = Vec::new();
        visited[0] = true;
        stack.push((0, 0));

        while let Some(&(row, col)) = stack.last() {
            let mut neighbors = [(0u32, 0u32); 4];
            let mut count = 0;
            // Up, right, down, left.
            if row > 0 && !visited[grid.idx(row - 1, col)] {
                neighbors[count] = (row - 1, col);
                count += 1;
            }
            if col + 1 < n && !visited[grid.idx(row, col + 1)] {
                neighbors[count] = (row, col + 1);
                count += 1;
            }
            if row + 1 < n && !visited[grid.idx(row + 1, col)] {
                neighbors[count] = (row + 1, col);
                count += 1;
            }
            if col > 0 && !visited[grid.idx(row, col - 1)] {
                neighbors[count] = (row, col - 1);
                count += 1;
            }

            if count == 0 {
                stack.pop();
                continue;
            }

            let (next_row, next_col) = neighbors[rng.random_range(0..count)];
            grid.open_between(row, col, next_row, next_col);
            visited[grid.idx(next_row, next_col)] = true;
            stack.push((next_row, next_col));
        }

        grid
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn walls(&self, row: u32, col: u32) -> CellWalls {
        self.cells[self.idx(row, col)]
    }

    fn idx(&self, row: u32, col: u32) -> usize {
        (row * self.cols + col) as usize
    }

    fn open_between(&mut self, row: u32, col: u32, next_row: u32, next_col: u32) {
        let (a, b) = (self.idx(row, col), self.idx(next_row, next_col));
        if next_row < row {
            self.cells[a].top = false;
            self.cells[b].bottom = false;
        } else if next_row > row {
            self.cells[a].bottom = false;
            self.cells[b].top = false;
        } else if next_col > col {
            self.cells[a].right = false;
            self.cells[b].left = false;
        } else if next_col < col {
            self.cells[a].left = false;
            self.cells[b].right = false;
        }
    }

    /// Number of open passages between adjacent cells.
    ///
    /// A spanning tree over the grid has exactly `rows * cols - 1`.
    pub fn passage_count(&self) -> u32 {
        let mut open = 0;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = self.walls(row, col);
                if col + 1 < self.cols && !cell.right {
                    open += 1;
                }
                if row + 1 < self.rows && !cell.bottom {
                    open += 1;
                }
            }
        }
        open
    }

    /// Number of cells reachable from `(0, 0)` through open passages.
    pub fn reachable_from_start(&self) -> u32 {
        let mut seen = vec![false; (self.rows * self.cols) as usize];
        let mut queue = vec![(0u32, 0u32)];
        seen[0] = true;
        let mut count = 0;

        while let Some((row, col)) = queue.pop() {
            count += 1;
            let cell = self.walls(row, col);
            if row > 0 && !cell.top && !seen[self.idx(row - 1, col)] {
                seen[self.idx(row - 1, col)] = true;
                queue.push((row - 1, col));
            }
            if col + 1 < self.cols && !cell.right && !seen[self.idx(row, col + 1)] {
                seen[self.idx(row, col + 1)] = true;
                queue.push((row, col + 1));
            }
            if row + 1 < self.rows && !cell.bottom && !seen[self.idx(row + 1, col)] {
                seen[self.idx(row + 1, col)] = true;
                queue.push((row + 1, col));
            }
            if col > 0 && !cell.left && !seen[self.idx(row, col - 1)] {
                seen[self.idx(row, col - 1)] = true;
                queue.push((row, col - 1));
            }
        }
        count
    }
}

/// A generated maze: wall segments and goal in the boundary's local frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Maze {
    pub rows: u32,
    pub cols: u32,
    pub cell_size: f32,
    pub walls: Vec<WallSegment>,
    #[serde(with = "vec2_xy")]
    pub endpoint: Vec2,
}

impl Maze {
    /// Generate a perfect maze of `complexity x complexity` cells filling a
    /// `size x size` square centered on the local origin.
    ///
    /// The goal is a uniformly chosen cell other than the start `(0, 0)`;
    /// a single-cell maze has no such cell and keeps the goal at the start.
    pub fn generate(complexity: u32, size: f32, rng: &mut impl Rng) -> Result<Self, MazeError> {
        if complexity < 1 {
            return Err(MazeError::InvalidComplexity(complexity));
        }
        if !(size > 0.0) {
            return Err(MazeError::InvalidSize);
        }

        let grid = MazeGrid::carve(complexity, rng);
        let cell_size = size / complexity as f32;
        let origin = -size / 2.0;

        let mut walls = Vec::new();
        for row in 0..complexity {
            for col in 0..complexity {
                let cell = grid.walls(row, col);
                let x = origin + col as f32 * cell_size;
                let y = origin + row as f32 * cell_size;
                // Right and bottom walls belong to this cell; top and left
                // are the neighbor's bottom/right except on the outer rim.
                if cell.right {
                    walls.push(WallSegment {
                        a: Vec2::new(x + cell_size, y),
                        b: Vec2::new(x + cell_size, y + cell_size),
                    });
                }
                if cell.bottom {
                    walls.push(WallSegment {
                        a: Vec2::new(x, y + cell_size),
                        b: Vec2::new(x + cell_size, y + cell_size),
                    });
                }
                if row == 0 && cell.top {
                    walls.push(WallSegment {
                        a: Vec2::new(x, y),
                        b: Vec2::new(x + cell_size, y),
                    });
                }
                if col == 0 && cell.left {
                    walls.push(WallSegment {
                        a: Vec2::new(x, y),
                        b: Vec2::new(x, y + cell_size),
                    });
                }
            }
        }

        let (end_row, end_col) = if complexity > 1 {
            loop {
                let row = rng.random_range(0..complexity);
                let col = rng.random_range(0..complexity);
                if row != 0 || col != 0 {
                    break (row, col);
                }
            }
        } else {
            (0, 0)
        };
        let endpoint = Vec2::new(
            origin + end_col as f32 * cell_size + cell_size / 2.0,
            origin + end_row as f32 * cell_size + cell_size / 2.0,
        );

        Ok(Self {
            rows: complexity,
            cols: complexity,
            cell_size,
            walls,
            endpoint,
        })
    }

    /// Rebuild a maze from exported run-record fields without re-running
    /// generation.
    pub fn from_parts(
        complexity: u32,
        boundary_size: f32,
        walls: Vec<WallSegment>,
        endpoint: Vec2,
    ) -> Result<Self, MazeError> {
        if complexity < 1 {
            return Err(MazeError::InvalidComplexity(complexity));
        }
        if !(boundary_size > 0.0) {
            return Err(MazeError::InvalidSize);
        }
        Ok(Self {
            rows: complexity,
            cols: complexity,
            cell_size: boundary_size / complexity as f32,
            walls,
            endpoint,
        })
    }

    /// Local-frame center of the start cell `(0, 0)`.
    pub fn start_center(&self, size: f32) -> Vec2 {
        Vec2::splat(-size / 2.0 + self.cell_size / 2.0)
    }
}
