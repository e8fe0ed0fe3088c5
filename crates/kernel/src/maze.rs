use mazerun_common::GridCoord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Errors from loading or validating a maze layout.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("maze must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },
    #[error("{kind} cell {coord} lies outside the {width}x{height} grid")]
    OutOfBounds {
        kind: &'static str,
        coord: GridCoord,
        width: u32,
        height: u32,
    },
    #[error("spawn cell {0} is also a wall")]
    SpawnOnWall(GridCoord),
}

/// Raw layout as supplied by the external maze provider.
///
/// JSON shape: `{"width": 5, "height": 5, "walls": [[2,2]], "spawns": [[0,0]]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeLayout {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub walls: Vec<GridCoord>,
    #[serde(default)]
    pub spawns: Vec<GridCoord>,
}

impl MazeLayout {
    pub fn from_json_str(s: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Immutable, validated maze geometry.
///
/// Walls use a `BTreeSet` for O(log n) lookups with deterministic iteration.
/// Spawns keep the provider's order, which the spawn pool samples from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeModel {
    width: u32,
    height: u32,
    walls: BTreeSet<GridCoord>,
    spawns: Vec<GridCoord>,
}

impl MazeModel {
    /// Validate a layout: non-empty grid, all cells in bounds, no spawn on a wall.
    pub fn new(layout: MazeLayout) -> Result<Self, LayoutError> {
        let MazeLayout {
            width,
            height,
            walls,
            spawns,
        } = layout;
        if width == 0 || height == 0 {
            return Err(LayoutError::EmptyGrid { width, height });
        }
        let in_bounds = |c: GridCoord| {
            c.x >= 0 && c.y >= 0 && (c.x as u32) < width && (c.y as u32) < height
        };
        for (kind, cells) in [("wall", &walls), ("spawn", &spawns)] {
            if let Some(&coord) = cells.iter().find(|c| !in_bounds(**c)) {
                return Err(LayoutError::OutOfBounds {
                    kind,
                    coord,
                    width,
                    height,
                });
            }
        }
        let walls: BTreeSet<GridCoord> = walls.into_iter().collect();
        if let Some(&coord) = spawns.iter().find(|c| walls.contains(c)) {
            return Err(LayoutError::SpawnOnWall(coord));
        }
        Ok(Self {
            width,
            height,
            walls,
            spawns,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn walls(&self) -> &BTreeSet<GridCoord> {
        &self.walls
    }

    pub fn spawns(&self) -> &[GridCoord] {
        &self.spawns
    }

    pub fn is_wall(&self, coord: GridCoord) -> bool {
        self.walls.contains(&coord)
    }

    /// The cell used when the provider supplies no spawn points.
    pub fn center(&self) -> GridCoord {
        GridCoord::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// World-space centre of a cell at height `y`.
    pub fn cell_to_world(&self, coord: GridCoord, cell_size: f32, y: f32) -> glam::Vec3 {
        coord.to_world(self.width, self.height, cell_size, y)
    }

    /// Grid cell containing a world-space point (ignores Y). May lie outside the grid.
    pub fn world_to_cell(&self, pos: glam::Vec3, cell_size: f32) -> GridCoord {
        GridCoord::new(
            (pos.x / cell_size + self.width as f32 / 2.0).floor() as i32,
            (pos.z / cell_size + self.height as f32 / 2.0).floor() as i32,
        )
    }
}
