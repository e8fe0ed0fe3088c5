use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Integer cell index into the maze grid. `y` is the grid row, which maps to world Z.
///
/// Layouts serialize cells as `[x, y]` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World-space centre of this cell on a `width × height` grid, lifted to `height_y`.
    ///
    /// The grid is centred on the world origin: cell `(0, 0)` sits at
    /// `(-width/2 * cell_size + cell_size/2, _, -height/2 * cell_size + cell_size/2)`.
    pub fn to_world(self, width: u32, height: u32, cell_size: f32, height_y: f32) -> Vec3 {
        Vec3::new(
            (self.x as f32 - width as f32 / 2.0) * cell_size + 0.5 * cell_size,
            height_y,
            (self.y as f32 - height as f32 / 2.0) * cell_size + 0.5 * cell_size,
        )
    }
}

impl From<[i32; 2]> for GridCoord {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<GridCoord> for [i32; 2] {
    fn from(c: GridCoord) -> Self {
        [c.x, c.y]
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Identity of a collectible, assigned in creation order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectibleId(pub u32);

impl std::fmt::Display for CollectibleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
