use crate::maze::MazeModel;
use glam::Vec3;
use mazerun_common::{GameConfig, GridCoord};
use std::sync::Arc;

/// Nearest collidable surface along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
}

/// Ray queries against collidable geometry (walls, floor, ceiling).
///
/// Implementors report only geometry that blocks the player; decorative
/// geometry such as collectibles never produces a hit.
pub trait CollisionQuery {
    /// Nearest hit along `direction` (unit length) within `max_distance` of
    /// `origin`, or `None`. An origin inside geometry hits at distance 0.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

impl<T: CollisionQuery + ?Sized> CollisionQuery for Box<T> {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        (**self).cast_ray(origin, direction, max_distance)
    }
}

/// Geometry that never blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSpace;

impl CollisionQuery for OpenSpace {
    fn cast_ray(&self, _: Vec3, _: Vec3, _: f32) -> Option<RayHit> {
        None
    }
}

/// Collision geometry derived from a maze grid.
///
/// Each wall cell is a `cell_size × wall_height × cell_size` box resting on
/// y = 0. The floor (y = 0) and ceiling (y = `ceiling_height`) are planes
/// spanning the maze footprint.
#[derive(Debug, Clone)]
pub struct MazeCollider {
    maze: Arc<MazeModel>,
    cell_size: f32,
    wall_height: f32,
    ceiling_height: f32,
}

impl MazeCollider {
    pub fn new(maze: Arc<MazeModel>, config: &GameConfig) -> Self {
        Self {
            maze,
            cell_size: config.cell_size,
            wall_height: config.wall_height,
            ceiling_height: config.ceiling_height,
        }
    }

    fn half_extents(&self) -> (f32, f32) {
        (
            self.maze.width() as f32 * self.cell_size / 2.0,
            self.maze.height() as f32 * self.cell_size / 2.0,
        )
    }

    fn wall_hit(&self, cell: GridCoord, origin: Vec3, direction: Vec3, max: f32) -> Option<f32> {
        let center = self
            .maze
            .cell_to_world(cell, self.cell_size, self.wall_height / 2.0);
        let local = origin - center;
        let half = Vec3::new(
            self.cell_size / 2.0,
            self.wall_height / 2.0,
            self.cell_size / 2.0,
        );

        let mut t = (0.0_f32, max);
        for axis in 0..3 {
            t = slab_interval(local[axis], direction[axis], half[axis], t.0, t.1)?;
        }
        Some(t.0)
    }

    fn plane_hit(&self, plane_y: f32, origin: Vec3, direction: Vec3, max: f32) -> Option<f32> {
        if direction.y.abs() <= 1e-6 {
            return None;
        }
        let t = (plane_y - origin.y) / direction.y;
        if !(0.0..=max).contains(&t) {
            return None;
        }
        let p = origin + direction * t;
        let (hx, hz) = self.half_extents();
        (p.x.abs() <= hx && p.z.abs() <= hz).then_some(t)
    }
}

impl CollisionQuery for MazeCollider {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let end = origin + direction * max_distance;
        let a = self.maze.world_to_cell(origin, self.cell_size);
        let b = self.maze.world_to_cell(end, self.cell_size);

        // Walls overlapping the segment's bounding cells, padded by one and
        // clipped to the grid. Endpoints far outside saturate, so clip first.
        let last_x = self.maze.width() as i32 - 1;
        let last_y = self.maze.height() as i32 - 1;
        let span = |lo: i32, hi: i32, last: i32| {
            lo.saturating_sub(1).max(0)..=hi.saturating_add(1).min(last)
        };
        let xs = span(a.x.min(b.x), a.x.max(b.x), last_x);
        let ys = span(a.y.min(b.y), a.y.max(b.y), last_y);

        let mut nearest: Option<f32> = None;
        for x in xs {
            for y in ys.clone() {
                let cell = GridCoord::new(x, y);
                if !self.maze.is_wall(cell) {
                    continue;
                }
                if let Some(t) = self.wall_hit(cell, origin, direction, max_distance) {
                    nearest = Some(nearest.map_or(t, |n| n.min(t)));
                }
            }
        }
        for plane_y in [0.0, self.ceiling_height] {
            if let Some(t) = self.plane_hit(plane_y, origin, direction, max_distance) {
                nearest = Some(nearest.map_or(t, |n| n.min(t)));
            }
        }
        nearest.map(|distance| RayHit { distance })
    }
}

/// Clip `[t_min, t_max]` to the slab `|local + t·dir| ≤ half_extent` on one axis.
fn slab_interval(
    local_coord: f32,
    ray_dir: f32,
    half_extent: f32,
    t_min: f32,
    t_max: f32,
) -> Option<(f32, f32)> {
    if ray_dir.abs() > 1e-6 {
        let t1 = (-half_extent - local_coord) / ray_dir;
        let t2 = (half_extent - local_coord) / ray_dir;
        let new_min = t_min.max(t1.min(t2));
        let new_max = t_max.min(t1.max(t2));
        (new_min <= new_max).then_some((new_min, new_max))
    } else if local_coord.abs() > half_extent {
        None
    } else {
        Some((t_min, t_max))
    }
}
