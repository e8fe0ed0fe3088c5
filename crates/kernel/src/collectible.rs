use glam::Vec3;
use mazerun_common::CollectibleId;

/// A live pickup. Collected items are removed from the set, not flagged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collectible {
    pub id: CollectibleId,
    pub position: Vec3,
}

/// One pickup reported by [`CollectibleSet::check_pickups`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    pub id: CollectibleId,
    /// Live collectibles left immediately after this pickup.
    pub remaining: usize,
}

/// Live collectibles plus the one-shot win latch.
#[derive(Debug, Clone)]
pub struct CollectibleSet {
    alive: Vec<Collectible>,
    pickup_radius_sq: f32,
    spawned: usize,
    win_announced: bool,
}

impl CollectibleSet {
    /// Build a set from positions; identities follow slice order starting at 0.
    pub fn new(positions: impl IntoIterator<Item = Vec3>, pickup_radius_sq: f32) -> Self {
        let alive: Vec<Collectible> = positions
            .into_iter()
            .enumerate()
            .map(|(i, position)| Collectible {
                id: CollectibleId(i as u32),
                position,
            })
            .collect();
        Self {
            spawned: alive.len(),
            alive,
            pickup_radius_sq,
            win_announced: false,
        }
    }

    pub fn alive(&self) -> &[Collectible] {
        &self.alive
    }

    pub fn remaining(&self) -> usize {
        self.alive.len()
    }

    /// Number created at bootstrap.
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    pub fn collected(&self) -> usize {
        self.spawned - self.alive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Collect everything strictly within the pickup radius of `position`.
    ///
    /// Pickups come back in ascending identity order, each carrying the count
    /// left after it, so consecutive `remaining` values drop by exactly one.
    pub fn check_pickups(&mut self, position: Vec3) -> Vec<Pickup> {
        let radius_sq = self.pickup_radius_sq;
        let before = self.alive.len();
        let mut taken = Vec::new();
        self.alive.retain(|c| {
            if c.position.distance_squared(position) < radius_sq {
                taken.push(c.id);
                false
            } else {
                true
            }
        });
        taken
            .into_iter()
            .enumerate()
            .map(|(k, id)| Pickup {
                id,
                remaining: before - k - 1,
            })
            .collect()
    }

    /// Returns `true` exactly once per session: the first call made while the
    /// set is empty.
    pub fn take_win(&mut self) -> bool {
        if self.alive.is_empty() && !self.win_announced {
            self.win_announced = true;
            true
        } else {
            false
        }
    }

    pub fn win_announced(&self) -> bool {
        self.win_announced
    }
}
