use mazerun_common::GridCoord;
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("spawn pool is empty")]
    EmptyPool,
}

/// Unclaimed spawn cells, consumed without replacement.
#[derive(Debug, Clone, Default)]
pub struct SpawnPool {
    cells: Vec<GridCoord>,
}

impl SpawnPool {
    pub fn new(cells: Vec<GridCoord>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn remaining(&self) -> &[GridCoord] {
        &self.cells
    }

    /// Remove and return a uniformly chosen cell.
    ///
    /// Order of the remaining cells is preserved, so a seeded RNG yields the
    /// same sequence of draws on every platform.
    pub fn draw_one<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GridCoord, SpawnError> {
        if self.cells.is_empty() {
            return Err(SpawnError::EmptyPool);
        }
        let idx = rng.gen_range(0..self.cells.len());
        Ok(self.cells.remove(idx))
    }

    /// Draw `count` cells, failing if the pool runs dry first.
    pub fn draw_many<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<GridCoord>, SpawnError> {
        (0..count).map(|_| self.draw_one(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeSet;

    fn pool(n: i32) -> SpawnPool {
        SpawnPool::new((0..n).map(|i| GridCoord::new(i, 0)).collect())
    }

    #[test]
    fn draw_removes_exactly_one() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = pool(4);
        let c = p.draw_one(&mut rng).unwrap();
        assert_eq!(p.len(), 3);
        assert!(!p.remaining().contains(&c));
    }

    #[test]
    fn draws_never_repeat() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut p = pool(10);
        let drawn = p.draw_many(&mut rng, 10).unwrap();
        let unique: BTreeSet<_> = drawn.iter().copied().collect();
        assert_eq!(unique.len(), 10);
        assert!(p.is_empty());
    }

    #[test]
    fn empty_pool_fails() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut p = SpawnPool::default();
        assert_eq!(p.draw_one(&mut rng), Err(SpawnError::EmptyPool));

        let mut p = pool(2);
        assert_eq!(p.draw_many(&mut rng, 3), Err(SpawnError::EmptyPool));
    }

    #[test]
    fn same_seed_same_draws() {
        let mut a = pool(20);
        let mut b = pool(20);
        let da = a.draw_many(&mut StdRng::seed_from_u64(42), 5).unwrap();
        let db = b.draw_many(&mut StdRng::seed_from_u64(42), 5).unwrap();
        assert_eq!(da, db);
    }

    #[test]
    fn every_cell_is_reachable() {
        // Uniform index: over many single draws from a fresh 3-cell pool, each cell appears.
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = BTreeSet::new();
        for _ in 0..200 {
            seen.insert(pool(3).draw_one(&mut rng).unwrap());
        }
        assert_eq!(seen.len(), 3);
    }
}
