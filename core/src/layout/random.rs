use alloc::vec::Vec;

use super::*;

/// Uniform placement of distinct mines, reproducible from a seed.
///
/// The seed advances after every fill, so reusing one strategy for
/// consecutive games yields different boards while the whole sequence
/// stays reproducible.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayout {
    seed: u64,
}

impl RandomLayout {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MineLayout for RandomLayout {
    fn place(
        &mut self,
        (width, height): Coord2,
        count: CellCount,
        mark: &mut dyn FnMut(Point2D),
    ) {
        use rand::{Rng, RngCore, SeedableRng, rngs::SmallRng};

        let total_cells = mult(width, height);
        if count > total_cells {
            log::warn!(
                "Grid too small, requested {} mines but only fits {}",
                count,
                total_cells
            );
        }
        let count = count.min(total_cells);

        let mut rng = SmallRng::seed_from_u64(self.seed);

        // partial Fisher-Yates, the first `count` slots end up as the sample
        let mut cells: Vec<CellCount> = (0..total_cells).collect();
        for placed in 0..count {
            let pick = rng.gen_range(placed..total_cells);
            cells.swap(usize::from(placed), usize::from(pick));
            mark(Point2D::from_index(cells[usize::from(placed)], width));
        }

        self.seed = rng.next_u64();
    }
}
