use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Up to eight neighbouring cells, never spills to the heap.
pub type Neighbours<'a> = SmallVec<[&'a Cell; 8]>;

/// Dense rectangular container owning every cell of a game.
///
/// Keeps running revealed and flagged totals so the counting queries the
/// presentation layer polls after each move are O(1).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Grid {
    cells: Array2<Cell>,
    size: Coord2,
    revealed_count: CellCount,
    flagged_count: CellCount,
}

impl Grid {
    /// Creates an empty grid, dimensions are clamped to at least 1x1.
    pub fn new((width, height): Coord2) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let cells = Array2::from_shape_fn(
            (usize::from(height), usize::from(width)),
            |(y, x)| Cell::new(Point2D::new(x as Coord, y as Coord)),
        );
        Self {
            cells,
            size: (width, height),
            revealed_count: 0,
            flagged_count: 0,
        }
    }

    /// Rebuilds a grid from stored cells, recomputing the running totals.
    ///
    /// The cells must be laid out `[y, x]` for `size` and each must carry
    /// its own position. Flags on revealed cells are dropped.
    pub fn from_cells(mut cells: Array2<Cell>, (width, height): Coord2) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidSize);
        }
        if cells.dim() != (usize::from(height), usize::from(width)) {
            return Err(GridError::InvalidShape);
        }

        let mut revealed_count = 0;
        let mut flagged_count = 0;
        for ((y, x), cell) in cells.indexed_iter_mut() {
            if cell.pos() != Point2D::new(x as Coord, y as Coord) {
                return Err(GridError::InvalidShape);
            }
            if cell.is_revealed {
                cell.is_flagged = false;
                revealed_count += 1;
            } else if cell.is_flagged {
                flagged_count += 1;
            }
        }

        Ok(Self {
            cells,
            size: (width, height),
            revealed_count,
            flagged_count,
        })
    }

    pub const fn size(&self) -> Coord2 {
        self.size
    }

    pub const fn width(&self) -> Coord {
        self.size.0
    }

    pub const fn height(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn validate(&self, pos: Point2D) -> Result<Point2D> {
        if pos.is_within(self.size) {
            Ok(pos)
        } else {
            Err(GridError::OutOfBounds(pos))
        }
    }

    pub fn get(&self, pos: Point2D) -> Result<&Cell> {
        let pos = self.validate(pos)?;
        Ok(&self.cells[pos.to_nd_index()])
    }

    pub fn cell_has_mine(&self, pos: Point2D) -> Result<bool> {
        Ok(self.get(pos)?.has_mine)
    }

    /// Positions adjacent to `pos`, including diagonals.
    pub fn neighbour_positions(&self, pos: Point2D) -> Result<NeighborIter> {
        let pos = self.validate(pos)?;
        Ok(self.iter_neighbors(pos))
    }

    pub fn neighbours(&self, pos: Point2D) -> Result<Neighbours<'_>> {
        Ok(self
            .neighbour_positions(pos)?
            .map(|neighbour| &self.cells[neighbour.to_nd_index()])
            .collect())
    }

    /// Revealing a flagged cell drops its flag.
    pub fn set_cell_revealed(&mut self, pos: Point2D, revealed: bool) -> Result<()> {
        let pos = self.validate(pos)?;
        let cell = &mut self.cells[pos.to_nd_index()];
        if cell.is_revealed != revealed {
            cell.is_revealed = revealed;
            if revealed {
                self.revealed_count += 1;
            } else {
                self.revealed_count -= 1;
            }
        }
        if revealed && cell.is_flagged {
            cell.is_flagged = false;
            self.flagged_count -= 1;
        }
        Ok(())
    }

    /// Flagging a revealed cell is ignored.
    pub fn set_cell_flagged(&mut self, pos: Point2D, flagged: bool) -> Result<()> {
        let pos = self.validate(pos)?;
        let cell = &mut self.cells[pos.to_nd_index()];
        if flagged && cell.is_revealed {
            return Ok(());
        }
        if cell.is_flagged != flagged {
            cell.is_flagged = flagged;
            if flagged {
                self.flagged_count += 1;
            } else {
                self.flagged_count -= 1;
            }
        }
        Ok(())
    }

    /// Reveals every cell and drops every flag.
    pub fn reveal_all(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.is_revealed = true;
            cell.is_flagged = false;
        }
        self.revealed_count = self.total_cells();
        self.flagged_count = 0;
    }

    pub(crate) fn set_cell_has_mine(&mut self, pos: Point2D) -> Result<()> {
        let pos = self.validate(pos)?;
        self.cells[pos.to_nd_index()].has_mine = true;
        Ok(())
    }

    pub(crate) fn clear_mines(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.has_mine = false;
        }
    }

    pub fn mine_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.has_mine).count() as CellCount
    }

    pub const fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub const fn not_revealed_count(&self) -> CellCount {
        self.total_cells() - self.revealed_count
    }

    pub const fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Every cell exactly once, row by row.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub(crate) fn iter_neighbors(&self, pos: Point2D) -> NeighborIter {
        NeighborIter::new(pos, self.size)
    }
}

impl Index<Point2D> for Grid {
    type Output = Cell;

    fn index(&self, pos: Point2D) -> &Self::Output {
        &self.cells[pos.to_nd_index()]
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // totals are derived from the cells, stored ones are ignored
        #[derive(Deserialize)]
        struct Stored {
            cells: Array2<Cell>,
            size: Coord2,
        }

        let Stored { cells, size } = Stored::deserialize(deserializer)?;
        Self::from_cells(cells, size).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = &'a Cell;
    type IntoIter = ndarray::iter::Iter<'a, Cell, ndarray::Ix2>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn new_grid_is_empty() {
        let grid = Grid::new((4, 3));

        assert_eq!(grid.size(), (4, 3));
        assert_eq!(grid.total_cells(), 12);
        assert_eq!(grid.mine_count(), 0);
        assert_eq!(grid.not_revealed_count(), 12);
        assert_eq!(grid.flagged_count(), 0);
        assert!(grid.iter().all(|cell| cell.state() == CellState::Hidden));
    }

    #[test]
    fn zero_dimensions_are_clamped() {
        let grid = Grid::new((0, 0));

        assert_eq!(grid.size(), (1, 1));
        assert_eq!(grid.iter().count(), 1);
    }

    #[test]
    fn cell_positions_match_their_index() {
        let grid = Grid::new((3, 2));

        let positions: Vec<_> = grid.iter().map(Cell::pos).collect();
        assert_eq!(
            positions,
            vec![
                Point2D::new(0, 0),
                Point2D::new(1, 0),
                Point2D::new(2, 0),
                Point2D::new(0, 1),
                Point2D::new(1, 1),
                Point2D::new(2, 1),
            ]
        );
        for cell in &grid {
            assert_eq!(grid.get(cell.pos()).unwrap().pos(), cell.pos());
        }
    }

    #[test]
    fn iteration_restarts() {
        let grid = Grid::new((2, 2));

        assert_eq!(grid.iter().count(), 4);
        assert_eq!(grid.iter().count(), 4);
    }

    #[test]
    fn out_of_bounds_access_is_rejected() {
        let mut grid = Grid::new((3, 3));
        let outside = Point2D::new(3, 0);

        assert_eq!(grid.get(outside), Err(GridError::OutOfBounds(outside)));
        assert_eq!(
            grid.get(Point2D::new(0, 3)).map(|_| ()),
            Err(GridError::OutOfBounds(Point2D::new(0, 3)))
        );
        assert!(grid.neighbours(outside).is_err());
        assert!(grid.cell_has_mine(outside).is_err());
        assert!(grid.set_cell_revealed(outside, true).is_err());
        assert!(grid.set_cell_flagged(outside, true).is_err());
        assert_eq!(grid.not_revealed_count(), 9);
        assert_eq!(grid.flagged_count(), 0);
    }

    #[test]
    fn neighbours_are_clipped_at_edges() {
        let grid = Grid::new((4, 4));

        assert_eq!(grid.neighbours(Point2D::new(0, 0)).unwrap().len(), 3);
        assert_eq!(grid.neighbours(Point2D::new(0, 1)).unwrap().len(), 5);
        assert_eq!(grid.neighbours(Point2D::new(2, 2)).unwrap().len(), 8);

        let around_corner: Vec<_> = grid
            .neighbours(Point2D::new(3, 3))
            .unwrap()
            .iter()
            .map(|cell| cell.pos())
            .collect();
        assert_eq!(
            around_corner,
            vec![Point2D::new(2, 2), Point2D::new(3, 2), Point2D::new(2, 3)]
        );
    }

    #[test]
    fn setters_keep_counts_in_step() {
        let mut grid = Grid::new((3, 3));
        let pos = Point2D::new(1, 1);

        grid.set_cell_flagged(pos, true).unwrap();
        grid.set_cell_flagged(pos, true).unwrap();
        assert_eq!(grid.flagged_count(), 1);
        assert!(grid[pos].is_flagged());

        grid.set_cell_flagged(pos, false).unwrap();
        assert_eq!(grid.flagged_count(), 0);

        grid.set_cell_revealed(pos, true).unwrap();
        grid.set_cell_revealed(pos, true).unwrap();
        assert_eq!(grid.revealed_count(), 1);
        assert_eq!(grid.not_revealed_count(), 8);

        grid.set_cell_revealed(pos, false).unwrap();
        assert_eq!(grid.not_revealed_count(), 9);
    }

    #[test]
    fn revealed_and_flagged_are_exclusive() {
        let mut grid = Grid::new((3, 3));
        let flagged = Point2D::new(0, 1);
        grid.set_cell_flagged(flagged, true).unwrap();

        grid.set_cell_revealed(flagged, true).unwrap();

        assert_eq!(grid[flagged].state(), CellState::Revealed);
        assert!(!grid[flagged].is_flagged());
        assert_eq!(grid.flagged_count(), 0);

        grid.set_cell_flagged(flagged, true).unwrap();

        assert!(!grid[flagged].is_flagged());
        assert_eq!(grid.flagged_count(), 0);
        assert_eq!(grid.revealed_count(), 1);
    }

    #[test]
    fn loading_recomputes_totals() {
        let mut grid = Grid::new((2, 2));
        grid.set_cell_revealed(Point2D::new(0, 0), true).unwrap();
        grid.set_cell_flagged(Point2D::new(1, 1), true).unwrap();
        let mut stored = serde_json::to_value(&grid).unwrap();
        stored["revealed_count"] = 9.into();
        stored["flagged_count"] = 7.into();

        let loaded: Grid = serde_json::from_value(stored).unwrap();

        assert_eq!(loaded, grid);
        assert_eq!(loaded.not_revealed_count(), 3);
        assert_eq!(loaded.flagged_count(), 1);
    }

    #[test]
    fn loading_rejects_size_that_does_not_match_cells() {
        let mut stored = serde_json::to_value(Grid::new((2, 2))).unwrap();
        stored["size"] = serde_json::json!([5, 5]);
        assert!(serde_json::from_value::<Grid>(stored).is_err());

        let mut empty = serde_json::to_value(Grid::new((2, 2))).unwrap();
        empty["size"] = serde_json::json!([0, 2]);
        assert!(serde_json::from_value::<Grid>(empty).is_err());
    }

    #[test]
    fn from_cells_checks_positions() {
        let cells = Array2::from_elem((1, 2), Cell::new(Point2D::new(0, 0)));

        assert_eq!(Grid::from_cells(cells, (2, 1)), Err(GridError::InvalidShape));
        assert_eq!(
            Grid::from_cells(Array2::from_elem((1, 1), Cell::new(Point2D::new(0, 0))), (1, 2)),
            Err(GridError::InvalidShape)
        );
    }

    #[test]
    fn reveal_all_clears_flags() {
        let mut grid = Grid::new((2, 3));
        grid.set_cell_flagged(Point2D::new(1, 2), true).unwrap();
        grid.set_cell_revealed(Point2D::new(0, 0), true).unwrap();

        grid.reveal_all();

        assert_eq!(grid.not_revealed_count(), 0);
        assert_eq!(grid.flagged_count(), 0);
        assert!(grid.iter().all(|cell| cell.is_revealed() && !cell.is_flagged()));
    }

    #[test]
    fn mines_are_counted_and_cleared() {
        let mut grid = Grid::new((3, 3));
        grid.set_cell_has_mine(Point2D::new(0, 0)).unwrap();
        grid.set_cell_has_mine(Point2D::new(2, 1)).unwrap();
        grid.set_cell_has_mine(Point2D::new(2, 1)).unwrap();

        assert_eq!(grid.mine_count(), 2);
        assert!(grid.cell_has_mine(Point2D::new(2, 1)).unwrap());
        assert!(!grid.cell_has_mine(Point2D::new(1, 1)).unwrap());

        grid.clear_mines();
        assert_eq!(grid.mine_count(), 0);
    }
}
