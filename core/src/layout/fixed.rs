use alloc::vec::Vec;

use super::*;

/// Marks a predetermined list of positions, ignoring the requested count.
///
/// Used for replays and for tests that need a known board.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixedLayout {
    positions: Vec<Point2D>,
}

impl FixedLayout {
    pub fn new<I, P>(positions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Point2D>,
    {
        Self {
            positions: positions.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads a picture of the board, one string per row, `*` marks a mine.
    pub fn from_rows(rows: &[&str]) -> Self {
        let positions = rows
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.chars()
                    .enumerate()
                    .filter(|&(_, c)| c == '*')
                    .map(move |(x, _)| Point2D::new(x as Coord, y as Coord))
            })
            .collect();
        Self { positions }
    }

    pub fn positions(&self) -> &[Point2D] {
        &self.positions
    }

    pub fn len(&self) -> CellCount {
        self.positions.len() as CellCount
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl MineLayout for FixedLayout {
    fn place(&mut self, _size: Coord2, _count: CellCount, mark: &mut dyn FnMut(Point2D)) {
        for &pos in &self.positions {
            mark(pos);
        }
    }
}
