use core::fmt;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for grid width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Grid dimensions `(width, height)`.
pub type Coord2 = (Coord, Coord);

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Position of a cell, `x` grows to the right and `y` grows downwards.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Point2D {
    pub x: Coord,
    pub y: Coord,
}

impl Point2D {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    pub const fn is_within(self, (width, height): Coord2) -> bool {
        self.x < width && self.y < height
    }

    /// Applies `delta`, returning a value only when it remains in bounds.
    pub fn offset(self, (dx, dy): (i8, i8), (max_x, max_y): Coord2) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        if x >= max_x {
            return None;
        }

        let y = self.y.checked_add_signed(dy)?;
        if y >= max_y {
            return None;
        }

        Some(Self { x, y })
    }

    /// Position of the `index`-th cell, counting row by row.
    pub const fn from_index(index: CellCount, width: Coord) -> Self {
        let width = width as CellCount;
        Self {
            x: (index % width) as Coord,
            y: (index / width) as Coord,
        }
    }

    // cells are stored row by row
    pub(crate) fn to_nd_index(self) -> [usize; 2] {
        [self.y.into(), self.x.into()]
    }
}

impl From<Coord2> for Point2D {
    fn from((x, y): Coord2) -> Self {
        Self { x, y }
    }
}

impl From<Point2D> for Coord2 {
    fn from(pos: Point2D) -> Self {
        (pos.x, pos.y)
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Moore neighbourhood of a cell, clipped at the grid edges.
#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Point2D,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Point2D, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Point2D;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item = self
                .center
                .offset(DISPLACEMENTS[usize::from(self.index)], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}
