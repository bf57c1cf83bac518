use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Strategy deciding where mines go when a game is filled.
///
/// Implementations call `mark` once per mined position. The caller checks
/// afterwards that exactly `count` distinct cells inside `size` were
/// marked, so a strategy that marks twice or outside the grid fails the
/// fill instead of producing a corrupt game.
pub trait MineLayout {
    fn place(&mut self, size: Coord2, count: CellCount, mark: &mut dyn FnMut(Point2D));
}
