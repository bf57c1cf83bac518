use alloc::{collections::VecDeque, vec::Vec};
use core::fmt;
use hashbrown::HashSet;
use serde::{Deserialize, Deserializer, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    /// Whether this outcome could have caused an update to the display
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the display
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
        }
    }
}

/// Game-facing operations over a single grid.
///
/// Deciding victory or loss is left to the caller: a reveal returning
/// [`RevealOutcome::HitMine`] is a loss, and
/// `not_revealed_count() == nbr_mines()` after a safe reveal is a win.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridManager {
    grid: Grid,
    nbr_mines: CellCount,
    filled: bool,
}

impl GridManager {
    pub fn new(width: Coord, height: Coord) -> Self {
        Self {
            grid: Grid::new((width, height)),
            nbr_mines: 0,
            filled: false,
        }
    }

    /// Sets up a grid sized for `difficulty` and fills it using `layout`.
    pub fn new_game<L: MineLayout + ?Sized>(
        difficulty: Difficulty,
        layout: &mut L,
    ) -> Result<Self> {
        difficulty.validate()?;
        let mut manager = Self::new(difficulty.width, difficulty.height);
        manager.fill_with_mines(difficulty.mine_count, layout)?;
        Ok(manager)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn nbr_mines(&self) -> CellCount {
        self.nbr_mines
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    pub fn fill_with_mines<L: MineLayout + ?Sized>(
        &mut self,
        count: CellCount,
        layout: &mut L,
    ) -> Result<()> {
        if self.filled {
            return Err(GridError::AlreadyFilled);
        }
        let size = self.grid.size();
        if count > self.grid.total_cells() {
            return Err(GridError::InvalidMineCount);
        }
        log::debug!("Filling {}x{} grid with {} mines", size.0, size.1, count);

        let grid = &mut self.grid;
        let mut out_of_bounds = None;
        layout.place(size, count, &mut |pos: Point2D| {
            if let Err(err) = grid.set_cell_has_mine(pos) {
                out_of_bounds.get_or_insert(err);
            }
        });

        if let Some(err) = out_of_bounds {
            log::warn!("Mine layout marked a cell outside the grid: {}", err);
            self.grid.clear_mines();
            return Err(err);
        }

        let actual = self.grid.mine_count();
        if actual != count {
            log::warn!(
                "Mine layout count mismatch, actual: {}, requested: {}",
                actual,
                count
            );
            self.grid.clear_mines();
            return Err(GridError::InconsistentMineCount {
                expected: count,
                actual,
            });
        }

        self.nbr_mines = count;
        self.filled = true;
        Ok(())
    }

    pub fn cell(&self, pos: Point2D) -> Result<&Cell> {
        self.grid.get(pos)
    }

    pub fn cell_has_mine(&self, pos: Point2D) -> Result<bool> {
        self.grid.cell_has_mine(pos)
    }

    /// Number of mines around a safe cell.
    pub fn close_mine_count(&self, pos: Point2D) -> Result<u8> {
        if self.grid.get(pos)?.has_mine() {
            return Err(GridError::InvalidOperation);
        }
        Ok(self.count_close_mines(pos))
    }

    pub fn toggle_flag_cell(&mut self, pos: Point2D) -> Result<MarkOutcome> {
        let cell = *self.grid.get(pos)?;
        if cell.is_revealed() {
            return Ok(MarkOutcome::NoChange);
        }
        self.grid.set_cell_flagged(pos, !cell.is_flagged())?;
        Ok(MarkOutcome::Changed)
    }

    /// Reveals `pos` and, when it has no mined neighbour, the whole region
    /// of connected zero cells plus its numbered border.
    ///
    /// Flagged and already revealed cells are left alone. Revealing a mine
    /// does not cascade.
    pub fn reveal_cell(&mut self, pos: Point2D) -> Result<RevealOutcome> {
        let cell = *self.grid.get(pos)?;
        if cell.is_revealed() || cell.is_flagged() {
            return Ok(RevealOutcome::NoChange);
        }

        self.grid.set_cell_revealed(pos, true)?;

        if cell.has_mine() {
            log::debug!("Mine revealed at {}", pos);
            return Ok(RevealOutcome::HitMine);
        }

        if self.count_close_mines(pos) == 0 {
            self.cascade(pos)?;
        }
        Ok(RevealOutcome::Revealed)
    }

    fn cascade(&mut self, origin: Point2D) -> Result<()> {
        let mut visited = HashSet::new();
        visited.insert(origin);
        let mut to_visit = VecDeque::from([origin]);
        let mut revealed = 0;

        while let Some(current) = to_visit.pop_front() {
            for neighbour in self.grid.iter_neighbors(current) {
                if !visited.insert(neighbour) {
                    continue;
                }

                let cell = self.grid[neighbour];
                if cell.is_flagged() || cell.has_mine() {
                    continue;
                }

                // revealed zero cells still carry the chain, they may have
                // been cut off by a flag that is gone now
                if !cell.is_revealed() {
                    self.grid.set_cell_revealed(neighbour, true)?;
                    revealed += 1;
                }

                if self.count_close_mines(neighbour) == 0 {
                    to_visit.push_back(neighbour);
                }
            }
        }

        log::trace!("Cascade from {} revealed {} more cells", origin, revealed);
        Ok(())
    }

    /// Reveals the whole board, flags included, for the end-of-game display.
    pub fn reveal_all(&mut self) {
        self.grid.reveal_all();
    }

    pub fn cell_view(&self, pos: Point2D) -> Result<CellView> {
        Ok(self.view_of(self.grid.get(pos)?))
    }

    /// One view per cell, row by row.
    pub fn render(&self) -> Vec<CellView> {
        self.grid.iter().map(|cell| self.view_of(cell)).collect()
    }

    /// One symbol per cell, row by row: `M` for a revealed mine, `0`-`8`
    /// for a revealed safe cell, `F` for a flag and a space otherwise.
    pub fn grid_for_display(&self) -> Vec<char> {
        self.grid
            .iter()
            .map(|cell| self.view_of(cell).symbol())
            .collect()
    }

    pub fn not_revealed_count(&self) -> CellCount {
        self.grid.not_revealed_count()
    }

    pub fn flagged_count(&self) -> CellCount {
        self.grid.flagged_count()
    }

    /// How many mines have not been flagged yet, negative when over-flagged
    pub fn mines_left(&self) -> isize {
        (self.nbr_mines as isize) - (self.grid.flagged_count() as isize)
    }

    fn view_of(&self, cell: &Cell) -> CellView {
        match cell.state() {
            CellState::Revealed if cell.has_mine() => CellView::Mine,
            CellState::Revealed => CellView::Count(self.count_close_mines(cell.pos())),
            CellState::Flagged => CellView::Flagged,
            CellState::Hidden => CellView::Hidden,
        }
    }

    fn count_close_mines(&self, pos: Point2D) -> u8 {
        self.grid
            .iter_neighbors(pos)
            .filter(|&neighbour| self.grid[neighbour].has_mine())
            .count() as u8
    }
}

impl<'de> Deserialize<'de> for GridManager {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Stored {
            grid: Grid,
            nbr_mines: CellCount,
            filled: bool,
        }

        let Stored {
            grid,
            nbr_mines,
            filled,
        } = Stored::deserialize(deserializer)?;
        let expected = if filled { nbr_mines } else { 0 };
        let actual = grid.mine_count();
        if actual != expected || (!filled && nbr_mines != 0) {
            return Err(serde::de::Error::custom(
                GridError::InconsistentMineCount { expected, actual },
            ));
        }
        Ok(Self {
            grid,
            nbr_mines,
            filled,
        })
    }
}

impl fmt::Display for GridManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.grid.size();
        for cell in self.grid.iter() {
            write!(f, "{}", self.view_of(cell))?;
            let pos = cell.pos();
            if pos.x + 1 == width && pos.y + 1 < height {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
