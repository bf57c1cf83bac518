use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// State of a single grid position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pos: Point2D,
    pub(crate) has_mine: bool,
    pub(crate) is_revealed: bool,
    pub(crate) is_flagged: bool,
}

impl Cell {
    pub(crate) const fn new(pos: Point2D) -> Self {
        Self {
            pos,
            has_mine: false,
            is_revealed: false,
            is_flagged: false,
        }
    }

    pub const fn pos(&self) -> Point2D {
        self.pos
    }

    pub const fn has_mine(&self) -> bool {
        self.has_mine
    }

    pub const fn is_revealed(&self) -> bool {
        self.is_revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.is_flagged
    }

    pub const fn state(&self) -> CellState {
        if self.is_revealed {
            CellState::Revealed
        } else if self.is_flagged {
            CellState::Flagged
        } else {
            CellState::Hidden
        }
    }
}

/// Player-facing lifecycle of a cell. `Revealed` is terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    Revealed,
}

impl CellState {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

/// What the presentation layer draws for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Mine,
    Count(u8),
}

impl CellView {
    pub const fn symbol(self) -> char {
        match self {
            Self::Hidden => ' ',
            Self::Flagged => 'F',
            Self::Mine => 'M',
            Self::Count(count) => match char::from_digit(count as u32, 10) {
                Some(digit) => digit,
                None => '?',
            },
        }
    }
}

impl fmt::Display for CellView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
