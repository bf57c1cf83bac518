use serde::{Deserialize, Serialize};

use crate::*;

/// Grid dimensions and mine count for one game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    pub mine_count: CellCount,
    pub width: Coord,
    pub height: Coord,
}

impl Difficulty {
    pub const EASY: Self = Self::new_unchecked(10, 8, 8);
    pub const INTERMEDIATE: Self = Self::new_unchecked(40, 16, 16);
    pub const EXPERT: Self = Self::new_unchecked(99, 30, 16);

    pub const fn new_unchecked(mine_count: CellCount, width: Coord, height: Coord) -> Self {
        Self {
            mine_count,
            width,
            height,
        }
    }

    pub fn new(mine_count: CellCount, width: Coord, height: Coord) -> Result<Self> {
        let difficulty = Self::new_unchecked(mine_count, width, height);
        difficulty.validate()?;
        Ok(difficulty)
    }

    /// Checks a difficulty that did not go through [`Difficulty::new`], e.g.
    /// one loaded from a settings file.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GridError::InvalidSize);
        }
        if self.mine_count > self.total_cells() {
            return Err(GridError::InvalidMineCount);
        }
        Ok(())
    }

    pub const fn size(&self) -> Coord2 {
        (self.width, self.height)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::EASY
    }
}

/// Presets offered to the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Easy,
    Intermediate,
    Expert,
}

impl DifficultyLevel {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Intermediate, Self::Expert];

    pub const fn difficulty(self) -> Difficulty {
        match self {
            Self::Easy => Difficulty::EASY,
            Self::Intermediate => Difficulty::INTERMEDIATE,
            Self::Expert => Difficulty::EXPERT,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Intermediate => "Intermediate",
            Self::Expert => "Expert",
        }
    }
}

impl Default for DifficultyLevel {
    fn default() -> Self {
        Self::Easy
    }
}

impl From<DifficultyLevel> for Difficulty {
    fn from(level: DifficultyLevel) -> Self {
        level.difficulty()
    }
}
