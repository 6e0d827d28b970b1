use strum::{Display, EnumString, VariantArray};

/// One of the two sides. White always moves first.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Display, EnumString, VariantArray)]
#[strum(ascii_case_insensitive)]
pub enum Player {
    /// The first player.
    White,
    /// The second player, who by default controls zugzwang.
    Black,
}

impl Player {
    /// The other side.
    #[inline]
    pub fn other(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Stable index for per-player arrays.
    #[inline]
    pub(crate) fn index(&self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }

    pub(crate) fn display(&self) -> char {
        match self {
            Self::White => 'x',
            Self::Black => 'o',
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) enum Cell {
    Taken { player: Player },
    #[default]
    Empty,
}

impl Cell {
    #[inline]
    pub(crate) fn owner(&self) -> Option<Player> {
        match self {
            Cell::Taken { player } => Some(*player),
            Cell::Empty => None,
        }
    }
}
