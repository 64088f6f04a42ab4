//! The two sides. Named `Side` rather than `Color` to avoid clashing with
//! piece-glyph coloring concerns, which this crate has none of.

use std::ops::Not;
use strum_macros::{EnumIter, FromRepr};

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, EnumIter, FromRepr)]
#[must_use]
pub enum Side {
    #[default]
    White,
    Black,
}

impl Side {
    pub fn idx(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::White => "white",
            Side::Black => "black",
        }
    }

    /// Direction pawns of this side advance in, in rank units.
    pub fn forward(self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }
}

impl Not for Side {
    type Output = Side;

    fn not(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}
