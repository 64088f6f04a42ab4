//! [`GameState`] (§3): the top-level bundle a Room Controller hands to the
//! rest of the engine and broadcasts (via the session layer) after every
//! accepted operation.

use crate::board::Board;
use crate::catalog::Catalog;
use crate::color::Side;
use crate::end::GameResult;
use crate::position::Position;
use crate::r#move::Move;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[must_use]
pub enum BoardSize {
    Eight,
    TenByEight,
    TenByTen,
}

impl BoardSize {
    pub fn files(self) -> i8 {
        match self {
            BoardSize::Eight => 8,
            BoardSize::TenByEight | BoardSize::TenByTen => 10,
        }
    }

    pub fn ranks(self) -> i8 {
        match self {
            BoardSize::Eight | BoardSize::TenByEight => 8,
            BoardSize::TenByTen => 10,
        }
    }

    /// Per-tier placement slot caps (pawn, piece, royalty), §4.8.
    pub fn slot_caps(self) -> (u32, u32, u32) {
        match self {
            BoardSize::Eight => (8, 6, 2),
            BoardSize::TenByEight | BoardSize::TenByTen => (10, 8, 2),
        }
    }
}

impl Display for BoardSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            BoardSize::Eight => "8x8",
            BoardSize::TenByEight => "10x8",
            BoardSize::TenByTen => "10x10",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[must_use]
pub struct ParseBoardSizeError;

impl FromStr for BoardSize {
    type Err = ParseBoardSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "8x8" => Ok(BoardSize::Eight),
            "10x8" => Ok(BoardSize::TenByEight),
            "10x10" => Ok(BoardSize::TenByTen),
            _ => Err(ParseBoardSizeError),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[must_use]
pub enum Phase {
    Setup,
    Draft,
    Placement,
    Play,
    Ended,
}

#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct PlayerBudget {
    pub budget: i32,
    pub remaining_budget: i32,
    pub victory_points: i32,
}

#[derive(Debug, Clone)]
#[must_use]
pub struct GameState {
    pub phase: Phase,
    pub board_size: BoardSize,
    pub board: Board,
    pub budgets: [PlayerBudget; 2],
    pub current_turn: Side,
    pub turn_number: u32,
    pub en_passant_target: Option<Position>,
    pub in_check: Option<Side>,
    pub move_history: Vec<Move>,
    pub result: Option<GameResult>,
    /// Shared freely, per §5 "the Piece Catalog is immutable and freely
    /// shared" — cloning a `GameState` (as the executor does on every move)
    /// bumps a refcount rather than duplicating the ~24-entry piece table.
    pub catalog: Arc<Catalog>,
}

impl GameState {
    pub fn new(board_size: BoardSize, budget: i32, catalog: Arc<Catalog>) -> Self {
        let pb = PlayerBudget { budget, remaining_budget: budget, victory_points: 0 };
        Self {
            phase: Phase::Setup,
            board_size,
            board: Board::empty(board_size),
            budgets: [pb, pb],
            current_turn: Side::White,
            turn_number: 1,
            en_passant_target: None,
            in_check: None,
            move_history: Vec::new(),
            result: None,
            catalog,
        }
    }

    pub fn budget_for(&self, side: Side) -> &PlayerBudget {
        &self.budgets[side.idx()]
    }
}
