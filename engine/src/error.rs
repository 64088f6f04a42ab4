//! Error handling per §7: the engine never throws for invalid player input.
//! [`EngineError`] is reserved for internal invariant violations (bugs);
//! draft/placement/move rejections are plain data describing *why*, never
//! exceptions, so the room controller can report them to the offender and
//! keep its authoritative state unchanged.

use crate::catalog::{PieceTypeId, Tier};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("piece instance {0:?} has no position but was asked to move")]
    PieceNotOnBoard(crate::board::PieceInstanceId),
    #[error("side {0:?} has no royal piece on the board")]
    NoRoyalOnBoard(crate::color::Side),
    #[error("position index is inconsistent with the piece array")]
    IndexInconsistent,
}

#[derive(Debug, Clone, Eq, PartialEq)]
#[must_use]
pub enum DraftRejection {
    BudgetExceeded { spent: i32, budget: i32 },
    SlotCapExceeded { tier: Tier, used: u32, cap: u32 },
    MultipleKingReplacers,
    PerTypeCapExceeded { type_id: PieceTypeId, used: u32, cap: u32 },
    UnknownPieceType { type_id: PieceTypeId },
}

#[derive(Debug, Clone, Eq, PartialEq)]
#[must_use]
pub enum PlacementRejection {
    NotYourTurnToPlace,
    PieceNotInPool,
    PositionOutOfBounds,
    PositionOccupied,
    ZoneTierMismatch { expected: Tier },
    HeraldWrongFile,
}

#[derive(Debug, Clone, Eq, PartialEq)]
#[must_use]
pub enum MoveRejection {
    NotYourTurn,
    NoSuchPiece,
    NotPseudoLegal,
    LeavesMoverInCheck,
    PromotionChoiceInvalid,
    PromotionRequired,
    GameAlreadyOver,
}

impl std::fmt::Display for PlacementRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::fmt::Display for DraftRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
