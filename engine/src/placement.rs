//! Placement Logic (§4.9): alternating placement of each side's drafted
//! army onto its placement zones, with the Herald's pawn-rank exception.

use crate::board::{Board, PieceInstance, PieceInstanceId};
use crate::catalog::{Catalog, Tier};
use crate::color::Side;
use crate::error::PlacementRejection;
use crate::game::BoardSize;
use crate::position::Position;

/// Zero-based file indices for `d` and `e`: the royalty zone (§4.9) is
/// pinned here on every board width, never re-centered for wider boards.
const ROYALTY_FILE_D: i8 = 3;
const ROYALTY_FILE_E: i8 = 4;

#[derive(Debug, Clone)]
#[must_use]
pub struct PlacementState {
    /// Index 0 = white's pool, 1 = black's.
    pub pools: [Vec<PieceInstance>; 2],
    pub current_placer: Side,
}

#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct PawnSwap {
    pub pawn_id: PieceInstanceId,
    pub new_position: Position,
}

#[derive(Debug, Clone)]
#[must_use]
pub struct PlacementOutcome {
    pub actual_position: Position,
    pub pawn_swap: Option<PawnSwap>,
}

impl PlacementState {
    pub fn new(white_pool: Vec<PieceInstance>, black_pool: Vec<PieceInstance>) -> Self {
        Self { pools: [white_pool, black_pool], current_placer: Side::White }
    }

    pub fn is_complete(&self) -> bool {
        self.pools[0].is_empty() && self.pools[1].is_empty()
    }

    fn pool(&self, side: Side) -> &Vec<PieceInstance> {
        &self.pools[side.idx()]
    }

    fn pool_mut(&mut self, side: Side) -> &mut Vec<PieceInstance> {
        &mut self.pools[side.idx()]
    }

    /// Advances `current_placer`, per §4.9: "alternately starting with
    /// white; when one side exhausts its pool, the other continues alone".
    fn advance_turn(&mut self) {
        let other = !self.current_placer;
        if !self.pool(other).is_empty() {
            self.current_placer = other;
        }
        // else: current_placer continues alone (unchanged).
    }

    pub fn place(
        &mut self,
        board: &mut Board,
        catalog: &Catalog,
        placer: Side,
        piece_id: PieceInstanceId,
        target: Position,
    ) -> Result<PlacementOutcome, PlacementRejection> {
        if placer != self.current_placer {
            return Err(PlacementRejection::NotYourTurnToPlace);
        }
        if !target.in_bounds(board.size) {
            return Err(PlacementRejection::PositionOutOfBounds);
        }
        let Some(pool_index) = self.pool(placer).iter().position(|p| p.id == piece_id) else {
            return Err(PlacementRejection::PieceNotInPool);
        };
        let def = catalog.get(self.pool(placer)[pool_index].type_id);
        let is_herald = def.name == "Herald";

        let back_rank = if placer == Side::White { 0 } else { board.size.ranks() - 1 };
        let pawn_rank = if placer == Side::White { 1 } else { board.size.ranks() - 2 };
        let files = board.size.files();
        // The royalty zone is fixed at files d/e regardless of board width
        // (§4.9): wider boards only extend the piece zones flanking it, they
        // never shift where royalty may stand.
        let center = (ROYALTY_FILE_D, ROYALTY_FILE_E);
        let is_herald_file = target.file == 0 || target.file == files - 1;

        let actual_position;
        let mut pawn_swap = None;

        if is_herald {
            if !is_herald_file {
                return Err(PlacementRejection::HeraldWrongFile);
            }
            if target.rank == back_rank {
                let snapped = Position::new(target.file, pawn_rank);
                if let Some(occ) = board.occupant_id(snapped) {
                    if board.piece(occ).owner == placer && catalog.get(board.piece(occ).type_id).tier == Tier::Pawn {
                        board.relocate(occ, Position::new(target.file, back_rank));
                        pawn_swap = Some(PawnSwap { pawn_id: occ, new_position: Position::new(target.file, back_rank) });
                    } else if board.occupant_id(snapped).is_some() {
                        return Err(PlacementRejection::PositionOccupied);
                    }
                }
                actual_position = snapped;
            } else if target.rank == pawn_rank {
                if board.occupant_id(target).is_some() {
                    return Err(PlacementRejection::PositionOccupied);
                }
                actual_position = target;
            } else {
                return Err(PlacementRejection::ZoneTierMismatch { expected: Tier::Royalty });
            }
        } else if target.rank == pawn_rank && def.tier == Tier::Pawn {
            if board.occupant_id(target).is_some() {
                return Err(PlacementRejection::PositionOccupied);
            }
            actual_position = target;
        } else if target.rank == back_rank {
            let expected_tier = if target.file >= center.0 && target.file <= center.1 { Tier::Royalty } else { Tier::Piece };
            if def.tier == Tier::Pawn && is_herald_file {
                // Reciprocal Herald exception: a pawn targeting the
                // back-rank square of an edge file whose pawn-rank square
                // already holds a Herald is placed at that back-rank
                // square directly, bypassing the normal pawn-rank-only rule.
                let herald_square = Position::new(target.file, pawn_rank);
                let herald_present = board
                    .occupant_id(herald_square)
                    .map(|occ| catalog.get(board.piece(occ).type_id).name == "Herald")
                    .unwrap_or(false);
                if !herald_present {
                    return Err(PlacementRejection::ZoneTierMismatch { expected: Tier::Pawn });
                }
            } else if def.tier != expected_tier {
                return Err(PlacementRejection::ZoneTierMismatch { expected: expected_tier });
            }
            if board.occupant_id(target).is_some() {
                return Err(PlacementRejection::PositionOccupied);
            }
            actual_position = target;
        } else {
            return Err(PlacementRejection::ZoneTierMismatch { expected: def.tier });
        }

        let mut piece = self.pool_mut(placer).remove(pool_index);
        piece.position = Some(actual_position);
        board.add_piece(piece);
        self.advance_turn();

        Ok(PlacementOutcome { actual_position, pawn_swap })
    }

    /// §4.9: "placement completion freezes `hadMultipleRoyals`" — called
    /// once [`is_complete`] is true.
    pub fn finalize_had_multiple_royals(board: &mut Board, catalog: &Catalog) {
        for &side in &[Side::White, Side::Black] {
            let royalty_count = board.on_board_for(side).filter(|p| catalog.get(p.type_id).tier == Tier::Royalty).count();
            board.had_multiple_royals[side.idx()] = royalty_count >= 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::BoardSize;

    fn pawn(id: u32, catalog: &Catalog, owner: Side) -> PieceInstance {
        PieceInstance {
            id: PieceInstanceId(id),
            type_id: catalog.by_name("Pawn").unwrap().id,
            owner,
            position: None,
            has_moved: false,
            is_frozen: false,
        }
    }

    fn herald(id: u32, catalog: &Catalog, owner: Side) -> PieceInstance {
        PieceInstance {
            id: PieceInstanceId(id),
            type_id: catalog.by_name("Herald").unwrap().id,
            owner,
            position: None,
            has_moved: false,
            is_frozen: false,
        }
    }

    #[test]
    fn herald_placed_on_back_rank_snaps_and_swaps_existing_pawn() {
        let catalog = Catalog::standard();
        let mut board = Board::empty(BoardSize::Eight);
        let mut state = PlacementState::new(
            vec![herald(1, &catalog, Side::White)],
            vec![pawn(2, &catalog, Side::Black)],
        );

        // Pre-place white's pawn on a2 directly via the board (simulating
        // an earlier placement step already completed).
        board.add_piece(PieceInstance {
            id: PieceInstanceId(0),
            type_id: catalog.by_name("Pawn").unwrap().id,
            owner: Side::White,
            position: Some(Position::new(0, 1)),
            has_moved: false,
            is_frozen: false,
        });

        let outcome = state
            .place(&mut board, &catalog, Side::White, PieceInstanceId(1), Position::new(0, 0))
            .expect("herald placement should succeed");

        assert_eq!(outcome.actual_position, Position::new(0, 1));
        let swap = outcome.pawn_swap.expect("pawn should have swapped up to the back rank");
        assert_eq!(swap.new_position, Position::new(0, 0));
        assert_eq!(board.at(Position::new(0, 0)).unwrap().id, PieceInstanceId(0));
        assert_eq!(board.at(Position::new(0, 1)).unwrap().id, PieceInstanceId(1));
    }
}
