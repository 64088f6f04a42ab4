//! The Attack Oracle (§4.3): answers "is `target` threatened by `side`?"
//! Every non-displacement capture kind (coordinator, boxer, withdrawer,
//! thief, long-leap, chameleon, cannon) is already produced by the move
//! generator as a move whose destination or incidental captures name the
//! victim, so the oracle reduces to a single generic scan rather than
//! duplicating each kind's geometry.

use crate::board::Board;
use crate::catalog::Catalog;
use crate::color::Side;
use crate::movegen::pseudo_legal_moves;
use crate::position::Position;

/// Whether `target` is attacked by any piece owned by `side`. For check
/// purposes the king is always treated as capturable regardless of its
/// `can_be_captured` flag (§4.3) — in this catalog every royal piece is in
/// fact capturable, so no override is needed in practice.
pub fn is_square_attacked(board: &Board, catalog: &Catalog, target: Position, side: Side) -> bool {
    let target_occupant = board.occupant_id(target);
    board.on_board_for(side).any(|attacker| {
        pseudo_legal_moves(board, catalog, attacker.id, None)
            .iter()
            .any(|m| m.to == target || target_occupant.is_some_and(|occ| m.all_captures().any(|c| c == occ)))
    })
}

/// Every square of the board between (exclusive) `from` and `to`, used by
/// the castling path-safety check (§4.5 "no square the royal passes
/// through, including its origin and destination, may be attacked").
pub fn squares_between(from: Position, to: Position) -> Vec<Position> {
    let (dx, dy) = (to.file - from.file, to.rank - from.rank);
    let steps = dx.abs().max(dy.abs());
    if steps == 0 {
        return Vec::new();
    }
    let (sx, sy) = (dx.signum(), dy.signum());
    (1..steps).map(|k| Position::new(from.file + sx * k, from.rank + sy * k)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PieceInstance;
    use crate::board::PieceInstanceId;
    use crate::game::BoardSize;

    #[test]
    fn rook_attacks_along_open_file() {
        let catalog = Catalog::standard();
        let mut board = Board::empty(BoardSize::Eight);
        let rook_id = catalog.by_name("Rook").unwrap().id;
        board.add_piece(PieceInstance {
            id: PieceInstanceId(0),
            type_id: rook_id,
            owner: Side::White,
            position: Some(Position::new(0, 0)),
            has_moved: true,
            is_frozen: false,
        });
        assert!(is_square_attacked(&board, &catalog, Position::new(0, 5), Side::White));
        assert!(!is_square_attacked(&board, &catalog, Position::new(5, 5), Side::White));
    }
}
