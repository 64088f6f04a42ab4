//! The Check & Legality Filter (§4.4): a move is legal iff, after applying
//! it (including every side-effect capture/swap), the mover's royal is not
//! attacked. Implemented by cloning, applying, and re-invoking the Attack
//! Oracle, exactly as specified, reusing the executor's non-recursive
//! `apply_without_end_detection` to avoid looping through End Detection.

use crate::attacks::is_square_attacked;
use crate::board::PieceInstanceId;
use crate::color::Side;
use crate::execute::apply_without_end_detection;
use crate::game::GameState;
use crate::movegen::pseudo_legal_moves;
use crate::r#move::Move;
use crate::special;

/// All pseudo-legal moves for one piece, expanded with castling (if it is
/// the royal) and promotion variants, then filtered to those that don't
/// leave the mover in check.
pub fn legal_moves_for_piece(state: &GameState, id: PieceInstanceId) -> Vec<Move> {
    let piece = state.board.piece(id);
    if piece.position.is_none() || piece.owner != state.current_turn {
        return Vec::new();
    }
    let mut candidates = pseudo_legal_moves(&state.board, &state.catalog, id, state.en_passant_target);
    if state.catalog.get(piece.type_id).is_royal {
        candidates.extend(special::castling_moves(state, piece.owner));
    }

    let mut expanded = Vec::new();
    for mv in candidates {
        if special::requires_promotion(&state.catalog, &state.board, &mv) {
            let on_board = state.board.on_board().map(|p| p.type_id);
            let is_fool = special::is_fool(&state.catalog, &state.board, &mv);
            for option in state.catalog.promotion_options(on_board, is_fool) {
                let mut promoted = mv.clone();
                promoted.promotion = Some(option);
                expanded.push(promoted);
            }
        } else {
            expanded.push(mv);
        }
    }

    expanded.into_iter().filter(|mv| is_legal(state, mv)).collect()
}

/// Every legal move for every piece `side` currently owns.
pub fn legal_moves_for_side(state: &GameState, side: Side) -> Vec<Move> {
    let ids: Vec<_> = state.board.on_board_for(side).map(|p| p.id).collect();
    ids.into_iter().flat_map(|id| legal_moves_for_piece(state, id)).collect()
}

fn is_legal(state: &GameState, mv: &Move) -> bool {
    let mover_side = state.board.piece(mv.piece).owner;
    let after = apply_without_end_detection(state, mv);
    match after.board.royal_of(mover_side, &after.catalog) {
        Some(royal) => {
            let pos = royal.position.expect("on_board royal always has a position");
            !is_square_attacked(&after.board, &after.catalog, pos, !mover_side)
        }
        None => false,
    }
}
