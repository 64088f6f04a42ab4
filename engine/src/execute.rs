//! The Move Executor (§4.6): applies an already-legal move to produce a new
//! `GameState`, following the 13-step atomic procedure verbatim. Never
//! validates legality itself — that's the Legality Filter's job, which
//! reuses [`apply_without_end_detection`] to probe hypothetical moves
//! without recursing into End Detection.

use crate::attacks::is_square_attacked;
use crate::color::Side;
use crate::end;
use crate::game::GameState;
use crate::position::Position;
use crate::r#move::{Move, MoveKind};
use crate::special;

/// Steps 1–12: clone, mutate, recompute, advance turn and check state,
/// append history. Stops short of End Detection (step 13).
pub(crate) fn apply_without_end_detection(state: &GameState, mv: &Move) -> GameState {
    let mut next = state.clone();

    // A swap's partner must be read before any mutation touches `to`.
    let swap_partner = if mv.kind == MoveKind::Swap { next.board.occupant_id(mv.to) } else { None };

    // (2) mark captured pieces: primary + additional (non-displacement,
    // en-passant) captures.
    for captured in mv.all_captures() {
        next.board.remove(captured);
    }

    // (3) relocate the mover.
    next.board.relocate(mv.piece, mv.to);

    // (4) castling partner.
    if let Some((partner_id, _from, crossed)) = mv.castle_partner {
        next.board.relocate(partner_id, crossed);
    }

    // (5) swap partner to mover's origin.
    if let Some(partner_id) = swap_partner {
        next.board.relocate(partner_id, mv.from);
    }

    // (6) promotion: overwrite the mover's type.
    if let Some(new_type) = mv.promotion {
        next.board.piece_mut(mv.piece).type_id = new_type;
    }

    // (7) recompute the position index from scratch.
    next.board.rebuild_index();

    // (8) recompute freeze states.
    special::recompute_freeze(&mut next.board, &next.catalog);

    // (9) en-passant target: set iff this was a two-square pawn advance.
    next.en_passant_target = match mv.kind {
        MoveKind::DoublePawnPush => Some(Position::new(mv.from.file, (mv.from.rank + mv.to.rank) / 2)),
        _ => None,
    };

    // (10) advance turn, and turn number on return to white.
    let prior_turn = next.current_turn;
    next.current_turn = !prior_turn;
    if next.current_turn == Side::White {
        next.turn_number += 1;
    }

    // (11) compute the new side-to-move's check state.
    next.in_check = match next.board.royal_of(next.current_turn, &next.catalog) {
        Some(royal) => {
            let pos = royal.position.expect("on_board royal always has a position");
            is_square_attacked(&next.board, &next.catalog, pos, prior_turn).then_some(next.current_turn)
        }
        None => None,
    };

    // (12) append the move record.
    next.move_history.push(mv.clone());

    next
}

/// The public entry point: steps 1–12 plus (13) End Detection.
pub fn apply_move(state: &GameState, mv: &Move) -> GameState {
    let mut next = apply_without_end_detection(state, mv);
    next.result = end::detect(&next);
    next
}
