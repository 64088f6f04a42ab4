//! Special mechanics (§4.5) that don't fit the per-piece move-generator
//! channel model: castling (spans two pieces), en-passant bookkeeping
//! (mostly in `movegen`/`execute`), promotion eligibility, and the freeze
//! aura (a board-wide fixed point recomputed after every mutation).

use crate::attacks::{is_square_attacked, squares_between};
use crate::board::Board;
use crate::catalog::{CaptureKind, Catalog};
use crate::color::Side;
use crate::game::GameState;
use crate::position::Position;
use crate::r#move::{Move, MoveKind};

/// §4.5 "Freeze aura", recomputed after every board mutation. A piece is
/// frozen iff some other piece on the board is adjacent (Chebyshev 1) and
/// either: the other is a Herald, the other is an opposing freezer, or the
/// other is a Chameleon copying an opposing freezer's aura against this
/// piece. Idempotent: depends only on current positions/types/owners.
pub fn recompute_freeze(board: &mut Board, catalog: &Catalog) {
    let herald_id = catalog.by_name("Herald").map(|d| d.id);
    let ids: Vec<_> = board.on_board().map(|p| p.id).collect();

    let mut frozen = Vec::with_capacity(ids.len());
    for &id in &ids {
        let p = board.piece(id);
        let ppos = p.position.expect("on_board() only yields positioned pieces");
        let powner = p.owner;
        let pdef = catalog.get(p.type_id);

        let is_frozen = ids.iter().any(|&qid| {
            if qid == id {
                return false;
            }
            let q = board.piece(qid);
            let qpos = q.position.expect("on_board() only yields positioned pieces");
            if !ppos.is_adjacent(qpos) {
                return false;
            }
            let qdef = catalog.get(q.type_id);
            let is_herald = herald_id == Some(q.type_id);
            let is_enemy_freezer = qdef.can_freeze && q.owner != powner;
            let is_chameleon_copying_freezer =
                matches!(qdef.capture_type, CaptureKind::Chameleon) && pdef.can_freeze && powner != q.owner;
            is_herald || is_enemy_freezer || is_chameleon_copying_freezer
        });
        frozen.push((id, is_frozen));
    }
    for (id, is_frozen) in frozen {
        board.piece_mut(id).is_frozen = is_frozen;
    }
}

/// Whether a move's mover must promote: pawn-like, landing on the far edge
/// rank relative to its own side.
pub fn requires_promotion(catalog: &Catalog, board: &Board, mv: &Move) -> bool {
    let piece = board.piece(mv.piece);
    let def = catalog.get(piece.type_id);
    if !def.movement.is_pawn_like() {
        return false;
    }
    let edge_rank = if piece.owner == Side::White { board.size.ranks() - 1 } else { 0 };
    mv.to.rank == edge_rank
}

pub fn is_fool(catalog: &Catalog, board: &Board, mv: &Move) -> bool {
    catalog.get(board.piece(mv.piece).type_id).name == "Fool"
}

/// Castling candidates for `side`'s royal piece (§4.5). Both conditions on
/// the mover (not in check, path unattacked) are checked here rather than
/// deferred to the generic legality filter, since castling's own contract
/// folds king-safety into the move's validity rather than a post-hoc
/// "does this leave me in check" test.
pub fn castling_moves(state: &GameState, side: Side) -> Vec<Move> {
    let board = &state.board;
    let catalog = &state.catalog;
    let Some(royal) = board.royal_of(side, catalog) else { return Vec::new() };
    let Some(royal_pos) = royal.position else { return Vec::new() };
    if royal.has_moved {
        return Vec::new();
    }
    let home_rank = if side == Side::White { 0 } else { board.size.ranks() - 1 };
    if royal_pos.rank != home_rank {
        return Vec::new();
    }
    if is_square_attacked(board, catalog, royal_pos, !side) {
        return Vec::new();
    }

    let mut out = Vec::new();
    for partner in board.on_board_for(side) {
        let pdef = catalog.get(partner.type_id);
        if !pdef.can_castle || pdef.is_royal {
            continue;
        }
        let Some(partner_pos) = partner.position else { continue };
        if partner.has_moved || partner_pos.rank != home_rank {
            continue;
        }
        let file_gap = (partner_pos.file - royal_pos.file).abs();
        if file_gap <= 1 {
            continue;
        }
        if squares_between(royal_pos, partner_pos).iter().any(|&sq| board.occupant_id(sq).is_some()) {
            continue;
        }
        let dir = (partner_pos.file - royal_pos.file).signum();
        let dest = Position::new(royal_pos.file + 2 * dir, royal_pos.rank);
        let crossed = Position::new(royal_pos.file + dir, royal_pos.rank);
        if is_square_attacked(board, catalog, crossed, !side) || is_square_attacked(board, catalog, dest, !side) {
            continue;
        }
        let mut mv = Move::new(royal.id, royal_pos, dest);
        mv.kind = MoveKind::Castle;
        mv.castle_partner = Some((partner.id, partner_pos, crossed));
        out.push(mv);
    }
    out
}
