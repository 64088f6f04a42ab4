//! The Move Generator (§4.2): produces every pseudo-legal move for one
//! piece instance by unioning the results of its slide, leap, and special
//! channels. Pseudo-legal here means geometrically valid and respecting
//! occupancy — check legality is the Legality Filter's job (§4.4).

use crate::board::{Board, PieceInstanceId};
use crate::catalog::{Catalog, CaptureKind, PieceTypeDef, PieceTypeId, Tier};
use crate::color::Side;
use crate::movement::{Movement, SlideSet, SpecialTag, ALL_DIRS, DIAGONAL_DIRS, ORTHOGONAL_DIRS};
use crate::position::Position;
use crate::r#move::{Move, MoveKind};

/// All pseudo-legal moves for the piece at `id`. Frozen pieces generate
/// nothing (§4.1 "a frozen piece has no legal moves of its own").
pub fn pseudo_legal_moves(
    board: &Board,
    catalog: &Catalog,
    id: PieceInstanceId,
    en_passant_target: Option<Position>,
) -> Vec<Move> {
    let piece = board.piece(id);
    if piece.is_frozen {
        return Vec::new();
    }
    let Some(pos) = piece.position else {
        return Vec::new();
    };
    let def = catalog.get(piece.type_id);
    generate_channels(board, catalog, def, piece.owner, pos, id, piece.has_moved, en_passant_target)
}

/// The slide/leap/special union for a given (def, side, pos) triple,
/// independent of which real instance it's computed for. Reused by the
/// Chameleon special, which evaluates this same function with a borrowed
/// enemy `PieceTypeDef` (§4.2 "copying the enemy's movement, not the
/// chameleon's").
fn generate_channels(
    board: &Board,
    catalog: &Catalog,
    def: &PieceTypeDef,
    side: Side,
    pos: Position,
    id: PieceInstanceId,
    has_moved: bool,
    en_passant_target: Option<Position>,
) -> Vec<Move> {
    let mut out = Vec::new();
    for &slide in &def.movement.slides {
        gen_slide(board, catalog, def, side, pos, id, slide, &mut out);
    }
    for leap in &def.movement.leaps {
        gen_leap(board, catalog, def, side, pos, id, leap, &mut out);
    }
    for &tag in &def.movement.specials {
        gen_special(board, catalog, def, side, pos, id, has_moved, en_passant_target, tag, &mut out);
    }
    out
}

fn is_enemy(board: &Board, side: Side, target: PieceInstanceId) -> bool {
    board.piece(target).owner != side
}

fn gen_slide(board: &Board, catalog: &Catalog, def: &PieceTypeDef, side: Side, pos: Position, id: PieceInstanceId, slide: SlideSet, out: &mut Vec<Move>) {
    for &dir in slide.directions() {
        let mut cur = pos;
        loop {
            let Some(next) = cur.try_offset(dir, board.size) else { break };
            cur = next;
            match board.occupant_id(cur) {
                None => out.push(Move::new(id, pos, cur)),
                Some(occ) => {
                    if is_enemy(board, side, occ) && def.capture_type.is_displacement() && can_be_captured(catalog, board, occ) {
                        let mut mv = Move::new(id, pos, cur);
                        mv.displacement_capture = Some(occ);
                        out.push(mv);
                    }
                    break;
                }
            }
        }
    }
}

fn can_be_captured(catalog: &Catalog, board: &Board, occ: PieceInstanceId) -> bool {
    catalog.get(board.piece(occ).type_id).can_be_captured
}

fn gen_leap(
    board: &Board,
    catalog: &Catalog,
    def: &PieceTypeDef,
    side: Side,
    pos: Position,
    id: PieceInstanceId,
    leap: &crate::movement::Leap,
    out: &mut Vec<Move>,
) {
    for offset in leap.expand() {
        let Some(dest) = pos.try_offset(offset, board.size) else { continue };
        match board.occupant_id(dest) {
            None => out.push(Move::new(id, pos, dest)),
            Some(occ) => {
                if is_enemy(board, side, occ) && def.capture_type.is_displacement() && can_be_captured(catalog, board, occ) {
                    let mut mv = Move::new(id, pos, dest);
                    mv.displacement_capture = Some(occ);
                    out.push(mv);
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn gen_special(
    board: &Board,
    catalog: &Catalog,
    def: &PieceTypeDef,
    side: Side,
    pos: Position,
    id: PieceInstanceId,
    has_moved: bool,
    en_passant_target: Option<Position>,
    tag: SpecialTag,
    out: &mut Vec<Move>,
) {
    let fwd = side.forward();
    match tag {
        SpecialTag::PawnForward => {
            if let Some(one) = pos.try_offset((0, fwd), board.size) {
                if board.occupant_id(one).is_none() {
                    out.push(Move::new(id, pos, one));
                    let start_band = if side == Side::White { 1 } else { board.size.ranks() - 2 };
                    if !has_moved && pos.rank == start_band {
                        if let Some(two) = one.try_offset((0, fwd), board.size) {
                            if board.occupant_id(two).is_none() {
                                let mut mv = Move::new(id, pos, two);
                                mv.kind = MoveKind::DoublePawnPush;
                                out.push(mv);
                            }
                        }
                    }
                }
            }
        }
        SpecialTag::PawnCaptureDiagonal => {
            for df in [-1i8, 1] {
                let Some(dest) = pos.try_offset((df, fwd), board.size) else { continue };
                match board.occupant_id(dest) {
                    Some(occ) if is_enemy(board, side, occ) && def.capture_type.is_displacement() && can_be_captured(catalog, board, occ) => {
                        let mut mv = Move::new(id, pos, dest);
                        mv.displacement_capture = Some(occ);
                        out.push(mv);
                    }
                    None if en_passant_target == Some(dest) => {
                        let victim_pos = Position::new(dest.file, pos.rank);
                        if let Some(victim) = board.occupant_id(victim_pos) {
                            let mut mv = Move::new(id, pos, dest);
                            mv.kind = MoveKind::EnPassant;
                            mv.additional_captures.push(victim);
                            out.push(mv);
                        }
                    }
                    _ => {}
                }
            }
        }
        SpecialTag::ShogiPawn => {
            if let Some(dest) = pos.try_offset((0, fwd), board.size) {
                match board.occupant_id(dest) {
                    None => out.push(Move::new(id, pos, dest)),
                    Some(occ) if is_enemy(board, side, occ) && def.capture_type.is_displacement() && can_be_captured(catalog, board, occ) => {
                        let mut mv = Move::new(id, pos, dest);
                        mv.displacement_capture = Some(occ);
                        out.push(mv);
                    }
                    _ => {}
                }
            }
        }
        SpecialTag::PeasantDiagonal => {
            for df in [-1i8, 1] {
                let Some(one) = pos.try_offset((df, fwd), board.size) else { continue };
                if board.occupant_id(one).is_none() {
                    out.push(Move::new(id, pos, one));
                    if !has_moved {
                        if let Some(two) = one.try_offset((df, fwd), board.size) {
                            if board.occupant_id(two).is_none() {
                                let mut mv = Move::new(id, pos, two);
                                mv.kind = MoveKind::DoubleDiagonalPush;
                                out.push(mv);
                            }
                        }
                    }
                }
            }
        }
        SpecialTag::PeasantCaptureForward => {
            if let Some(dest) = pos.try_offset((0, fwd), board.size) {
                if let Some(occ) = board.occupant_id(dest) {
                    if is_enemy(board, side, occ) && def.capture_type.is_displacement() && can_be_captured(catalog, board, occ) {
                        let mut mv = Move::new(id, pos, dest);
                        mv.displacement_capture = Some(occ);
                        out.push(mv);
                    }
                }
            }
        }
        SpecialTag::KingOneSquare => {
            for &dir in &ALL_DIRS {
                let Some(dest) = pos.try_offset(dir, board.size) else { continue };
                match board.occupant_id(dest) {
                    None => out.push(Move::new(id, pos, dest)),
                    Some(occ) if is_enemy(board, side, occ) && def.capture_type.is_displacement() && can_be_captured(catalog, board, occ) => {
                        let mut mv = Move::new(id, pos, dest);
                        mv.displacement_capture = Some(occ);
                        out.push(mv);
                    }
                    _ => {}
                }
            }
        }
        SpecialTag::SwapAdjacent => {
            for &dir in &ALL_DIRS {
                let Some(dest) = pos.try_offset(dir, board.size) else { continue };
                if let Some(occ) = board.occupant_id(dest) {
                    if !is_enemy(board, side, occ) {
                        let mut mv = Move::new(id, pos, dest);
                        mv.kind = MoveKind::Swap;
                        out.push(mv);
                    }
                }
            }
        }
        SpecialTag::HeraldOrthogonal => {
            for &dir in &ORTHOGONAL_DIRS {
                let Some(mid) = pos.try_offset(dir, board.size) else { continue };
                if board.occupant_id(mid).is_some() {
                    continue;
                }
                let Some(dest) = mid.try_offset(dir, board.size) else { continue };
                if board.occupant_id(dest).is_none() {
                    out.push(Move::new(id, pos, dest));
                }
            }
        }
        SpecialTag::RegentConditional => {
            let other_royal_exists =
                board.on_board_for(side).any(|p| p.id != id && catalog.get(p.type_id).is_royal);
            if !other_royal_exists && board.had_multiple_royals[side.idx()] {
                gen_slide(board, catalog, &standard_slide_def(def.capture_type), side, pos, id, SlideSet::All, out);
            } else {
                for &dir in &ALL_DIRS {
                    let Some(mid) = pos.try_offset(dir, board.size) else { continue };
                    if board.occupant_id(mid).is_some() {
                        continue;
                    }
                    let Some(dest) = mid.try_offset(dir, board.size) else { continue };
                    match board.occupant_id(dest) {
                        None => out.push(Move::new(id, pos, dest)),
                        Some(occ) if is_enemy(board, side, occ) && def.capture_type.is_displacement() && can_be_captured(catalog, board, occ) => {
                            let mut mv = Move::new(id, pos, dest);
                            mv.displacement_capture = Some(occ);
                            out.push(mv);
                        }
                        _ => {}
                    }
                }
            }
        }
        SpecialTag::Bounce => gen_bounce(board, catalog, def, side, pos, id, out),
        SpecialTag::LongLeap => {
            for &dir in &ALL_DIRS {
                long_leap_direction(board, catalog, side, pos, id, dir, Vec::new(), out);
            }
        }
        SpecialTag::Chameleon => gen_chameleon(board, catalog, side, pos, id, out),
        SpecialTag::Grasshopper => {
            for &dir in &ALL_DIRS {
                let mut cur = pos;
                let mut hurdle = None;
                loop {
                    let Some(next) = cur.try_offset(dir, board.size) else { break };
                    cur = next;
                    if board.occupant_id(cur).is_some() {
                        hurdle = Some(cur);
                        break;
                    }
                }
                if let Some(h) = hurdle {
                    if let Some(dest) = h.try_offset(dir, board.size) {
                        match board.occupant_id(dest) {
                            None => out.push(Move::new(id, pos, dest)),
                            Some(occ) if is_enemy(board, side, occ) && def.capture_type.is_displacement() && can_be_captured(catalog, board, occ) => {
                                let mut mv = Move::new(id, pos, dest);
                                mv.displacement_capture = Some(occ);
                                out.push(mv);
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
        SpecialTag::CannonMove => gen_cannon(board, catalog, side, pos, id, out),
        SpecialTag::Coordinator => {
            gen_slide(board, catalog, &nondisplacement_slide_def(), side, pos, id, SlideSet::All, out);
            coordinator_bonus_captures(board, catalog, side, pos, id, out);
        }
        SpecialTag::Boxer => {
            gen_slide(board, catalog, &nondisplacement_slide_def(), side, pos, id, SlideSet::All, out);
            boxer_bonus_captures(board, catalog, side, pos, id, out);
        }
        SpecialTag::Withdrawer => {
            gen_slide(board, catalog, &nondisplacement_slide_def(), side, pos, id, SlideSet::All, out);
            withdrawer_bonus_captures(board, catalog, side, pos, id, out);
        }
        SpecialTag::Thief => thief_moves(board, catalog, side, pos, id, out),
        SpecialTag::Nightrider { offset } => {
            for &(sf, sr) in &symmetric8(offset) {
                let mut cur = pos;
                loop {
                    let Some(next) = cur.try_offset((sf, sr), board.size) else { break };
                    cur = next;
                    match board.occupant_id(cur) {
                        None => out.push(Move::new(id, pos, cur)),
                        Some(occ) => {
                            if is_enemy(board, side, occ) && def.capture_type.is_displacement() && can_be_captured(catalog, board, occ) {
                                let mut mv = Move::new(id, pos, cur);
                                mv.displacement_capture = Some(occ);
                                out.push(mv);
                            }
                            break;
                        }
                    }
                }
            }
        }
    }
}

fn symmetric8(offset: (i8, i8)) -> Vec<(i8, i8)> {
    let (df, dr) = offset;
    let mut out = Vec::new();
    for &(sf, sr) in &[(1i8, 1i8), (1, -1), (-1, 1), (-1, -1)] {
        out.push((df * sf, dr * sr));
        out.push((dr * sf, df * sr));
    }
    out.sort_unstable();
    out.dedup();
    out
}

/// A throwaway def used purely to drive `gen_slide`'s displacement gate for
/// a non-displacement capturer's *base* movement, which never captures by
/// displacement.
fn nondisplacement_slide_def() -> PieceTypeDef {
    PieceTypeDef {
        id: PieceTypeId(0),
        name: "",
        ascii: ' ',
        tier: Tier::Other,
        cost: 0,
        victory_points: 0,
        is_royal: false,
        is_mandatory: false,
        replaces_king: false,
        can_castle: false,
        can_be_captured: false,
        can_freeze: false,
        can_be_jumped_over: true,
        movement: Movement::new(),
        capture_type: CaptureKind::None,
    }
}

fn standard_slide_def(capture_type: CaptureKind) -> PieceTypeDef {
    let _ = capture_type;
    PieceTypeDef { capture_type: CaptureKind::Standard, ..nondisplacement_slide_def() }
}

fn gen_bounce(board: &Board, catalog: &Catalog, def: &PieceTypeDef, side: Side, pos: Position, id: PieceInstanceId, out: &mut Vec<Move>) {
    for &start_dir in &DIAGONAL_DIRS {
        let mut cur = pos;
        let mut dir = start_dir;
        let mut visited = vec![pos];
        for _ in 0..(board.size.files() as usize * board.size.ranks() as usize) {
            let (mut nf, mut nr) = (cur.file + dir.0, cur.rank + dir.1);
            let mut dx = dir.0;
            let mut dy = dir.1;
            if nf < 0 || nf >= board.size.files() {
                dx = -dx;
            }
            if nr < 0 || nr >= board.size.ranks() {
                dy = -dy;
            }
            dir = (dx, dy);
            nf = cur.file + dir.0;
            nr = cur.rank + dir.1;
            let next = Position::new(nf, nr);
            if !next.in_bounds(board.size) || visited.contains(&next) {
                break;
            }
            visited.push(next);
            match board.occupant_id(next) {
                None => {
                    out.push(Move::new(id, pos, next));
                    cur = next;
                }
                Some(occ) => {
                    if is_enemy(board, side, occ) && def.capture_type.is_displacement() && can_be_captured(catalog, board, occ) {
                        let mut mv = Move::new(id, pos, next);
                        mv.displacement_capture = Some(occ);
                        out.push(mv);
                    }
                    break;
                }
            }
        }
    }
}

fn long_leap_direction(
    board: &Board,
    catalog: &Catalog,
    side: Side,
    start: Position,
    id: PieceInstanceId,
    dir: (i8, i8),
    captured_so_far: Vec<PieceInstanceId>,
    out: &mut Vec<Move>,
) {
    let mut cur = start;
    loop {
        let Some(next) = cur.try_offset(dir, board.size) else { return };
        match board.occupant_id(next) {
            None => {
                let mut mv = Move::new(id, start, next);
                mv.additional_captures = captured_so_far.clone();
                out.push(mv);
                cur = next;
            }
            Some(occ) => {
                if is_enemy(board, side, occ) && board_piece_jumpable(catalog, board, occ) {
                    let mut run = captured_so_far.clone();
                    run.push(occ);
                    let mut probe = next;
                    loop {
                        let Some(beyond) = probe.try_offset(dir, board.size) else { return };
                        match board.occupant_id(beyond) {
                            None => {
                                let mut mv = Move::new(id, start, beyond);
                                mv.additional_captures = run.clone();
                                out.push(mv);
                                long_leap_direction(board, catalog, side, beyond, id, dir, run, out);
                                return;
                            }
                            Some(occ2) if is_enemy(board, side, occ2) && board_piece_jumpable(catalog, board, occ2) => {
                                run.push(occ2);
                                probe = beyond;
                            }
                            _ => return,
                        }
                    }
                }
                return;
            }
        }
    }
}

fn board_piece_jumpable(catalog: &Catalog, board: &Board, occ: PieceInstanceId) -> bool {
    let def = catalog.get(board.piece(occ).type_id);
    def.can_be_jumped_over && def.can_be_captured
}

fn gen_chameleon(board: &Board, catalog: &Catalog, side: Side, pos: Position, id: PieceInstanceId, out: &mut Vec<Move>) {
    // (a) queen-line non-capturing movement.
    gen_slide(board, catalog, &nondisplacement_slide_def(), side, pos, id, SlideSet::All, out);

    for enemy in board.on_board() {
        if enemy.owner == side {
            continue;
        }
        let Some(epos) = enemy.position else { continue };
        let edef = catalog.get(enemy.type_id);
        if matches!(edef.capture_type, CaptureKind::Chameleon) {
            continue;
        }
        // (b) copy the enemy's own movement to see if it reaches `epos`.
        let copied = generate_channels(board, catalog, edef, side, pos, id, true, None);
        if copied.iter().any(|m| m.to == epos) && edef.can_be_captured {
            let mut mv = Move::new(id, pos, epos);
            mv.displacement_capture = Some(enemy.id);
            out.push(mv);
        }
        // (c) coordinator/boxer/withdrawer/cannon-style capture of that
        // specific enemy type.
        match edef.capture_type {
            CaptureKind::Coordinator => chameleon_coordinator_capture(board, catalog, side, pos, id, enemy.id, out),
            CaptureKind::Boxer => chameleon_boxer_capture(board, catalog, side, pos, id, enemy.id, out),
            CaptureKind::Withdrawal => chameleon_withdrawer_capture(board, catalog, side, pos, id, enemy.id, out),
            CaptureKind::Cannon => chameleon_cannon_capture(board, catalog, side, pos, id, enemy.id, out),
            _ => {}
        }
    }

    // (d) long-leaper-style jumps, restricted to paths that jump at least
    // one enemy long-leaper.
    for &dir in &ALL_DIRS {
        let mut found: Vec<Move> = Vec::new();
        long_leap_direction(board, catalog, side, pos, id, dir, Vec::new(), &mut found);
        for mv in found {
            if mv
                .additional_captures
                .iter()
                .any(|c| matches!(catalog.get(board.piece(*c).type_id).capture_type, CaptureKind::LongLeap))
            {
                out.push(mv);
            }
        }
    }
}

fn queen_destinations(board: &Board, catalog: &Catalog, side: Side, pos: Position) -> Vec<Position> {
    let mut dests = Vec::new();
    let mut fake = Vec::new();
    gen_slide(board, catalog, &nondisplacement_slide_def(), side, pos, PieceInstanceId(u32::MAX), SlideSet::All, &mut fake);
    for mv in fake {
        dests.push(mv.to);
    }
    dests
}

fn coordinator_bonus_captures(board: &Board, catalog: &Catalog, side: Side, pos: Position, id: PieceInstanceId, out: &mut Vec<Move>) {
    chameleon_coordinator_capture_any(board, catalog, side, pos, id, out, None);
}

fn chameleon_coordinator_capture(board: &Board, catalog: &Catalog, side: Side, pos: Position, id: PieceInstanceId, enemy: PieceInstanceId, out: &mut Vec<Move>) {
    chameleon_coordinator_capture_any(board, catalog, side, pos, id, out, Some(enemy));
}

fn chameleon_coordinator_capture_any(
    board: &Board,
    catalog: &Catalog,
    side: Side,
    pos: Position,
    id: PieceInstanceId,
    out: &mut Vec<Move>,
    only: Option<PieceInstanceId>,
) {
    let Some(king) = board.royal_of(side, catalog) else { return };
    let Some(kpos) = king.position else { return };
    for d in queen_destinations(board, catalog, side, pos) {
        for cand in [Position::new(kpos.file, d.rank), Position::new(d.file, kpos.rank)] {
            if cand == d || !cand.in_bounds(board.size) {
                continue;
            }
            if let Some(occ) = board.occupant_id(cand) {
                if only.map(|e| e == occ).unwrap_or(true) && is_enemy(board, side, occ) && can_be_captured(catalog, board, occ) {
                    let mut mv = Move::new(id, pos, d);
                    mv.additional_captures.push(occ);
                    out.push(mv);
                }
            }
        }
    }
}

fn boxer_bonus_captures(board: &Board, catalog: &Catalog, side: Side, pos: Position, id: PieceInstanceId, out: &mut Vec<Move>) {
    chameleon_boxer_capture_any(board, catalog, side, pos, id, out, None);
}

fn chameleon_boxer_capture(board: &Board, catalog: &Catalog, side: Side, pos: Position, id: PieceInstanceId, enemy: PieceInstanceId, out: &mut Vec<Move>) {
    chameleon_boxer_capture_any(board, catalog, side, pos, id, out, Some(enemy));
}

fn chameleon_boxer_capture_any(
    board: &Board,
    catalog: &Catalog,
    side: Side,
    pos: Position,
    id: PieceInstanceId,
    out: &mut Vec<Move>,
    only: Option<PieceInstanceId>,
) {
    for d in queen_destinations(board, catalog, side, pos) {
        for &dir in &ORTHOGONAL_DIRS {
            let Some(target_pos) = d.try_offset(dir, board.size) else { continue };
            let Some(occ) = board.occupant_id(target_pos) else { continue };
            if only.map(|e| e == occ).unwrap_or(true) && is_enemy(board, side, occ) && can_be_captured(catalog, board, occ) {
                let Some(behind) = target_pos.try_offset(dir, board.size) else { continue };
                if let Some(supporter) = board.occupant_id(behind) {
                    if !is_enemy(board, side, supporter) && supporter != id {
                        let mut mv = Move::new(id, pos, d);
                        mv.additional_captures.push(occ);
                        out.push(mv);
                    }
                }
            }
        }
    }
}

fn withdrawer_bonus_captures(board: &Board, catalog: &Catalog, side: Side, pos: Position, id: PieceInstanceId, out: &mut Vec<Move>) {
    chameleon_withdrawer_capture_any(board, catalog, side, pos, id, out, None);
}

fn chameleon_withdrawer_capture(board: &Board, catalog: &Catalog, side: Side, pos: Position, id: PieceInstanceId, enemy: PieceInstanceId, out: &mut Vec<Move>) {
    chameleon_withdrawer_capture_any(board, catalog, side, pos, id, out, Some(enemy));
}

fn chameleon_withdrawer_capture_any(
    board: &Board,
    catalog: &Catalog,
    side: Side,
    pos: Position,
    id: PieceInstanceId,
    out: &mut Vec<Move>,
    only: Option<PieceInstanceId>,
) {
    for &dir in &ALL_DIRS {
        let Some(target_pos) = pos.try_offset(dir, board.size) else { continue };
        let Some(occ) = board.occupant_id(target_pos) else { continue };
        if !(only.map(|e| e == occ).unwrap_or(true) && is_enemy(board, side, occ) && can_be_captured(catalog, board, occ)) {
            continue;
        }
        let away = (-dir.0, -dir.1);
        for d in queen_destinations(board, catalog, side, pos) {
            let delta = (sign(d.file - pos.file), sign(d.rank - pos.rank));
            if delta == away {
                let mut mv = Move::new(id, pos, d);
                mv.additional_captures.push(occ);
                out.push(mv);
            }
        }
    }
}

fn sign(v: i8) -> i8 {
    v.signum()
}

fn chameleon_cannon_capture(board: &Board, catalog: &Catalog, side: Side, pos: Position, id: PieceInstanceId, enemy: PieceInstanceId, out: &mut Vec<Move>) {
    let mut found = Vec::new();
    gen_cannon(board, catalog, side, pos, id, &mut found);
    for mv in found {
        if mv.displacement_capture == Some(enemy) {
            out.push(mv);
        }
    }
}

fn gen_cannon(board: &Board, catalog: &Catalog, side: Side, pos: Position, id: PieceInstanceId, out: &mut Vec<Move>) {
    for &dir in &ORTHOGONAL_DIRS {
        let mut cur = pos;
        loop {
            let Some(next) = cur.try_offset(dir, board.size) else { break };
            cur = next;
            if board.occupant_id(cur).is_none() {
                out.push(Move::new(id, pos, cur));
                continue;
            }
            // found the screen; look past it for the first occupied square.
            let mut probe = cur;
            loop {
                let Some(beyond) = probe.try_offset(dir, board.size) else { break };
                probe = beyond;
                match board.occupant_id(probe) {
                    None => continue,
                    Some(occ) => {
                        if is_enemy(board, side, occ) && can_be_captured(catalog, board, occ) {
                            let mut mv = Move::new(id, pos, probe);
                            mv.displacement_capture = Some(occ);
                            out.push(mv);
                        }
                        break;
                    }
                }
            }
            break;
        }
    }
}

fn thief_moves(board: &Board, catalog: &Catalog, side: Side, pos: Position, id: PieceInstanceId, out: &mut Vec<Move>) {
    for &dir in &ALL_DIRS {
        let mut cur = pos;
        loop {
            let Some(next) = cur.try_offset(dir, board.size) else { break };
            match board.occupant_id(next) {
                None => {
                    out.push(Move::new(id, pos, next));
                    cur = next;
                }
                Some(occ) => {
                    if is_enemy(board, side, occ) && can_be_captured(catalog, board, occ) {
                        let mut mv = Move::new(id, pos, cur);
                        mv.additional_captures.push(occ);
                        out.push(mv);
                    }
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, PieceInstance};
    use crate::catalog::Catalog;
    use crate::game::BoardSize;

    fn empty_board() -> (Board, Catalog) {
        (Board::empty(BoardSize::Eight), Catalog::standard())
    }

    #[test]
    fn chameleon_copies_knight_attack() {
        let (mut board, catalog) = empty_board();
        let chameleon_id = catalog.by_name("Chameleon").unwrap().id;
        let knight_id = catalog.by_name("Knight").unwrap().id;
        let p1 = PieceInstanceId(0);
        let p2 = PieceInstanceId(1);
        board.add_piece(PieceInstance {
            id: p1,
            type_id: chameleon_id,
            owner: Side::White,
            position: Some(Position::new(2, 2)), // c3
            has_moved: true,
            is_frozen: false,
        });
        board.add_piece(PieceInstance {
            id: p2,
            type_id: knight_id,
            owner: Side::Black,
            position: Some(Position::new(1, 4)), // b5
            has_moved: true,
            is_frozen: false,
        });
        let moves = pseudo_legal_moves(&board, &catalog, p1, None);
        assert!(moves.iter().any(|m| m.to == Position::new(1, 4) && m.displacement_capture == Some(p2)));
    }

    #[test]
    fn long_leaper_chain_captures_two_pieces() {
        let (mut board, catalog) = empty_board();
        let leaper_id = catalog.by_name("Long-Leaper").unwrap().id;
        let pawn_id = catalog.by_name("Pawn").unwrap().id;
        let knight_id = catalog.by_name("Knight").unwrap().id;
        let p1 = PieceInstanceId(0);
        let victim1 = PieceInstanceId(1);
        let victim2 = PieceInstanceId(2);
        board.add_piece(PieceInstance {
            id: p1,
            type_id: leaper_id,
            owner: Side::White,
            position: Some(Position::new(0, 0)), // a1
            has_moved: true,
            is_frozen: false,
        });
        board.add_piece(PieceInstance {
            id: victim1,
            type_id: pawn_id,
            owner: Side::Black,
            position: Some(Position::new(1, 1)), // b2
            has_moved: true,
            is_frozen: false,
        });
        board.add_piece(PieceInstance {
            id: victim2,
            type_id: knight_id,
            owner: Side::Black,
            position: Some(Position::new(2, 2)), // c3
            has_moved: true,
            is_frozen: false,
        });
        let moves = pseudo_legal_moves(&board, &catalog, p1, None);
        let chain = moves.iter().find(|m| m.to == Position::new(3, 3)).expect("d4 reachable");
        assert_eq!(chain.additional_captures.len(), 2);
        assert!(chain.additional_captures.contains(&victim1));
        assert!(chain.additional_captures.contains(&victim2));
    }
}
