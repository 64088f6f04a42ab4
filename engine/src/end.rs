//! End Detection (§4.7): computed after every executed move for the side
//! about to move. Resignation and timeout results are constructed directly
//! by the session layer and injected without running legality, so they're
//! represented here but never produced by [`detect`].

use crate::color::Side;
use crate::game::GameState;
use crate::legality::legal_moves_for_side;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[must_use]
pub enum GameResultKind {
    Checkmate,
    Stalemate,
    StalemateVpWin,
    DrawVpTie,
    Resignation,
    Timeout,
    DrawAgreed,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[must_use]
pub struct GameResult {
    pub kind: GameResultKind,
    pub winner: Option<Side>,
}

/// Computes the result for the side currently to move, or `None` if the
/// game continues. Failsafe: a side with no royal piece on the board loses
/// immediately (shouldn't arise in legal play).
pub fn detect(state: &GameState) -> Option<GameResult> {
    let side = state.current_turn;
    if state.board.royal_of(side, &state.catalog).is_none() {
        return Some(GameResult { kind: GameResultKind::Checkmate, winner: Some(!side) });
    }

    if !legal_moves_for_side(state, side).is_empty() {
        return None;
    }

    if state.in_check == Some(side) {
        return Some(GameResult { kind: GameResultKind::Checkmate, winner: Some(!side) });
    }

    let white_vp = victory_points(state, Side::White);
    let black_vp = victory_points(state, Side::Black);
    Some(match white_vp.cmp(&black_vp) {
        std::cmp::Ordering::Greater => GameResult { kind: GameResultKind::StalemateVpWin, winner: Some(Side::White) },
        std::cmp::Ordering::Less => GameResult { kind: GameResultKind::StalemateVpWin, winner: Some(Side::Black) },
        std::cmp::Ordering::Equal => GameResult { kind: GameResultKind::DrawVpTie, winner: None },
    })
}

fn victory_points(state: &GameState, side: Side) -> i32 {
    state.board.on_board_for(side).map(|p| state.catalog.get(p.type_id).victory_points).sum()
}
