//! Wire-safe projections of engine types (§6 "the core treats messages
//! abstractly as tagged records"). The engine crate stays free of `serde` —
//! these are the boundary where internal types become JSON.

use engine::{
    Board, BoardSize, CaptureKind, Catalog, DraftSelection, GameResult, GameResultKind, Move, MoveKind, PawnSwap,
    PieceInstance, PieceTypeId, PlacementOutcome, PlacementState, Position, Side,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideWire {
    White,
    Black,
}

impl From<Side> for SideWire {
    fn from(s: Side) -> Self {
        match s {
            Side::White => SideWire::White,
            Side::Black => SideWire::Black,
        }
    }
}

impl From<SideWire> for Side {
    fn from(s: SideWire) -> Self {
        match s {
            SideWire::White => Side::White,
            SideWire::Black => Side::Black,
        }
    }
}

/// `{file, rank}`, zero-based, matching the engine's internal coordinates
/// rather than algebraic notation — clients translate for display.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct PositionWire {
    pub file: i8,
    pub rank: i8,
}

impl From<Position> for PositionWire {
    fn from(p: Position) -> Self {
        Self { file: p.file, rank: p.rank }
    }
}

impl From<PositionWire> for Position {
    fn from(p: PositionWire) -> Self {
        Position::new(p.file, p.rank)
    }
}

/// Bridges [`BoardSize`]'s `Display`/`FromStr` to serde, per §6 ("8x8",
/// "10x8", "10x10").
pub fn serialize_board_size<S: serde::Serializer>(size: &BoardSize, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&size.to_string())
}

pub fn deserialize_board_size<'de, D: serde::Deserializer<'de>>(d: D) -> Result<BoardSize, D::Error> {
    let raw = String::deserialize(d)?;
    raw.parse().map_err(|_| serde::de::Error::custom(format!("'{raw}' is not a valid board size")))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSettings {
    pub budget: i32,
    #[serde(serialize_with = "serialize_board_size", deserialize_with = "deserialize_board_size")]
    pub board_size: BoardSize,
    pub draft_time_limit_secs: u64,
    /// Reserved (§5 "move time limit is a reserved settings field"): carried
    /// but never starts a timer.
    pub move_time_limit_secs: Option<u64>,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self { budget: 360, board_size: BoardSize::Eight, draft_time_limit_secs: 60, move_time_limit_secs: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSelectionWire {
    pub piece_type_id: u16,
    pub count: u32,
}

impl From<&DraftSelection> for DraftSelectionWire {
    fn from(s: &DraftSelection) -> Self {
        Self { piece_type_id: s.type_id.0, count: s.count }
    }
}

impl DraftSelectionWire {
    pub fn into_engine(self) -> DraftSelection {
        DraftSelection { type_id: PieceTypeId(self.piece_type_id), count: self.count }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceSnapshot {
    pub id: u32,
    pub type_id: u16,
    pub owner: SideWire,
    pub position: PositionWire,
    pub has_moved: bool,
    pub is_frozen: bool,
}

impl PieceSnapshot {
    pub fn from_instance(p: &PieceInstance) -> Option<Self> {
        p.position.map(|pos| Self {
            id: p.id.0,
            type_id: p.type_id.0,
            owner: p.owner.into(),
            position: pos.into(),
            has_moved: p.has_moved,
            is_frozen: p.is_frozen,
        })
    }
}

pub fn board_snapshot(board: &Board) -> Vec<PieceSnapshot> {
    board.on_board().filter_map(PieceSnapshot::from_instance).collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSnapshot {
    pub budget: i32,
    pub remaining_budget: i32,
    pub victory_points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateSnapshot {
    pub pieces: Vec<PieceSnapshot>,
    pub current_turn: SideWire,
    pub turn_number: u32,
    pub in_check: Option<SideWire>,
    pub budgets: [BudgetSnapshot; 2],
    pub result: Option<GameResultSnapshot>,
}

impl From<&engine::GameState> for GameStateSnapshot {
    fn from(state: &engine::GameState) -> Self {
        Self {
            pieces: board_snapshot(&state.board),
            current_turn: state.current_turn.into(),
            turn_number: state.turn_number,
            in_check: state.in_check.map(Into::into),
            budgets: [
                BudgetSnapshot {
                    budget: state.budgets[0].budget,
                    remaining_budget: state.budgets[0].remaining_budget,
                    victory_points: state.budgets[0].victory_points,
                },
                BudgetSnapshot {
                    budget: state.budgets[1].budget,
                    remaining_budget: state.budgets[1].remaining_budget,
                    victory_points: state.budgets[1].victory_points,
                },
            ],
            result: state.result.map(GameResultSnapshot::from),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResultSnapshot {
    pub kind: GameResultKindWire,
    pub winner: Option<SideWire>,
}

impl From<GameResult> for GameResultSnapshot {
    fn from(r: GameResult) -> Self {
        Self { kind: r.kind.into(), winner: r.winner.map(Into::into) }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameResultKindWire {
    Checkmate,
    Stalemate,
    StalemateVpWin,
    DrawVpTie,
    Resignation,
    Timeout,
    DrawAgreed,
}

impl From<GameResultKind> for GameResultKindWire {
    fn from(k: GameResultKind) -> Self {
        match k {
            GameResultKind::Checkmate => GameResultKindWire::Checkmate,
            GameResultKind::Stalemate => GameResultKindWire::Stalemate,
            GameResultKind::StalemateVpWin => GameResultKindWire::StalemateVpWin,
            GameResultKind::DrawVpTie => GameResultKindWire::DrawVpTie,
            GameResultKind::Resignation => GameResultKindWire::Resignation,
            GameResultKind::Timeout => GameResultKindWire::Timeout,
            GameResultKind::DrawAgreed => GameResultKindWire::DrawAgreed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveWire {
    pub piece_id: u32,
    pub from: PositionWire,
    pub to: PositionWire,
    pub captures: Vec<u32>,
    pub promotion: Option<u16>,
    pub kind: MoveKindWire,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveKindWire {
    Normal,
    DoublePawnPush,
    DoubleDiagonalPush,
    EnPassant,
    Castle,
    Swap,
}

impl From<MoveKind> for MoveKindWire {
    fn from(k: MoveKind) -> Self {
        match k {
            MoveKind::Normal => MoveKindWire::Normal,
            MoveKind::DoublePawnPush => MoveKindWire::DoublePawnPush,
            MoveKind::DoubleDiagonalPush => MoveKindWire::DoubleDiagonalPush,
            MoveKind::EnPassant => MoveKindWire::EnPassant,
            MoveKind::Castle => MoveKindWire::Castle,
            MoveKind::Swap => MoveKindWire::Swap,
        }
    }
}

impl From<&Move> for MoveWire {
    fn from(mv: &Move) -> Self {
        Self {
            piece_id: mv.piece.0,
            from: mv.from.into(),
            to: mv.to.into(),
            captures: mv.all_captures().map(|id| id.0).collect(),
            promotion: mv.promotion.map(|p| p.0),
            kind: mv.kind.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PawnSwapWire {
    pub pawn_id: u32,
    pub new_position: PositionWire,
}

impl From<PawnSwap> for PawnSwapWire {
    fn from(s: PawnSwap) -> Self {
        Self { pawn_id: s.pawn_id.0, new_position: s.new_position.into() }
    }
}

impl From<&PlacementOutcome> for (PositionWire, Option<PawnSwapWire>) {
    fn from(o: &PlacementOutcome) -> Self {
        (o.actual_position.into(), o.pawn_swap.map(PawnSwapWire::from))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementStateSnapshot {
    pub white_pool_remaining: usize,
    pub black_pool_remaining: usize,
    pub current_placer: SideWire,
}

impl From<&PlacementState> for PlacementStateSnapshot {
    fn from(p: &PlacementState) -> Self {
        Self {
            white_pool_remaining: p.pools[0].len(),
            black_pool_remaining: p.pools[1].len(),
            current_placer: p.current_placer.into(),
        }
    }
}

/// Non-displacement capture kinds render as plain strings for client-side
/// legend/UI purposes; `Standard` is displacement and has no distinct label.
pub fn capture_kind_label(kind: CaptureKind) -> &'static str {
    match kind {
        CaptureKind::Standard => "standard",
        CaptureKind::Withdrawal => "withdrawer",
        CaptureKind::Coordinator => "coordinator",
        CaptureKind::Boxer => "boxer",
        CaptureKind::Thief => "thief",
        CaptureKind::LongLeap => "long-leap",
        CaptureKind::Chameleon => "chameleon",
        CaptureKind::Cannon => "cannon",
        CaptureKind::None => "none",
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceTypeSnapshot {
    pub id: u16,
    pub name: &'static str,
    pub ascii: char,
    pub cost: i32,
    pub victory_points: i32,
}

pub fn catalog_snapshot(catalog: &Catalog) -> Vec<PieceTypeSnapshot> {
    catalog
        .iter()
        .map(|d| PieceTypeSnapshot { id: d.id.0, name: d.name, ascii: d.ascii, cost: d.cost, victory_points: d.victory_points })
        .collect()
}
