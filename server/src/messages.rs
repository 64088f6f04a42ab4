//! The message envelope and inbound/outbound payload catalog (§6). Every
//! message carries `type` (the serde tag) and `timestamp`; the transport
//! encodes these as adjacently-tagged JSON and the core never builds JSON by
//! hand (§10.1 ambient addition).

use crate::wire::{
    DraftSelectionWire, GameStateSnapshot, MoveWire, PawnSwapWire, PlacementStateSnapshot, PositionWire, RoomSettings,
    SideWire,
};
use engine::DraftRejection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub timestamp: i64,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Envelope<T> {
    pub fn new(timestamp: i64, body: T) -> Self {
        Self { timestamp, body }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum InboundMessage {
    CreateRoom { player_name: String, settings: Option<RoomSettings> },
    JoinRoom { room_code: String, player_name: String },
    LeaveRoom,
    DraftSubmit { draft: Vec<DraftSelectionWire> },
    PlacePiece { piece_id: u32, position: PositionWire },
    MakeMove { from: PositionWire, to: PositionWire, promotion_piece_type: Option<u16> },
    OfferDraw,
    RespondDraw { accept: bool },
    Resign,
    Reconnect { room_code: String, player_id: String },
    Ping,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerRole {
    White,
    Black,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveReason {
    Left,
    Disconnected,
    Timeout,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveRejectionReason {
    InvalidMove,
    NotYourTurn,
    GameOver,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub player_id: String,
    pub player_name: String,
    pub role: PlayerRole,
    pub connected: bool,
}

/// A flattened projection of `Vec<DraftRejection>` for `DRAFT_SUBMITTED`'s
/// rejection path — named fields a client can render without reaching into
/// the engine crate's types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRejectionWire {
    pub reasons: Vec<String>,
}

impl From<&[DraftRejection]> for DraftRejectionWire {
    fn from(rejections: &[DraftRejection]) -> Self {
        Self { reasons: rejections.iter().map(|r| r.to_string()).collect() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum OutboundMessage {
    RoomCreated { room_code: String, player_id: String, role: PlayerRole, settings: RoomSettings },
    RoomJoined { room_code: String, player_id: String, role: PlayerRole, players: Vec<PlayerSummary>, phase: RoomPhaseWire },
    PlayerJoined { player: PlayerSummary },
    PlayerLeft { player_id: String, reason: LeaveReason },
    RoomError { error: &'static str, message: String },
    DraftCountdown { time_remaining: u32 },
    DraftStart { budget: i32, board_size: String, time_limit_secs: u64 },
    DraftSubmitted { player_id: String },
    DraftInvalid { rejections: DraftRejectionWire },
    DraftReveal { white_draft: Vec<DraftSelectionWire>, black_draft: Vec<DraftSelectionWire> },
    DraftTimeout { defaulted_player: Vec<String> },
    PlacementStart { placement_state: PlacementStateSnapshot },
    PiecePlaced {
        piece_id: u32,
        position: PositionWire,
        actual_position: PositionWire,
        pawn_swap: Option<PawnSwapWire>,
        next_placer: SideWire,
        placement_state: PlacementStateSnapshot,
        game_state: GameStateSnapshot,
    },
    PlacementError { message: String },
    GameStart { game_state: GameStateSnapshot },
    MoveMade { #[serde(rename = "move")] mv: MoveWire, game_state: GameStateSnapshot },
    MoveRejected { reason: MoveRejectionReason, correct_state: GameStateSnapshot },
    GameOver { result: crate::wire::GameResultSnapshot, final_state: GameStateSnapshot },
    PlayerDisconnected { player_id: String, timeout_seconds: u64 },
    PlayerReconnected { player_id: String },
    DrawOffered { offered_by: String },
    DrawDeclined { declined_by: String },
    SyncState {
        phase: RoomPhaseWire,
        settings: RoomSettings,
        players: Vec<PlayerSummary>,
        my_color: Option<SideWire>,
        game_state: Option<GameStateSnapshot>,
        placement_state: Option<PlacementStateSnapshot>,
    },
    Pong { server_time: i64 },
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomPhaseWire {
    Waiting,
    Drafting,
    Placement,
    Playing,
    Ended,
}
