//! The Room Controller (§4.10): one instance per room, driven by a single
//! worker thread so all mutation to a room's state is serialized (§5
//! "Scheduling"). `Room` itself holds the state machine and emits outbound
//! messages through the injected `Transport`; [`RoomWorker`] owns the thread,
//! the inbox, and the timers that turn into [`RoomEvent::Timer`] arrivals.

use crate::clock::Clock;
use crate::error::{RoomError, RoomErrorCode};
use crate::messages::{
    DraftRejectionWire, Envelope, InboundMessage, LeaveReason, MoveRejectionReason, OutboundMessage, PlayerRole,
    PlayerSummary, RoomPhaseWire,
};
use crate::transport::{ConnectionId, Transport};
use crate::wire::{GameStateSnapshot, MoveWire, PositionWire, RoomSettings};
use engine::{
    apply_move, legal_moves_for_piece, Catalog, DraftRejection, DraftSelection, GameResultKind, GameState,
    PieceInstance, PieceInstanceId, PieceTypeId, PlacementState, PlayerDraft, Side,
};
use std::sync::Arc;
use std::time::Duration;

pub const COUNTDOWN_SECS: u32 = 3;
pub const REVEAL_SECS: u32 = 3;
pub const DISCONNECT_GRACE_SECS: u64 = 60;

/// The fallback army dealt to a side whose draft timer expires (§4.10).
pub fn fallback_draft(catalog: &Catalog) -> PlayerDraft {
    let mut draft = PlayerDraft::default();
    for (name, count) in [("Queen", 1), ("Rook", 2), ("Bishop", 2), ("Knight", 2), ("Pawn", 8)] {
        if let Some(def) = catalog.by_name(name) {
            draft.add(def.id, count);
        }
    }
    draft
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[must_use]
pub enum RoomPhase {
    Waiting,
    Drafting,
    Placement,
    Playing,
    Ended,
}

impl From<RoomPhase> for RoomPhaseWire {
    fn from(p: RoomPhase) -> Self {
        match p {
            RoomPhase::Waiting => RoomPhaseWire::Waiting,
            RoomPhase::Drafting => RoomPhaseWire::Drafting,
            RoomPhase::Placement => RoomPhaseWire::Placement,
            RoomPhase::Playing => RoomPhaseWire::Playing,
            RoomPhase::Ended => RoomPhaseWire::Ended,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerSlot {
    pub player_id: String,
    pub player_name: String,
    pub connection: Option<ConnectionId>,
    pub connected: bool,
}

/// Timer-driven events the worker schedules; these carry no payload beyond
/// identifying which timer fired, per §5's "cancellation & timeouts".
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TimerEvent {
    CountdownTick,
    DraftDeadline,
    RevealElapsed,
    DisconnectGrace { side: Side },
}

#[derive(Debug, Clone)]
pub enum RoomEvent {
    Inbound { connection: ConnectionId, player_id: Option<String>, message: InboundMessage },
    Disconnected { connection: ConnectionId },
    Timer(TimerEvent),
}

pub struct Deps {
    pub clock: Arc<dyn Clock>,
    pub transport: Arc<dyn Transport>,
}

/// The slice of room state the stale-room sweeper (§5) needs, mirrored out
/// of the worker thread so the sweeper can read it without a message
/// round-trip through a busy or stalled room.
#[derive(Debug, Clone, Copy)]
pub struct RoomStatus {
    pub phase: RoomPhase,
    pub last_activity_ms: i64,
}

/// The per-room state machine. Pure with respect to everything except the
/// injected `Deps` (§9 "a Deps record for clock/rng/transport").
pub struct Room {
    pub code: String,
    pub settings: RoomSettings,
    catalog: Arc<Catalog>,
    pub phase: RoomPhase,
    players: [Option<PlayerSlot>; 2],
    drafts: [PlayerDraft; 2],
    draft_submitted: [bool; 2],
    /// Set the first time `reveal_drafts` runs, so a stale `DraftDeadline`
    /// timer that fires after an early reveal (both sides submitted before
    /// the deadline) can recognize it has nothing left to do (spec.md:191,
    /// "on early completion the timer is cancelled" — there's no real
    /// cancellation here, just this latch).
    reveal_triggered: bool,
    placement: Option<PlacementState>,
    game: Option<GameState>,
    draw_offer: Option<Side>,
    pub last_activity_ms: i64,
    status: Arc<std::sync::Mutex<RoomStatus>>,
    deps: Deps,
    next_piece_id: u32,
    countdown_remaining: u32,
    /// This room's own inbox, so a timer-scheduling helper can post
    /// [`TimerEvent`]s back to itself without the worker thread's direct
    /// involvement. `None` in unit tests that drive `on_*` handlers
    /// directly instead of through real timers.
    self_inbox: Option<crossbeam_channel::Sender<RoomEvent>>,
}

impl Room {
    pub fn new(code: String, settings: RoomSettings, catalog: Arc<Catalog>, deps: Deps) -> Self {
        let now = deps.clock.now_ms();
        Self {
            code,
            settings,
            catalog,
            phase: RoomPhase::Waiting,
            players: [None, None],
            drafts: [PlayerDraft::default(), PlayerDraft::default()],
            draft_submitted: [false, false],
            reveal_triggered: false,
            placement: None,
            game: None,
            draw_offer: None,
            last_activity_ms: now,
            status: Arc::new(std::sync::Mutex::new(RoomStatus { phase: RoomPhase::Waiting, last_activity_ms: now })),
            deps,
            next_piece_id: 0,
            countdown_remaining: 0,
            self_inbox: None,
        }
    }

    pub fn status_handle(&self) -> Arc<std::sync::Mutex<RoomStatus>> {
        self.status.clone()
    }

    /// Wires this room up to schedule its own timers (§5 "cancellation &
    /// timeouts"); called once by [`RoomWorker::new`] before the worker
    /// thread starts.
    pub fn attach_inbox(&mut self, inbox: crossbeam_channel::Sender<RoomEvent>) {
        self.self_inbox = Some(inbox);
    }

    /// Fires `event` back into this room's own inbox after `delay`, on a
    /// throwaway thread. A no-op when no inbox is attached (unit tests
    /// drive `on_*` handlers directly and never see these fire).
    fn schedule(&self, delay: Duration, event: TimerEvent) {
        if let Some(inbox) = self.self_inbox.clone() {
            std::thread::spawn(move || {
                std::thread::sleep(delay);
                let _ = inbox.send(RoomEvent::Timer(event));
            });
        }
    }

    fn touch(&mut self) {
        self.last_activity_ms = self.deps.clock.now_ms();
        self.sync_status();
    }

    fn set_phase(&mut self, phase: RoomPhase) {
        self.phase = phase;
        self.sync_status();
    }

    fn sync_status(&self) {
        *self.status.lock().unwrap() = RoomStatus { phase: self.phase, last_activity_ms: self.last_activity_ms };
    }

    fn envelope(&self, body: OutboundMessage) -> Envelope<OutboundMessage> {
        Envelope::new(self.deps.clock.now_ms(), body)
    }

    fn broadcast(&self, body: OutboundMessage) {
        self.deps.transport.broadcast_to_room(&self.code, &self.envelope(body));
    }

    fn send_to(&self, connection: ConnectionId, body: OutboundMessage) {
        self.deps.transport.send_to_connection(connection, &self.envelope(body));
    }

    fn slot_for(&self, side: Side) -> &Option<PlayerSlot> {
        &self.players[side.idx()]
    }

    fn player_summary(&self, side: Side) -> Option<PlayerSummary> {
        self.slot_for(side).as_ref().map(|p| PlayerSummary {
            player_id: p.player_id.clone(),
            player_name: p.player_name.clone(),
            role: role_of(side),
            connected: p.connected,
        })
    }

    fn players_summary(&self) -> Vec<PlayerSummary> {
        [Side::White, Side::Black].into_iter().filter_map(|s| self.player_summary(s)).collect()
    }

    fn side_of_player(&self, player_id: &str) -> Option<Side> {
        [Side::White, Side::Black]
            .into_iter()
            .find(|&s| self.slot_for(s).as_ref().is_some_and(|p| p.player_id == player_id))
    }

    fn game_snapshot(&self) -> Option<GameStateSnapshot> {
        self.game.as_ref().map(GameStateSnapshot::from)
    }

    /// `CREATE_ROOM`/`JOIN_ROOM`'s common path for the second player.
    pub fn join(&mut self, connection: ConnectionId, player_id: String, player_name: String) -> Result<Side, RoomError> {
        if !matches!(self.phase, RoomPhase::Waiting) {
            return Err(RoomError::AlreadyStarted(self.code.clone()));
        }
        let empty_slot =
            [Side::White, Side::Black].into_iter().find(|&s| self.slot_for(s).is_none()).ok_or_else(|| RoomError::Full(self.code.clone()))?;
        self.players[empty_slot.idx()] =
            Some(PlayerSlot { player_id, player_name, connection: Some(connection), connected: true });
        self.touch();

        if self.players[0].is_some() && self.players[1].is_some() {
            self.begin_countdown();
        }
        Ok(empty_slot)
    }

    fn begin_countdown(&mut self) {
        self.countdown_remaining = COUNTDOWN_SECS;
        self.broadcast(OutboundMessage::DraftCountdown { time_remaining: COUNTDOWN_SECS });
        self.schedule(Duration::from_secs(1), TimerEvent::CountdownTick);
    }

    /// Called by the worker once per second while counting down; transitions
    /// to drafting once the counter reaches zero, otherwise reschedules
    /// itself for the next tick.
    pub fn on_countdown_tick(&mut self) {
        if !matches!(self.phase, RoomPhase::Waiting) {
            return;
        }
        self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
        if self.countdown_remaining == 0 {
            self.start_drafting();
        } else {
            self.broadcast(OutboundMessage::DraftCountdown { time_remaining: self.countdown_remaining });
            self.schedule(Duration::from_secs(1), TimerEvent::CountdownTick);
        }
    }

    fn start_drafting(&mut self) {
        self.set_phase(RoomPhase::Drafting);
        self.broadcast(OutboundMessage::DraftStart {
            budget: self.settings.budget,
            board_size: self.settings.board_size.to_string(),
            time_limit_secs: self.settings.draft_time_limit_secs,
        });
        self.schedule(Duration::from_secs(self.settings.draft_time_limit_secs), TimerEvent::DraftDeadline);
    }

    pub fn on_draft_submit(&mut self, player_id: &str, draft: Vec<DraftSelection>) {
        if !matches!(self.phase, RoomPhase::Drafting) {
            return;
        }
        let Some(side) = self.side_of_player(player_id) else { return };
        if self.draft_submitted[side.idx()] {
            return; // "further submissions rejected" (§4.10)
        }
        let mut submission = PlayerDraft::default();
        for sel in draft {
            submission.add(sel.type_id, sel.count);
        }
        let rejections = engine::draft::validate(&self.catalog, self.settings.board_size, self.settings.budget, &submission);
        if !rejections.is_empty() {
            self.send_rejection_to(side, &rejections);
            return;
        }
        self.drafts[side.idx()] = submission;
        self.draft_submitted[side.idx()] = true;
        self.broadcast(OutboundMessage::DraftSubmitted { player_id: player_id.to_string() });
        self.touch();

        if self.draft_submitted[0] && self.draft_submitted[1] {
            self.reveal_drafts();
        }
    }

    fn send_rejection_to(&self, side: Side, rejections: &[DraftRejection]) {
        if let Some(connection) = self.slot_for(side).as_ref().and_then(|p| p.connection) {
            self.send_to(connection, OutboundMessage::DraftInvalid { rejections: DraftRejectionWire::from(rejections) });
        }
    }

    pub fn on_draft_deadline(&mut self) {
        if !matches!(self.phase, RoomPhase::Drafting) || self.reveal_triggered {
            return;
        }
        let mut defaulted = Vec::new();
        for side in [Side::White, Side::Black] {
            if !self.draft_submitted[side.idx()] {
                self.drafts[side.idx()] = fallback_draft(&self.catalog);
                self.draft_submitted[side.idx()] = true;
                if let Some(slot) = self.slot_for(side) {
                    defaulted.push(slot.player_id.clone());
                }
            }
        }
        if !defaulted.is_empty() {
            self.broadcast(OutboundMessage::DraftTimeout { defaulted_player: defaulted });
        }
        self.reveal_drafts();
    }

    fn reveal_drafts(&mut self) {
        self.reveal_triggered = true;
        self.broadcast(OutboundMessage::DraftReveal {
            white_draft: self.drafts[0].selections.iter().map(Into::into).collect(),
            black_draft: self.drafts[1].selections.iter().map(Into::into).collect(),
        });
        self.schedule(Duration::from_secs(REVEAL_SECS as u64), TimerEvent::RevealElapsed);
    }

    /// Called by the worker after the reveal delay elapses.
    pub fn on_reveal_elapsed(&mut self) {
        if !matches!(self.phase, RoomPhase::Drafting) {
            return;
        }
        self.start_placement();
    }

    fn start_placement(&mut self) {
        self.set_phase(RoomPhase::Placement);
        let mut pools = [Vec::new(), Vec::new()];
        for side in [Side::White, Side::Black] {
            let mut pool = Vec::new();
            for sel in &self.drafts[side.idx()].selections {
                for _ in 0..sel.count {
                    pool.push(PieceInstance {
                        id: self.fresh_piece_id(),
                        type_id: sel.type_id,
                        owner: side,
                        position: None,
                        has_moved: false,
                        is_frozen: false,
                    });
                }
            }
            // the mandatory King never appears in `selections`.
            if !self.drafts[side.idx()].selections.iter().any(|s| self.catalog.get(s.type_id).replaces_king) {
                pool.push(PieceInstance {
                    id: self.fresh_piece_id(),
                    type_id: self.catalog.king_id(),
                    owner: side,
                    position: None,
                    has_moved: false,
                    is_frozen: false,
                });
            }
            pools[side.idx()] = pool;
        }
        let [white_pool, black_pool] = pools;
        self.placement = Some(PlacementState::new(white_pool, black_pool));
        self.game = Some(GameState::new(self.settings.board_size, self.settings.budget, self.catalog.clone()));
        self.broadcast(OutboundMessage::PlacementStart {
            placement_state: crate::wire::PlacementStateSnapshot::from(self.placement.as_ref().unwrap()),
        });
    }

    fn fresh_piece_id(&mut self) -> PieceInstanceId {
        let id = PieceInstanceId(self.next_piece_id);
        self.next_piece_id += 1;
        id
    }

    pub fn on_place_piece(&mut self, player_id: &str, piece_id: u32, position: PositionWire) {
        if !matches!(self.phase, RoomPhase::Placement) {
            return;
        }
        let Some(side) = self.side_of_player(player_id) else { return };
        let (Some(placement), Some(game)) = (self.placement.as_mut(), self.game.as_mut()) else { return };
        if side != placement.current_placer {
            return; // "only the currentPlacer may place" (§4.10)
        }
        match placement.place(&mut game.board, &self.catalog, side, PieceInstanceId(piece_id), position.into()) {
            Ok(outcome) => {
                self.touch();
                let placement_complete = self.placement.as_ref().unwrap().is_complete();
                if placement_complete {
                    PlacementState::finalize_had_multiple_royals(&mut self.game.as_mut().unwrap().board, &self.catalog);
                }
                let next_placer = self.placement.as_ref().unwrap().current_placer;
                let placement_snapshot = crate::wire::PlacementStateSnapshot::from(self.placement.as_ref().unwrap());
                let game_snapshot = self.game_snapshot().unwrap();
                self.broadcast(OutboundMessage::PiecePlaced {
                    piece_id,
                    position,
                    actual_position: outcome.actual_position.into(),
                    pawn_swap: outcome.pawn_swap.map(Into::into),
                    next_placer: next_placer.into(),
                    placement_state: placement_snapshot,
                    game_state: game_snapshot,
                });
                if placement_complete {
                    self.start_playing();
                }
            }
            Err(rejection) => {
                if let Some(connection) = self.slot_for(side).as_ref().and_then(|p| p.connection) {
                    self.send_to(connection, OutboundMessage::PlacementError { message: rejection.to_string() });
                }
            }
        }
    }

    fn start_playing(&mut self) {
        self.set_phase(RoomPhase::Playing);
        self.broadcast(OutboundMessage::GameStart { game_state: self.game_snapshot().unwrap() });
    }

    pub fn on_make_move(&mut self, player_id: &str, from: PositionWire, to: PositionWire, promotion: Option<u16>) {
        if !matches!(self.phase, RoomPhase::Playing) {
            return;
        }
        let Some(side) = self.side_of_player(player_id) else { return };
        let Some(game) = self.game.as_ref() else { return };
        if game.result.is_some() {
            self.reject_move(side, MoveRejectionReason::GameOver);
            return;
        }
        if side != game.current_turn {
            self.reject_move(side, MoveRejectionReason::NotYourTurn);
            return;
        }
        let Some(from_pos) = game.board.occupant_id(from.into()) else {
            self.reject_move(side, MoveRejectionReason::InvalidMove);
            return;
        };
        let legal = legal_moves_for_piece(game, from_pos);
        let chosen = legal.iter().find(|m| {
            m.to == to.into() && (promotion.is_none() || m.promotion == promotion.map(PieceTypeId))
        });
        let Some(mv) = chosen else {
            self.reject_move(side, MoveRejectionReason::InvalidMove);
            return;
        };
        let mv = mv.clone();
        let next = apply_move(game, &mv);
        let result = next.result;
        self.game = Some(next);
        self.draw_offer = None;
        self.touch();
        self.broadcast(OutboundMessage::MoveMade { mv: MoveWire::from(&mv), game_state: self.game_snapshot().unwrap() });
        if let Some(result) = result {
            self.end_game(result.kind, result.winner);
        }
    }

    fn reject_move(&self, side: Side, reason: MoveRejectionReason) {
        if let Some(connection) = self.slot_for(side).as_ref().and_then(|p| p.connection) {
            self.send_to(connection, OutboundMessage::MoveRejected { reason, correct_state: self.game_snapshot().unwrap() });
        }
    }

    pub fn on_resign(&mut self, player_id: &str) {
        if !matches!(self.phase, RoomPhase::Playing) {
            return;
        }
        let Some(side) = self.side_of_player(player_id) else { return };
        self.end_game(GameResultKind::Resignation, Some(!side));
    }

    pub fn on_offer_draw(&mut self, player_id: &str) {
        if !matches!(self.phase, RoomPhase::Playing) {
            return;
        }
        let Some(side) = self.side_of_player(player_id) else { return };
        if self.draw_offer.is_some() {
            return; // "a second offer while one is pending ... is rejected" (§10.4)
        }
        self.draw_offer = Some(side);
        self.broadcast(OutboundMessage::DrawOffered { offered_by: player_id.to_string() });
    }

    pub fn on_respond_draw(&mut self, player_id: &str, accept: bool) {
        let Some(offering_side) = self.draw_offer else { return };
        let Some(responder_side) = self.side_of_player(player_id) else { return };
        if responder_side == offering_side {
            return;
        }
        self.draw_offer = None;
        if accept {
            self.end_game(GameResultKind::DrawAgreed, None);
        } else {
            self.broadcast(OutboundMessage::DrawDeclined { declined_by: player_id.to_string() });
        }
    }

    fn end_game(&mut self, kind: GameResultKind, winner: Option<Side>) {
        self.set_phase(RoomPhase::Ended);
        let result = engine::GameResult { kind, winner };
        if let Some(game) = self.game.as_mut() {
            game.result = Some(result);
        }
        self.touch();
        self.broadcast(OutboundMessage::GameOver {
            result: crate::wire::GameResultSnapshot::from(result),
            final_state: self.game_snapshot().unwrap_or_else(|| unreachable!("ended game always has a game state")),
        });
    }

    pub fn on_leave(&mut self, player_id: &str) {
        let Some(side) = self.side_of_player(player_id) else { return };
        self.players[side.idx()] = None;
        self.broadcast(OutboundMessage::PlayerLeft { player_id: player_id.to_string(), reason: LeaveReason::Left });
        if matches!(self.phase, RoomPhase::Playing) {
            self.end_game(GameResultKind::Resignation, Some(!side));
        }
    }

    pub fn on_disconnected(&mut self, connection: ConnectionId) -> Option<Side> {
        let side =
            [Side::White, Side::Black].into_iter().find(|&s| self.slot_for(s).as_ref().is_some_and(|p| p.connection == Some(connection)))?;
        if let Some(slot) = self.players[side.idx()].as_mut() {
            slot.connected = false;
            slot.connection = None;
        }
        if matches!(self.phase, RoomPhase::Playing) {
            let player_id = self.slot_for(side).as_ref().unwrap().player_id.clone();
            self.broadcast(OutboundMessage::PlayerDisconnected { player_id, timeout_seconds: DISCONNECT_GRACE_SECS });
            self.schedule(Duration::from_secs(DISCONNECT_GRACE_SECS), TimerEvent::DisconnectGrace { side });
        }
        Some(side)
    }

    pub fn on_disconnect_grace_expired(&mut self, side: Side) {
        if self.slot_for(side).as_ref().is_some_and(|p| !p.connected) && matches!(self.phase, RoomPhase::Playing) {
            self.end_game(GameResultKind::Timeout, Some(!side));
        }
    }

    pub fn on_reconnect(&mut self, connection: ConnectionId, player_id: &str) -> Result<Side, RoomError> {
        let side = self.side_of_player(player_id).ok_or_else(|| RoomError::NotFound(self.code.clone()))?;
        if let Some(slot) = self.players[side.idx()].as_mut() {
            slot.connected = true;
            slot.connection = Some(connection);
        }
        self.broadcast(OutboundMessage::PlayerReconnected { player_id: player_id.to_string() });
        self.send_to(connection, self.sync_state_for(side));
        Ok(side)
    }

    fn sync_state_for(&self, side: Side) -> OutboundMessage {
        OutboundMessage::SyncState {
            phase: self.phase.into(),
            settings: self.settings,
            players: self.players_summary(),
            my_color: Some(side.into()),
            game_state: self.game_snapshot(),
            placement_state: self.placement.as_ref().map(crate::wire::PlacementStateSnapshot::from),
        }
    }
}

fn role_of(side: Side) -> PlayerRole {
    match side {
        Side::White => PlayerRole::White,
        Side::Black => PlayerRole::Black,
    }
}

/// Drives one room's event loop on a dedicated thread (§5 "one logical
/// worker per room"). Timer firings are pushed back onto the room's own
/// inbox by short-lived sleeper threads spawned via [`Room::schedule`], so
/// neither the room nor its worker ever touches tokio.
pub struct RoomWorker {
    pub inbox: crossbeam_channel::Sender<RoomEvent>,
    receiver: crossbeam_channel::Receiver<RoomEvent>,
    room: Room,
}

impl RoomWorker {
    pub fn new(mut room: Room) -> Self {
        let (inbox, receiver) = crossbeam_channel::unbounded();
        room.attach_inbox(inbox.clone());
        Self { inbox, receiver, room }
    }

    /// Runs until the channel's senders are all dropped. Panics inside a
    /// single inbound-message handler are caught so a bug in one room never
    /// takes down its neighbors (§10.2) — only that room's own worker thread
    /// dies, logged as an internal invariant violation.
    pub fn run(self) {
        // Drop our own sender clone first: otherwise this thread would hold
        // the channel open forever and `recv()` below would never see
        // disconnection once every externally-held sender is gone.
        let RoomWorker { inbox, receiver, mut room } = self;
        drop(inbox);
        while let Ok(event) = receiver.recv() {
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| dispatch(&mut room, event)));
            if outcome.is_err() {
                log::error!(target: "server::room", "room {} worker panicked handling an event; tearing down", room.code);
                room.set_phase(RoomPhase::Ended);
                break;
            }
        }
    }
}

fn dispatch(room: &mut Room, event: RoomEvent) {
    match event {
        RoomEvent::Inbound { connection, player_id, message } => handle_inbound(room, connection, player_id, message),
        RoomEvent::Disconnected { connection } => {
            room.on_disconnected(connection);
        }
        RoomEvent::Timer(timer) => match timer {
            TimerEvent::CountdownTick => room.on_countdown_tick(),
            TimerEvent::DraftDeadline => room.on_draft_deadline(),
            TimerEvent::RevealElapsed => room.on_reveal_elapsed(),
            TimerEvent::DisconnectGrace { side } => room.on_disconnect_grace_expired(side),
        },
    }
}

fn handle_inbound(room: &mut Room, connection: ConnectionId, player_id: Option<String>, message: InboundMessage) {
    let Some(player_id) = player_id else { return };
    match message {
        InboundMessage::JoinRoom { player_name, .. } => handle_join(room, connection, player_id, player_name),
        InboundMessage::Reconnect { .. } => {
            if let Err(err) = room.on_reconnect(connection, &player_id) {
                room.send_to(connection, OutboundMessage::RoomError { error: err.code().as_str(), message: err.to_string() });
            }
        }
        InboundMessage::DraftSubmit { draft } => room.on_draft_submit(&player_id, draft.into_iter().map(|d| d.into_engine()).collect()),
        InboundMessage::PlacePiece { piece_id, position } => room.on_place_piece(&player_id, piece_id, position),
        InboundMessage::MakeMove { from, to, promotion_piece_type } => room.on_make_move(&player_id, from, to, promotion_piece_type),
        InboundMessage::OfferDraw => room.on_offer_draw(&player_id),
        InboundMessage::RespondDraw { accept } => room.on_respond_draw(&player_id, accept),
        InboundMessage::Resign => room.on_resign(&player_id),
        InboundMessage::LeaveRoom => room.on_leave(&player_id),
        // CreateRoom and Ping never reach a room's inbox: the dispatcher
        // seats the creator itself, and PING/PONG never touches room state.
        InboundMessage::CreateRoom { .. } | InboundMessage::Ping => {}
    }
}

fn handle_join(room: &mut Room, connection: ConnectionId, player_id: String, player_name: String) {
    match room.join(connection, player_id.clone(), player_name) {
        Ok(side) => {
            room.send_to(
                connection,
                OutboundMessage::RoomJoined {
                    room_code: room.code.clone(),
                    player_id: player_id.clone(),
                    role: role_of(side),
                    players: room.players_summary(),
                    phase: room.phase.into(),
                },
            );
            if let Some(summary) = room.player_summary(side) {
                room.broadcast(OutboundMessage::PlayerJoined { player: summary });
            }
        }
        Err(err) => {
            room.send_to(connection, OutboundMessage::RoomError { error: err.code().as_str(), message: err.to_string() });
        }
    }
}

pub const STALE_ROOM_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const STALE_ROOM_MAX_IDLE: Duration = Duration::from_secs(60 * 60);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::transport::InProcessTransport;
    use engine::Catalog;
    use std::sync::Arc;

    fn test_room(code: &str) -> (Room, Arc<InProcessTransport>, FixedClock) {
        let transport = Arc::new(InProcessTransport::new());
        let clock = FixedClock::new(0);
        let deps = Deps { clock: Arc::new(clock.clone()), transport: transport.clone() };
        let room = Room::new(code.to_string(), RoomSettings::default(), Arc::new(Catalog::standard()), deps);
        (room, transport, clock)
    }

    #[test]
    fn second_join_triggers_countdown() {
        let (mut room, transport, _clock) = test_room("ABCDEF");
        transport.join_room("ABCDEF", ConnectionId(1));
        transport.join_room("ABCDEF", ConnectionId(2));
        room.join(ConnectionId(1), "p1".into(), "Alice".into()).unwrap();
        room.join(ConnectionId(2), "p2".into(), "Bob".into()).unwrap();
        let sent = transport.drain_sent();
        assert!(sent.iter().any(|(_, m)| matches!(m, OutboundMessage::DraftCountdown { time_remaining: COUNTDOWN_SECS })));
    }

    #[test]
    fn third_join_is_rejected_as_full() {
        let (mut room, transport, _clock) = test_room("ABCDEF");
        transport.join_room("ABCDEF", ConnectionId(1));
        transport.join_room("ABCDEF", ConnectionId(2));
        transport.join_room("ABCDEF", ConnectionId(3));
        room.join(ConnectionId(1), "p1".into(), "Alice".into()).unwrap();
        room.join(ConnectionId(2), "p2".into(), "Bob".into()).unwrap();
        let err = room.join(ConnectionId(3), "p3".into(), "Eve".into()).unwrap_err();
        assert_eq!(err.code(), RoomErrorCode::Full);
    }

    #[test]
    fn draft_timeout_defaults_missing_side_to_fallback_army() {
        let (mut room, _transport, _clock) = test_room("ABCDEF");
        room.players[0] = Some(PlayerSlot { player_id: "p1".into(), player_name: "Alice".into(), connection: None, connected: true });
        room.players[1] = Some(PlayerSlot { player_id: "p2".into(), player_name: "Bob".into(), connection: None, connected: true });
        room.start_drafting();
        room.on_draft_submit("p1", vec![DraftSelection { type_id: room.catalog.by_name("Queen").unwrap().id, count: 1 }]);
        room.on_draft_deadline();
        assert!(room.draft_submitted[1]);
        let pawn_id = room.catalog.by_name("Pawn").unwrap().id;
        assert_eq!(room.drafts[1].selections.iter().find(|s| s.type_id == pawn_id).map(|s| s.count), Some(8));
    }
}
