//! The Session Dispatcher (§4.11): binds one transport connection to at
//! most one `(room, player)` pair and is otherwise stateless. It is the only
//! thing that ever sees a raw inbound message; everything downstream of it
//! only sees typed method calls.

use crate::clock::Clock;
use crate::directory::RoomDirectory;
use crate::error::{RoomError, RoomErrorCode};
use crate::messages::{Envelope, InboundMessage, OutboundMessage, PlayerRole};
use crate::rng::RoomCodeSource;
use crate::room::{Deps, Room, RoomEvent};
use crate::transport::{ConnectionId, Transport};
use crate::wire::RoomSettings;
use engine::{Catalog, Side};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid_like::new_player_id;

/// Ad-hoc identifier generation grounded in the same "small, injectable
/// source of randomness" shape as [`crate::rng::RoomCodeSource`], kept in
/// its own tiny module rather than pulled in from an external crate the
/// rest of the stack has no other use for.
mod uuid_like {
    use rand::Rng;

    pub fn new_player_id() -> String {
        let mut rng = rand::rng();
        (0..16).map(|_| format!("{:x}", rng.random_range(0..16u8))).collect()
    }
}

/// One entry per live connection, recording at most one bound room/player.
#[derive(Default)]
struct Bindings {
    by_connection: HashMap<ConnectionId, (String, String)>, // connection -> (room_code, player_id)
}

pub struct Dispatcher {
    directory: Arc<RoomDirectory>,
    catalog: Arc<Catalog>,
    clock: Arc<dyn Clock>,
    transport: Arc<dyn Transport>,
    codes: Arc<dyn RoomCodeSource>,
    bindings: Mutex<Bindings>,
}

impl Dispatcher {
    pub fn new(
        directory: Arc<RoomDirectory>,
        catalog: Arc<Catalog>,
        clock: Arc<dyn Clock>,
        transport: Arc<dyn Transport>,
        codes: Arc<dyn RoomCodeSource>,
    ) -> Self {
        Self { directory, catalog, clock, transport, codes, bindings: Mutex::new(Bindings::default()) }
    }

    fn envelope(&self, body: OutboundMessage) -> Envelope<OutboundMessage> {
        Envelope::new(self.clock.now_ms(), body)
    }

    fn send(&self, connection: ConnectionId, body: OutboundMessage) {
        self.transport.send_to_connection(connection, &self.envelope(body));
    }

    fn send_room_error(&self, connection: ConnectionId, code: RoomErrorCode, message: String) {
        self.send(connection, OutboundMessage::RoomError { error: code.as_str(), message });
    }

    /// The single entry point a transport calls for every inbound message on
    /// a connection (§4.11: "routes every message to a single handler").
    pub fn dispatch(&self, connection: ConnectionId, message: InboundMessage) {
        match message {
            InboundMessage::Ping => {
                // PING/PONG never touches room state (§10.4).
                self.send(connection, OutboundMessage::Pong { server_time: self.clock.now_ms() });
            }
            InboundMessage::CreateRoom { player_name, settings } => {
                self.handle_create_room(connection, player_name, settings.unwrap_or_default());
            }
            InboundMessage::JoinRoom { room_code, player_name } => {
                self.handle_join_room(connection, room_code, player_name);
            }
            InboundMessage::Reconnect { room_code, player_id } => {
                self.handle_reconnect(connection, room_code, player_id);
            }
            other => self.forward_to_room(connection, other),
        }
    }

    fn handle_create_room(&self, connection: ConnectionId, player_name: String, settings: RoomSettings) {
        let code = match self.directory.allocate_code(self.codes.as_ref()) {
            Ok(code) => code,
            Err(err) => {
                log::error!(target: "server::dispatcher", "{err}");
                self.send_room_error(connection, RoomErrorCode::NotFound, err.to_string());
                return;
            }
        };
        let deps = Deps { clock: self.clock.clone(), transport: self.transport.clone() };
        let mut room = Room::new(code.clone(), settings, self.catalog.clone(), deps);
        let player_id = new_player_id();
        // The creator is always seated before the room is published, so
        // `join` can't observe `Full`.
        let side = room.join(connection, player_id.clone(), player_name).expect("a fresh room always has an open slot");
        self.directory.insert(room);
        self.transport.join_room(&code, connection);
        self.bindings.lock().unwrap().by_connection.insert(connection, (code.clone(), player_id.clone()));
        log::info!(target: "server::dispatcher", "room {code} created by {player_id}");
        self.send(
            connection,
            OutboundMessage::RoomCreated { room_code: code, player_id, role: role_of(side), settings },
        );
    }

    fn handle_join_room(&self, connection: ConnectionId, room_code: String, player_name: String) {
        let room_code = room_code.to_uppercase();
        if room_code.len() != crate::rng::ROOM_CODE_LEN {
            self.send_room_error(connection, RoomErrorCode::InvalidCode, format!("'{room_code}' is not a well-formed room code"));
            return;
        }
        let Some(handle) = self.directory.get(&room_code) else {
            self.send_room_error(connection, RoomErrorCode::NotFound, format!("no room with code {room_code}"));
            return;
        };
        let player_id = new_player_id();
        self.transport.join_room(&room_code, connection);
        self.bindings.lock().unwrap().by_connection.insert(connection, (room_code.clone(), player_id.clone()));
        let _ = handle.inbox.send(RoomEvent::Inbound {
            connection,
            player_id: Some(player_id),
            message: InboundMessage::JoinRoom { room_code, player_name },
        });
    }

    fn handle_reconnect(&self, connection: ConnectionId, room_code: String, player_id: String) {
        let room_code = room_code.to_uppercase();
        let Some(handle) = self.directory.get(&room_code) else {
            self.send_room_error(connection, RoomErrorCode::NotFound, format!("no room with code {room_code}"));
            return;
        };
        self.transport.join_room(&room_code, connection);
        self.bindings.lock().unwrap().by_connection.insert(connection, (room_code.clone(), player_id.clone()));
        let _ = handle.inbox.send(RoomEvent::Inbound {
            connection,
            player_id: Some(player_id.clone()),
            message: InboundMessage::Reconnect { room_code, player_id },
        });
    }

    fn forward_to_room(&self, connection: ConnectionId, message: InboundMessage) {
        let binding = self.bindings.lock().unwrap().by_connection.get(&connection).cloned();
        let Some((room_code, player_id)) = binding else {
            log::warn!(target: "server::dispatcher", "connection {connection:?} sent {message:?} while unbound");
            self.send_room_error(connection, RoomErrorCode::NotFound, RoomError::NotBound.to_string());
            return;
        };
        let Some(handle) = self.directory.get(&room_code) else {
            self.send_room_error(connection, RoomErrorCode::NotFound, format!("room {room_code} no longer exists"));
            return;
        };
        if matches!(message, InboundMessage::LeaveRoom) {
            self.transport.leave_room(&room_code, connection);
            self.bindings.lock().unwrap().by_connection.remove(&connection);
        }
        log::debug!(target: "server::dispatcher", "room {room_code}: {player_id} -> {message:?}");
        let _ = handle.inbox.send(RoomEvent::Inbound { connection, player_id: Some(player_id), message });
    }

    /// Called by the transport layer when a connection drops, so the bound
    /// room can start its disconnect-grace timer (§4.10).
    pub fn on_connection_closed(&self, connection: ConnectionId) {
        let binding = self.bindings.lock().unwrap().by_connection.remove(&connection);
        if let Some((room_code, _player_id)) = binding {
            if let Some(handle) = self.directory.get(&room_code) {
                let _ = handle.inbox.send(RoomEvent::Disconnected { connection });
            }
        }
    }
}

fn role_of(side: Side) -> PlayerRole {
    match side {
        Side::White => PlayerRole::White,
        Side::Black => PlayerRole::Black,
    }
}
