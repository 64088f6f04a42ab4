//! The pluggable Transport (§4.11): the dispatcher only ever calls
//! `send_to_connection`/`broadcast_to_room` and never introspects a payload.
//! Concrete transports (WebSocket, in-process channel, ...) live outside this
//! crate's concern; this module just fixes the contract and ships an
//! in-process implementation good enough for tests and the bundled binary.

use crate::messages::{Envelope, OutboundMessage};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[must_use]
pub struct ConnectionId(pub u64);

pub trait Transport: Send + Sync {
    fn send_to_connection(&self, connection: ConnectionId, msg: &Envelope<OutboundMessage>);
    fn broadcast_to_room(&self, room_code: &str, msg: &Envelope<OutboundMessage>);

    /// Room-membership bookkeeping the dispatcher needs so `broadcast_to_room`
    /// has somewhere to fan out to; not one of §4.11's two message-sending
    /// primitives, but plumbing every concrete transport needs in some form
    /// (a WebSocket server's channel subscriptions, here an explicit map).
    fn join_room(&self, _room_code: &str, _connection: ConnectionId) {}
    fn leave_room(&self, _room_code: &str, _connection: ConnectionId) {}
}

/// Routes by a directory the binary maintains of which connections currently
/// watch which room; good enough for same-process transports (tests, the
/// bundled binary's own connection registry) where a `Transport` impl can
/// just forward bytes to a socket once it knows the connection id.
#[derive(Default)]
pub struct InProcessTransport {
    room_members: Mutex<HashMap<String, Vec<ConnectionId>>>,
    sent: Mutex<Vec<(ConnectionId, OutboundMessage)>>,
}

impl InProcessTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains every message recorded since the last call — used by tests to
    /// assert what was sent without a real socket.
    pub fn drain_sent(&self) -> Vec<(ConnectionId, OutboundMessage)> {
        std::mem::take(&mut self.sent.lock().unwrap())
    }
}

impl Transport for InProcessTransport {
    fn send_to_connection(&self, connection: ConnectionId, msg: &Envelope<OutboundMessage>) {
        self.sent.lock().unwrap().push((connection, msg.body.clone()));
    }

    fn broadcast_to_room(&self, room_code: &str, msg: &Envelope<OutboundMessage>) {
        let members = self.room_members.lock().unwrap().get(room_code).cloned().unwrap_or_default();
        for connection in members {
            self.send_to_connection(connection, msg);
        }
    }

    fn join_room(&self, room_code: &str, connection: ConnectionId) {
        self.room_members.lock().unwrap().entry(room_code.to_string()).or_default().push(connection);
    }

    fn leave_room(&self, room_code: &str, connection: ConnectionId) {
        if let Some(members) = self.room_members.lock().unwrap().get_mut(room_code) {
            members.retain(|&c| c != connection);
        }
    }
}
