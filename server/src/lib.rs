//! Authoritative session server for a point-budgeted fairy-chess variant:
//! a Room Controller state machine (waiting → drafting → placement →
//! playing → ended), a Session Dispatcher binding transport connections to
//! rooms, and the wire format connecting them to `engine`'s pure types.
//!
//! Every mutation to a room's state happens on that room's own worker
//! thread (§5); the `engine` crate itself never touches a clock, a
//! transport, or a random source — this crate is the boundary where it
//! meets all three.

pub mod clock;
pub mod config;
pub mod directory;
pub mod dispatcher;
pub mod error;
pub mod messages;
pub mod rng;
pub mod room;
pub mod transport;
pub mod wire;

pub use clock::{Clock, SystemClock};
pub use config::ServerConfig;
pub use directory::{RoomDirectory, RoomHandle};
pub use dispatcher::Dispatcher;
pub use error::{RoomError, RoomErrorCode};
pub use room::{Deps, Room, RoomEvent, RoomPhase, RoomStatus, RoomWorker, TimerEvent};
pub use transport::{ConnectionId, InProcessTransport, Transport};
