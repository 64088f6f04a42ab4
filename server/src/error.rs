//! Session-layer errors (§7 kinds 1, 2, 4): transport, routing and lifecycle
//! failures. Rule violations never appear here — those are the data-carrying
//! `DraftRejection`/`PlacementRejection`/`MoveRejection` records from the
//! `engine` crate, reported to the offender as outbound payloads instead.

use thiserror::Error;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[must_use]
pub enum RoomErrorCode {
    NotFound,
    Full,
    AlreadyStarted,
    InvalidCode,
}

impl RoomErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            RoomErrorCode::NotFound => "NOT_FOUND",
            RoomErrorCode::Full => "FULL",
            RoomErrorCode::AlreadyStarted => "ALREADY_STARTED",
            RoomErrorCode::InvalidCode => "INVALID_CODE",
        }
    }
}

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("room {0} does not exist")]
    NotFound(String),
    #[error("room {0} already has two players")]
    Full(String),
    #[error("room {0} has already left the waiting phase")]
    AlreadyStarted(String),
    #[error("'{0}' is not a well-formed room code")]
    InvalidCode(String),
    #[error("connection is not bound to a room")]
    NotBound,
    #[error("exhausted 100 room-code generation attempts without finding a free code")]
    CodeSpaceExhausted,
    #[error("malformed inbound message: {0}")]
    MalformedMessage(String),
}

impl RoomError {
    pub fn code(&self) -> RoomErrorCode {
        match self {
            RoomError::NotFound(_) => RoomErrorCode::NotFound,
            RoomError::Full(_) => RoomErrorCode::Full,
            RoomError::AlreadyStarted(_) => RoomErrorCode::AlreadyStarted,
            RoomError::InvalidCode(_) | RoomError::MalformedMessage(_) => RoomErrorCode::InvalidCode,
            RoomError::NotBound | RoomError::CodeSpaceExhausted => RoomErrorCode::NotFound,
        }
    }
}
