//! The Room Directory (§5 "Shared resources"): the only state touched by
//! more than one room's worker — a code→room map, protected by a single
//! mutex held just long enough to look up or insert a handle.

use crate::error::RoomError;
use crate::rng::RoomCodeSource;
use crate::room::{Room, RoomEvent, RoomPhase, RoomStatus, RoomWorker};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

const MAX_CODE_GENERATION_ATTEMPTS: u32 = 100;

/// What the directory hands back to a caller that wants to talk to a room:
/// its inbox and a join handle for the worker thread, per §5's "one OS
/// thread per room" ambient addition.
pub struct RoomHandle {
    pub code: String,
    pub inbox: crossbeam_channel::Sender<RoomEvent>,
    status: Arc<Mutex<RoomStatus>>,
    join_handle: Option<JoinHandle<()>>,
}

impl RoomHandle {
    fn spawn(room: Room) -> Self {
        let code = room.code.clone();
        let status = room.status_handle();
        let worker = RoomWorker::new(room);
        let inbox = worker.inbox.clone();
        let join_handle = std::thread::Builder::new()
            .name(format!("room-{code}"))
            .spawn(move || worker.run())
            .expect("spawning a room worker thread");
        Self { code, inbox, status, join_handle: Some(join_handle) }
    }

    pub fn status(&self) -> RoomStatus {
        *self.status.lock().unwrap()
    }
}

impl Drop for RoomHandle {
    fn drop(&mut self) {
        // Dropping `inbox` (our only sender held elsewhere is a clone kept
        // by the directory's caller, not here) lets the worker's `recv()`
        // return `Err` and the thread exit; we still join so a directory
        // shutdown doesn't race an in-flight event.
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}

#[derive(Default)]
pub struct RoomDirectory {
    rooms: Mutex<HashMap<String, Arc<RoomHandle>>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a free code via `codes`, retried up to 100 times (§4.10).
    pub fn allocate_code(&self, codes: &dyn RoomCodeSource) -> Result<String, RoomError> {
        let rooms = self.rooms.lock().unwrap();
        for _ in 0..MAX_CODE_GENERATION_ATTEMPTS {
            let candidate = codes.next_code();
            if !rooms.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
        Err(RoomError::CodeSpaceExhausted)
    }

    pub fn insert(&self, room: Room) -> Arc<RoomHandle> {
        let handle = Arc::new(RoomHandle::spawn(room));
        self.rooms.lock().unwrap().insert(handle.code.clone(), handle.clone());
        handle
    }

    pub fn get(&self, code: &str) -> Option<Arc<RoomHandle>> {
        self.rooms.lock().unwrap().get(code).cloned()
    }

    pub fn remove(&self, code: &str) -> Option<Arc<RoomHandle>> {
        self.rooms.lock().unwrap().remove(code)
    }

    pub fn codes(&self) -> Vec<String> {
        self.rooms.lock().unwrap().keys().cloned().collect()
    }

    /// Evicts every `ended` room whose worker has been idle for at least
    /// `max_idle`, per §5 "Stale rooms". Each handle's mirrored
    /// [`RoomStatus`] is read without touching the worker thread, so a
    /// stalled room's own mutex can't wedge the sweep.
    pub fn sweep_stale(&self, now_ms: i64, max_idle_ms: i64) -> Vec<String> {
        let mut rooms = self.rooms.lock().unwrap();
        let stale: Vec<String> = rooms
            .iter()
            .filter(|(_, handle)| {
                let status = handle.status();
                matches!(status.phase, RoomPhase::Ended) && now_ms.saturating_sub(status.last_activity_ms) >= max_idle_ms
            })
            .map(|(code, _)| code.clone())
            .collect();
        for code in &stale {
            rooms.remove(code);
        }
        stale
    }

    pub fn len(&self) -> usize {
        self.rooms.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::room::Deps;
    use crate::rng::ScriptedCodeSource;
    use crate::transport::InProcessTransport;
    use crate::wire::RoomSettings;
    use engine::Catalog;
    use std::sync::Mutex as StdMutex;

    #[test]
    fn allocate_code_retries_past_collisions() {
        let directory = RoomDirectory::new();
        let deps = Deps { clock: Arc::new(FixedClock::new(0)), transport: Arc::new(InProcessTransport::new()) };
        let taken = Room::new("AAAAAA".into(), RoomSettings::default(), Arc::new(Catalog::standard()), deps);
        directory.insert(taken);

        let codes = ScriptedCodeSource(StdMutex::new(vec!["BBBBBB".into(), "AAAAAA".into()]));
        let code = directory.allocate_code(&codes).unwrap();
        assert_eq!(code, "BBBBBB");
    }

    #[test]
    fn allocate_code_exhausts_after_100_collisions() {
        let directory = RoomDirectory::new();
        let deps = Deps { clock: Arc::new(FixedClock::new(0)), transport: Arc::new(InProcessTransport::new()) };
        let taken = Room::new("AAAAAA".into(), RoomSettings::default(), Arc::new(Catalog::standard()), deps);
        directory.insert(taken);

        let scripted = vec!["AAAAAA".to_string(); MAX_CODE_GENERATION_ATTEMPTS as usize];
        let codes = ScriptedCodeSource(StdMutex::new(scripted));
        let err = directory.allocate_code(&codes).unwrap_err();
        assert!(matches!(err, RoomError::CodeSpaceExhausted));
    }
}
