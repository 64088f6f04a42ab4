//! Room-code generation (§4.10), injected via `Deps` rather than called from
//! a global RNG, so room-creation tests can supply a scripted sequence.

use rand::Rng;

/// Visually-unambiguous alphabet: no `0`, `1`, `I`, `L`, `O`.
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
pub const ROOM_CODE_LEN: usize = 6;

pub trait RoomCodeSource: Send + Sync {
    fn next_code(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngCodeSource;

impl RoomCodeSource for ThreadRngCodeSource {
    fn next_code(&self) -> String {
        let mut rng = rand::rng();
        (0..ROOM_CODE_LEN)
            .map(|_| {
                let idx = rng.random_range(0..ROOM_CODE_ALPHABET.len());
                ROOM_CODE_ALPHABET[idx] as char
            })
            .collect()
    }
}

#[cfg(test)]
pub struct ScriptedCodeSource(pub std::sync::Mutex<Vec<String>>);

#[cfg(test)]
impl RoomCodeSource for ScriptedCodeSource {
    fn next_code(&self) -> String {
        self.0.lock().unwrap().pop().expect("scripted code source ran out of codes")
    }
}
