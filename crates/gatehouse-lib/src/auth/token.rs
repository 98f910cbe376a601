// ============================
// crates/gatehouse-lib/src/auth/token.rs
// ============================
//! Secure session-id generation.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};

/// Session-id size in bytes (32 bytes = 256 bits of entropy)
const SESSION_ID_BYTES: usize = 32;

/// Generate a fresh session id from OS entropy, base64url without padding.
pub fn new_session_id() -> String {
    let mut buffer = [0u8; SESSION_ID_BYTES];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
