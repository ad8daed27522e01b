//! Access token generation

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;

/// Generate a new opaque bearer token
///
/// 32 random bytes, URL-safe base64 encoded. The raw value is returned
/// to the client exactly once; only its hash is persisted.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
