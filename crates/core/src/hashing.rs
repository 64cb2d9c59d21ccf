//! SHA-256 digests for session tokens.
//!
//! Sessions are stored by digest only, so a leaked `user_sessions` table
//! does not leak usable cookies.

use sha2::{Digest, Sha256};

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Digest under which a session token is stored and looked up.
pub fn hash_session_token(token: &str) -> String {
    sha256_hex(token.trim().as_bytes())
}
