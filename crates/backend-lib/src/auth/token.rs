// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
/** Opaque identifier generation.
This module provides cryptographically secure random identifiers used as
single-use confirmation and reset tokens, and for per-render CSRF fields. */
use rand::{rngs::OsRng, RngCore};

/// Default token size in bytes (32 bytes = 256 bits of entropy)
const DEFAULT_TOKEN_BYTES: usize = 32;

/** Generate a cryptographically secure opaque id
This uses OS-provided entropy, so collisions across the lifetime of the
user table are negligible.
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_opaque_id() -> String {
    generate_opaque_id_with_size(DEFAULT_TOKEN_BYTES)
}

/** Generate a cryptographically secure opaque id with specified size
# Arguments
* `bytes` - The size of the random identifier in bytes
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_opaque_id_with_size(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
