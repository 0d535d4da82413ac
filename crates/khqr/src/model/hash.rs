//! Content hashes of a generated payload.
//!
//! Downstream transaction lookups are keyed by one of three digests of the
//! exact payload text:
//! ```text
//! md5        = MD5(payload)                 lowercase hex, 32 chars
//! full_hash  = SHA-256(payload)             lowercase hex, 64 chars
//! short_hash = full_hash[0:8]
//! ```

use sha2::{Digest, Sha256};

/// Length of the short hash in hex characters.
pub const SHORT_HASH_LEN: usize = 8;

/// Computes the MD5 digest of a payload as lowercase hex.
pub fn md5_hex(payload: &str) -> String {
    format!("{:x}", md5::compute(payload.as_bytes()))
}

/// Computes the SHA-256 digest of a payload as lowercase hex.
pub fn full_hash(payload: &str) -> String {
    to_hex(&Sha256::digest(payload.as_bytes()))
}

/// Returns the first eight hex characters of [`full_hash`].
pub fn short_hash(payload: &str) -> String {
    let mut hash = full_hash(payload);
    hash.truncate(SHORT_HASH_LEN);
    hash
}

fn to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        s.push_str(&format!("{:02x}", byte));
    }
    s
}
