//! Subresource-integrity digests for built bundles.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha384};

/// Prefix of a SHA-384 subresource-integrity value.
pub const SRI_PREFIX: &str = "sha384-";

/// Base64 SHA-384 digest of `bytes`, the part that follows `sha384-`.
pub fn sri_sha384(bytes: &[u8]) -> String {
    let mut hasher = Sha384::new();
    hasher.update(bytes);
    STANDARD.encode(hasher.finalize())
}
