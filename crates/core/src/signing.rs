//! Webhook signature computation and verification.
//!
//! The round-completion webhook is authenticated with an HMAC-SHA256
//! signature over the exact byte sequence `METHOD + PATH + BODY`, using a
//! shared secret and hex encoding. Verification decodes the presented hex
//! signature and compares it in constant time via [`Mac::verify_slice`].

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the hex-encoded HMAC-SHA256 signature for a webhook request.
///
/// The signed message is `METHOD + PATH + BODY` with no separators, exactly
/// as the bytes appear on the wire.
pub fn compute_signature(secret: &str, method: &str, path: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(method.as_bytes());
    mac.update(path.as_bytes());
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a presented hex signature against the request bytes.
///
/// Returns `false` for malformed hex as well as for a mismatch, so the
/// caller can treat both the same way. The comparison itself is constant
/// time (delegated to the `hmac` crate).
pub fn verify_signature(
    secret: &str,
    method: &str,
    path: &str,
    body: &[u8],
    presented_hex: &str,
) -> bool {
    let Some(presented) = hex::decode(presented_hex) else {
        return false;
    };

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(method.as_bytes());
    mac.update(path.as_bytes());
    mac.update(body);
    mac.verify_slice(&presented).is_ok()
}

// ---------------------------------------------------------------------------
// hex codec helper (no extra dep)
// ---------------------------------------------------------------------------

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string. Returns `None` on odd length or non-hex chars.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
