//! Gateway webhook signature verification.
//!
//! The gateway signs each delivery with `hex(HMAC-SHA256(secret, raw_body))`
//! and sends it in the `x-cashfree-signature` header. Verification must run
//! over the exact bytes received; re-serialized JSON will not match.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-cashfree-signature";

/// Verifies webhook signatures against the shared gateway secret.
#[derive(Clone)]
pub struct WebhookSignatureVerifier {
    secret: SecretString,
}

impl WebhookSignatureVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Returns true only when `signature` is the hex HMAC of `raw_body`.
    ///
    /// Empty, short, long or non-hex headers yield `false`.
    pub fn verify(&self, raw_body: &[u8], signature: &str) -> bool {
        verify_signature(raw_body, signature, self.secret.expose_secret().as_bytes())
    }
}

impl std::fmt::Debug for WebhookSignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSignatureVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Pure verification over `(raw_body, header, secret)`.
pub fn verify_signature(raw_body: &[u8], signature: &str, secret: &[u8]) -> bool {
    let Some(expected) = compute_digest(raw_body, secret) else {
        return false;
    };

    // A malformed header decodes to nothing and fails the comparison below.
    let provided = hex::decode(signature.trim()).unwrap_or_default();

    constant_time_compare(&expected, &provided)
}

/// Hex-encoded HMAC-SHA256 of `raw_body`.
pub fn sign_payload(raw_body: &[u8], secret: &[u8]) -> Option<String> {
    compute_digest(raw_body, secret).map(hex::encode)
}

fn compute_digest(raw_body: &[u8], secret: &[u8]) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(raw_body);
    Some(mac.finalize().into_bytes().to_vec())
}

/// The digest length is fixed and public, so the length check reveals nothing
/// about the secret.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
