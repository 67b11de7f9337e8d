//! Token signatures.
//!
//! A signature is computed in two HMAC-SHA256 passes: the secret keys a MAC
//! over the message, and that MAC is used as the key of a second MAC over the
//! same message. The signing key is therefore bound to the exact bytes being
//! signed and the raw secret is never the final signing key.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Length of a signature in bytes.
pub const SIGNATURE_LEN: usize = 32;

/// Sign `message` with `secret`.
pub fn sign(message: &[u8], secret: &[u8]) -> [u8; SIGNATURE_LEN] {
    let inner_key = hmac_sha256(secret, message);
    hmac_sha256(&inner_key, message)
}

/// Check `provided` against the signature of `message` in constant time.
///
/// A `provided` slice of the wrong length never matches.
pub fn verify(message: &[u8], secret: &[u8], provided: &[u8]) -> bool {
    let expected = sign(message, secret);
    expected[..].ct_eq(provided).into()
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; SIGNATURE_LEN] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message);
    mac.finalize().into_bytes().into()
}
