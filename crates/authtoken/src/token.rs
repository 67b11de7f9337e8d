//! Token encoding and verification.

use crate::claims::DecodedToken;
use crate::error::TokenError;
use crate::signature::{self, SIGNATURE_LEN};
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use base64::{Engine, alphabet};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Length of the expiration field at the start of the payload.
pub const TIMESTAMP_LEN: usize = 4;

/// Smallest decoded token: timestamp, a one-byte login and the signature.
pub const MIN_DECODED_LEN: usize = TIMESTAMP_LEN + 1 + SIGNATURE_LEN;

/// Largest decoded token accepted by [`decode`].
pub const MAX_DECODED_LEN: usize = 1024;

/// URL-safe alphabet with padding. Encoding is canonical; decoding tolerates
/// non-zero trailing bits in the last symbol, as Go's `base64.URLEncoding`
/// does. Line breaks inside a token are not accepted.
const TOKEN_ENGINE: GeneralPurpose =
    GeneralPurpose::new(&alphabet::URL_SAFE, PAD.with_decode_allow_trailing_bits(true));

/// Encode a signed token for `login` expiring at `expires_at`.
///
/// Returns an empty string when `login` is empty. The expiration is stored as
/// whole Unix seconds truncated to 32 bits, so instants past the `u32` range
/// wrap and must not be passed.
pub fn encode(login: &str, expires_at: DateTime<Utc>, secret: &[u8]) -> String {
    if login.is_empty() {
        return String::new();
    }

    let mut payload = Vec::with_capacity(TIMESTAMP_LEN + login.len() + SIGNATURE_LEN);
    payload.extend_from_slice(&(expires_at.timestamp() as u32).to_be_bytes());
    payload.extend_from_slice(login.as_bytes());

    let sig = signature::sign(&payload, secret);
    payload.extend_from_slice(&sig);

    TOKEN_ENGINE.encode(payload)
}

/// Encode a signed token for `login` that expires `ttl` from now.
///
/// # Panics
///
/// Panics if `now + ttl` overflows `DateTime<Utc>`. Validate untrusted
/// lifetimes with [`expiry_from_now`] and pass the result to [`encode`].
pub fn encode_from_now(login: &str, ttl: Duration, secret: &[u8]) -> String {
    encode(login, Utc::now() + ttl, secret)
}

/// The instant `ttl` from now, if it fits the 32-bit expiration field.
///
/// Returns `None` when the addition overflows or the result falls outside
/// `0..=u32::MAX` Unix seconds.
pub fn expiry_from_now(ttl: Duration) -> Option<DateTime<Utc>> {
    Utc::now()
        .checked_add_signed(ttl)
        .filter(|at| u32::try_from(at.timestamp()).is_ok())
}

/// Decode a token and verify its signature.
///
/// Expiration is not checked; see [`is_live`].
pub fn decode(token: &str, secret: &[u8]) -> Result<DecodedToken, TokenError> {
    let bytes = decode_bounded(token)?;
    let (data, provided) = bytes.split_at(bytes.len() - SIGNATURE_LEN);

    if !signature::verify(data, secret, provided) {
        debug!(len = bytes.len(), "rejecting token: signature mismatch");
        return Err(TokenError::WrongSignature);
    }

    extract_claims(data)
}

/// Return the login of a valid, unexpired token, or an empty string.
///
/// Malformed, forged and expired tokens all produce the same empty result.
/// A login that is not valid UTF-8 cannot be returned as a `String` and also
/// reads as empty; use [`decode`] to get the raw login bytes.
pub fn is_live(token: &str, secret: &[u8]) -> String {
    is_live_at(token, secret, Utc::now())
}

/// Same as [`is_live`] with an explicit verification instant.
pub fn is_live_at(token: &str, secret: &[u8], now: DateTime<Utc>) -> String {
    match decode(token, secret) {
        Ok(decoded) if !decoded.is_expired_at(now) => {
            String::from_utf8(decoded.login).unwrap_or_default()
        }
        _ => String::new(),
    }
}

/// Read the login and expiration of a token without checking its signature.
///
/// The result is not authenticated and must never be used to grant access.
pub fn inspect_unverified(token: &str) -> Result<DecodedToken, TokenError> {
    let bytes = decode_bounded(token)?;
    extract_claims(&bytes[..bytes.len() - SIGNATURE_LEN])
}

/// Decode the text form, enforcing the length bounds before and after.
fn decode_bounded(token: &str) -> Result<Vec<u8>, TokenError> {
    // Padded base64: every 4 characters carry at most 3 bytes.
    let estimated = token.len() / 4 * 3;
    if !(MIN_DECODED_LEN..=MAX_DECODED_LEN).contains(&estimated) {
        debug!(estimated, "rejecting token: length out of bounds");
        return Err(TokenError::Malformed);
    }

    let bytes = TOKEN_ENGINE.decode(token).map_err(|e| {
        debug!(error = %e, "rejecting token: invalid encoding");
        TokenError::Malformed
    })?;

    // Padding makes the estimate an upper bound.
    if bytes.len() < MIN_DECODED_LEN {
        debug!(len = bytes.len(), "rejecting token: too short");
        return Err(TokenError::Malformed);
    }

    Ok(bytes)
}

fn extract_claims(data: &[u8]) -> Result<DecodedToken, TokenError> {
    let (timestamp, login) = data.split_at(TIMESTAMP_LEN);

    let mut secs = [0u8; TIMESTAMP_LEN];
    secs.copy_from_slice(timestamp);
    let expires_at = DateTime::from_timestamp(i64::from(u32::from_be_bytes(secs)), 0)
        .ok_or(TokenError::Malformed)?;

    Ok(DecodedToken {
        login: login.to_vec(),
        expires_at,
    })
}
