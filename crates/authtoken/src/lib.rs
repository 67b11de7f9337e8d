//! # authtoken
//!
//! Compact, stateless bearer tokens for services that need to hand out a
//! login and check it later without a session store.
//!
//! This crate provides functionality for:
//! - Encoding a login and an expiration instant into a signed token
//! - Decoding a token and verifying its signature in constant time
//! - A liveness check that folds every failure into "not authenticated"
//! - Resolving the shared secret and default lifetime from configuration
//!
//! ## Token Layout
//!
//! The token is the URL-safe, padded base64 encoding of:
//!
//! | offset | size | field |
//! |--------|------|-------|
//! | 0 | 4 | expiration, Unix seconds, big-endian `u32` |
//! | 4 | N >= 1 | login bytes |
//! | 4 + N | 32 | signature |
//!
//! The signature is `HMAC-SHA256(HMAC-SHA256(secret, m), m)` over the first
//! `4 + N` bytes.
//!
//! The login is authenticated, not encrypted: anyone holding a token can read
//! it (see [`inspect_unverified`]). It is returned as raw bytes, since tokens
//! from other issuers may carry logins that are not UTF-8.
//!
//! Decoding accepts non-zero trailing bits in the final base64 symbol, like
//! Go's `base64.URLEncoding`. Unlike Go, line breaks inside a token are
//! rejected as malformed.
//!
//! ```
//! use chrono::Duration;
//!
//! let secret = b"server-secret";
//! let token = authtoken::encode_from_now("alice", Duration::minutes(5), secret);
//! assert_eq!(authtoken::is_live(&token, secret), "alice");
//! ```

pub mod claims;
pub mod config;
pub mod error;
pub mod signature;
pub mod token;

pub use claims::DecodedToken;
pub use config::TokenConfig;
pub use error::{ConfigError, TokenError};
pub use signature::SIGNATURE_LEN;
pub use token::{
    MAX_DECODED_LEN, MIN_DECODED_LEN, TIMESTAMP_LEN, decode, encode, encode_from_now,
    expiry_from_now, inspect_unverified, is_live, is_live_at,
};
