//! Claims carried by a token.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::borrow::Cow;

/// The login and expiration extracted from a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedToken {
    /// Login bytes the token was issued for. Never empty.
    ///
    /// Tokens minted by this crate always carry UTF-8, but the format allows
    /// any bytes. Serialized as text, with invalid sequences replaced.
    #[serde(serialize_with = "serialize_login")]
    pub login: Vec<u8>,

    /// When the token expires, in whole seconds.
    pub expires_at: DateTime<Utc>,
}

impl DecodedToken {
    /// The login as a string, if it is valid UTF-8.
    pub fn login_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.login).ok()
    }

    /// The login as a string, replacing invalid UTF-8 sequences.
    pub fn login_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.login)
    }

    /// Check if the token has expired relative to `now`.
    ///
    /// A token expiring exactly at `now` is still live.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Check if the token has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Get time until expiration (negative once expired).
    pub fn time_until_expiration(&self) -> chrono::Duration {
        self.expires_at - Utc::now()
    }
}

fn serialize_login<S: Serializer>(login: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(login))
}
