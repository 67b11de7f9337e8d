//! Error types for the authtoken crate.

use thiserror::Error;

/// Errors returned when decoding a token.
///
/// Expiration is not an error at this level: a decoded token carries its
/// expiration instant and the caller decides what to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The input is not a well-formed token (bad length, bad encoding).
    #[error("malformed token")]
    Malformed,

    /// The token is well-formed but its signature does not match.
    #[error("wrong token signature")]
    WrongSignature,
}

/// Errors that can occur while loading token configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No secret source is configured or none of them produced a value.
    #[error("no token secret configured")]
    MissingSecret,

    /// The configured secret resolved to zero bytes.
    #[error("token secret is empty")]
    EmptySecret,

    /// The secret could not be decoded with the configured encoding.
    #[error("failed to decode {encoding} secret: {reason}")]
    InvalidSecret { encoding: String, reason: String },

    /// A lifetime string could not be parsed.
    #[error("invalid duration '{0}': expected <n>s, <n>m, <n>h or <n>d")]
    InvalidDuration(String),

    /// Failed to parse the configuration file.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// IO error (reading config or secret files).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
