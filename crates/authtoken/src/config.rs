//! Token configuration.
//!
//! Tells a host where to read the shared secret from and which lifetime to
//! give newly issued tokens. The secret itself is provisioned elsewhere.

use crate::error::ConfigError;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lifetime used when `default_lifetime` is not set.
pub const DEFAULT_LIFETIME_HOURS: i64 = 24;

/// How the configured secret string is turned into key bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretEncoding {
    /// Use the UTF-8 bytes of the string as-is.
    #[default]
    Raw,
    /// Hex-encoded bytes.
    Hex,
    /// Base64-encoded bytes (standard or URL-safe alphabet).
    Base64,
}

/// Configuration for token handling.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TokenConfig {
    /// Environment variable containing the secret.
    #[serde(default)]
    pub secret_env: Option<String>,

    /// Path to a file containing the secret.
    #[serde(default)]
    pub secret_file: Option<PathBuf>,

    /// Inline secret. Intended for tests and local development.
    #[serde(default)]
    pub secret: Option<String>,

    /// Encoding of the secret, whichever source it comes from.
    #[serde(default)]
    pub secret_encoding: SecretEncoding,

    /// Lifetime for newly issued tokens (e.g., "30m", "24h", "7d").
    #[serde(default)]
    pub default_lifetime: Option<String>,
}

impl TokenConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Resolve the secret bytes from environment, file, or inline value.
    pub fn resolve_secret(&self) -> Result<Vec<u8>, ConfigError> {
        let raw = self.resolve_secret_string()?.ok_or(ConfigError::MissingSecret)?;
        let secret = self.secret_encoding.decode(&raw)?;
        if secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(secret)
    }

    fn resolve_secret_string(&self) -> Result<Option<String>, ConfigError> {
        // Try environment variable first
        if let Some(env_var) = &self.secret_env {
            if let Ok(value) = std::env::var(env_var) {
                debug!(env = %env_var, "token secret loaded from environment");
                return Ok(Some(value));
            }
        }

        // Then the secret file
        if let Some(path) = &self.secret_file {
            if path.exists() {
                let value = std::fs::read_to_string(path)?;
                debug!(path = %path.display(), "token secret loaded from file");
                return Ok(Some(value.trim().to_string()));
            }
        }

        Ok(self.secret.clone())
    }

    /// Lifetime for newly issued tokens.
    pub fn default_lifetime(&self) -> Result<Duration, ConfigError> {
        match &self.default_lifetime {
            Some(s) => parse_duration(s),
            None => Ok(Duration::hours(DEFAULT_LIFETIME_HOURS)),
        }
    }
}

impl SecretEncoding {
    /// Decode a secret string into key bytes.
    pub fn decode(self, value: &str) -> Result<Vec<u8>, ConfigError> {
        match self {
            SecretEncoding::Raw => Ok(value.as_bytes().to_vec()),
            SecretEncoding::Hex => {
                hex::decode(value.trim()).map_err(|e| ConfigError::InvalidSecret {
                    encoding: "hex".to_string(),
                    reason: e.to_string(),
                })
            }
            SecretEncoding::Base64 => {
                let trimmed = value.trim();
                STANDARD
                    .decode(trimmed)
                    .or_else(|_| URL_SAFE_NO_PAD.decode(trimmed.trim_end_matches('=')))
                    .map_err(|e| ConfigError::InvalidSecret {
                        encoding: "base64".to_string(),
                        reason: e.to_string(),
                    })
            }
        }
    }
}

/// Parse a duration string like "24h", "7d", "30m" or "60s".
///
/// A bare number is taken as hours.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim().to_lowercase();
    let invalid = || ConfigError::InvalidDuration(s.clone());

    let (amount, unit): (&str, fn(i64) -> Option<Duration>) =
        if let Some(days) = s.strip_suffix('d') {
            (days, Duration::try_days)
        } else if let Some(hours) = s.strip_suffix('h') {
            (hours, Duration::try_hours)
        } else if let Some(minutes) = s.strip_suffix('m') {
            (minutes, Duration::try_minutes)
        } else if let Some(seconds) = s.strip_suffix('s') {
            (seconds, Duration::try_seconds)
        } else {
            (s.as_str(), Duration::try_hours)
        };

    let n: i64 = amount.trim().parse().map_err(|_| invalid())?;
    if n <= 0 {
        return Err(invalid());
    }
    unit(n).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("24h").unwrap(), Duration::hours(24));
        assert_eq!(parse_duration("7d").unwrap(), Duration::days(7));
        assert_eq!(parse_duration("30m").unwrap(), Duration::minutes(30));
        assert_eq!(parse_duration("60s").unwrap(), Duration::seconds(60));
        assert_eq!(parse_duration("2").unwrap(), Duration::hours(2));
        assert_eq!(parse_duration(" 5M ").unwrap(), Duration::minutes(5));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(matches!(parse_duration("soon"), Err(ConfigError::InvalidDuration(_))));
        assert!(matches!(parse_duration("h"), Err(ConfigError::InvalidDuration(_))));
        assert!(matches!(parse_duration("0h"), Err(ConfigError::InvalidDuration(_))));
        assert!(matches!(parse_duration("-1d"), Err(ConfigError::InvalidDuration(_))));
        assert!(matches!(
            parse_duration("9223372036854775807d"),
            Err(ConfigError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_default_lifetime() {
        let config = TokenConfig::default();
        assert_eq!(config.default_lifetime().unwrap(), Duration::hours(24));

        let config = TokenConfig {
            default_lifetime: Some("15m".to_string()),
            ..Default::default()
        };
        assert_eq!(config.default_lifetime().unwrap(), Duration::minutes(15));
    }

    #[test]
    fn test_from_toml() {
        let config = TokenConfig::from_toml(
            r#"
            secret_env = "MY_TOKEN_SECRET"
            secret_file = "/run/secrets/token"
            secret_encoding = "hex"
            default_lifetime = "7d"
            "#,
        )
        .unwrap();

        assert_eq!(config.secret_env.as_deref(), Some("MY_TOKEN_SECRET"));
        assert_eq!(config.secret_file, Some(PathBuf::from("/run/secrets/token")));
        assert_eq!(config.secret_encoding, SecretEncoding::Hex);
        assert_eq!(config.default_lifetime().unwrap(), Duration::days(7));
    }

    #[test]
    fn test_from_toml_rejects_unknown_encoding() {
        let err = TokenConfig::from_toml(r#"secret_encoding = "rot13""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "secret = \"inline\"").unwrap();

        let config = TokenConfig::load(file.path()).unwrap();
        assert_eq!(config.resolve_secret().unwrap(), b"inline");
    }

    #[test]
    fn test_resolve_secret_precedence() {
        let mut secret_file = NamedTempFile::new().unwrap();
        writeln!(secret_file, "from-file").unwrap();

        let mut config = TokenConfig {
            secret_env: Some("AUTHTOKEN_TEST_PRECEDENCE_SECRET".to_string()),
            secret_file: Some(secret_file.path().to_path_buf()),
            secret: Some("inline".to_string()),
            ..Default::default()
        };

        // Env var is not set, so the file wins (trimmed).
        assert_eq!(config.resolve_secret().unwrap(), b"from-file");

        // SAFETY: We're in a test and controlling the environment
        unsafe {
            std::env::set_var("AUTHTOKEN_TEST_PRECEDENCE_SECRET", "from-env");
        }
        assert_eq!(config.resolve_secret().unwrap(), b"from-env");

        config.secret_env = None;
        config.secret_file = Some(PathBuf::from("/nonexistent/authtoken/secret"));
        assert_eq!(config.resolve_secret().unwrap(), b"inline");
    }

    #[test]
    fn test_resolve_secret_missing_or_empty() {
        let config = TokenConfig::default();
        assert!(matches!(config.resolve_secret(), Err(ConfigError::MissingSecret)));

        let config = TokenConfig {
            secret: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(config.resolve_secret(), Err(ConfigError::EmptySecret)));
    }

    #[test]
    fn test_secret_encodings() {
        assert_eq!(SecretEncoding::Raw.decode("abc").unwrap(), b"abc");
        assert_eq!(SecretEncoding::Hex.decode("00ff10").unwrap(), vec![0x00, 0xff, 0x10]);
        assert_eq!(SecretEncoding::Base64.decode("c2VjcmV0").unwrap(), b"secret");
        assert_eq!(SecretEncoding::Base64.decode("-_8=").unwrap(), vec![0xfb, 0xff]);

        assert!(matches!(
            SecretEncoding::Hex.decode("abc"),
            Err(ConfigError::InvalidSecret { .. })
        ));
        assert!(matches!(
            SecretEncoding::Hex.decode("zz"),
            Err(ConfigError::InvalidSecret { .. })
        ));
        assert!(matches!(
            SecretEncoding::Base64.decode("@@@"),
            Err(ConfigError::InvalidSecret { .. })
        ));
    }
}
