//! Token commands.
//!
//! `authtoken mint` - Mint a token for a login.
//! `authtoken verify` - Verify a token and show its claims.
//! `authtoken check` - Print the login of a live token, nothing otherwise.
//! `authtoken inspect` - Show a token's claims without verifying it.

use anyhow::{Context, bail};
use authtoken::config::parse_duration;
use authtoken::{DecodedToken, TokenConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the CLI gets its secret and defaults from.
pub struct TokenContext {
    config: TokenConfig,
    secret_override: Option<String>,
}

impl TokenContext {
    /// Build the context from an optional config file and an optional secret.
    ///
    /// An explicit secret (from `--secret` or AUTHTOKEN_SECRET) takes
    /// precedence over any source named in the config file.
    pub fn load(config_path: Option<&Path>, secret: Option<String>) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => TokenConfig::load(path)
                .with_context(|| format!("Failed to load config from: {}", path.display()))?,
            None => TokenConfig::default(),
        };

        Ok(Self {
            config,
            secret_override: secret.filter(|s| !s.is_empty()),
        })
    }

    fn secret(&self) -> anyhow::Result<Vec<u8>> {
        if let Some(secret) = &self.secret_override {
            return Ok(secret.as_bytes().to_vec());
        }

        self.config.resolve_secret().context(
            "Token secret not available. Pass --secret, set AUTHTOKEN_SECRET, \
             or set secret_env/secret_file in the config file",
        )
    }
}

/// Resolve a token argument that is either a path to a file or the token itself.
fn resolve_token(token: String) -> anyhow::Result<String> {
    let path = Path::new(&token);
    if path.exists() {
        return Ok(fs::read_to_string(path)
            .with_context(|| format!("Failed to read token from file: {}", path.display()))?
            .trim()
            .to_string());
    }
    Ok(token)
}

/// Mint a token for `login`.
pub fn mint(
    ctx: &TokenContext,
    login: String,
    expires: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    if login.is_empty() {
        bail!("Login must not be empty");
    }

    let secret = ctx.secret()?;
    let ttl = match &expires {
        Some(e) => parse_duration(e)?,
        None => ctx.config.default_lifetime()?,
    };

    let Some(expires_at) = authtoken::expiry_from_now(ttl) else {
        bail!("Lifetime is too long: tokens cannot expire after 2106-02-07 06:28:15 UTC");
    };
    let token = authtoken::encode(&login, expires_at, &secret);
    tracing::info!(%login, %expires_at, "minted token");

    if let Some(output_path) = output {
        fs::write(&output_path, &token)?;
        println!("✔ Token written to: {}", output_path.display());
        println!("  Login: {}", login);
        println!("  Expires: {}", expires_at.format("%Y-%m-%d %H:%M:%S UTC"));
    } else {
        println!("{}", token);
    }

    Ok(())
}

/// Verify a token. Returns `false` if it is malformed or forged.
pub fn verify(ctx: &TokenContext, token: String, json: bool) -> anyhow::Result<bool> {
    let secret = ctx.secret()?;
    let token_str = resolve_token(token)?;

    match authtoken::decode(&token_str, &secret) {
        Ok(decoded) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&decoded)?);
            } else {
                println!("✔ Token signature is valid");
                println!();
                print_claims(&decoded);
                if decoded.is_expired() {
                    println!("  Status: expired");
                } else {
                    println!("  Status: live");
                }
            }
            Ok(true)
        }
        Err(e) => {
            tracing::debug!(error = %e, "verification failed");
            println!("✖ Token verification failed: {}", e);
            Ok(false)
        }
    }
}

/// Print the login of a live token. Returns `false` for any other token.
pub fn check(ctx: &TokenContext, token: String) -> anyhow::Result<bool> {
    let secret = ctx.secret()?;
    let token_str = resolve_token(token)?;

    let login = authtoken::is_live(&token_str, &secret);
    if login.is_empty() {
        return Ok(false);
    }

    println!("{}", login);
    Ok(true)
}

/// Inspect a token without verification.
pub fn inspect(token: String) -> anyhow::Result<()> {
    let token_str = resolve_token(token)?;
    let decoded = authtoken::inspect_unverified(&token_str)?;

    println!("Token Information (signature NOT verified):");
    print_claims(&decoded);

    Ok(())
}

fn print_claims(decoded: &DecodedToken) {
    println!("  Login: {}", decoded.login_lossy());
    println!(
        "  Expires: {} ({})",
        decoded.expires_at.format("%Y-%m-%d %H:%M:%S UTC"),
        decoded.expires_at.timestamp()
    );
}
