use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::token::{self, TokenContext};

#[derive(Parser, Debug)]
#[command(name = "authtoken", version, about = "Mint and verify signed bearer tokens")]
struct Cli {
    /// Path to a TOML config file naming the secret source and default lifetime
    #[arg(long, global = true, env = "AUTHTOKEN_CONFIG")]
    config: Option<PathBuf>,

    /// Shared secret (raw bytes). Overrides the config file.
    #[arg(long, global = true, env = "AUTHTOKEN_SECRET", hide_env_values = true)]
    secret: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mint a token for a login
    Mint {
        login: String,

        /// Lifetime, e.g. "30m", "24h", "7d". Defaults to the configured lifetime.
        #[arg(long)]
        expires: Option<String>,

        /// Write the token to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Verify a token's signature and show its login and expiration
    Verify {
        /// Token string or path to a file containing it
        token: String,

        /// Print the claims as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the login of a valid, unexpired token; exit 1 otherwise
    Check {
        /// Token string or path to a file containing it
        token: String,
    },

    /// Show a token's login and expiration without verifying it
    Inspect {
        /// Token string or path to a file containing it
        token: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let ctx = TokenContext::load(cli.config.as_deref(), cli.secret)?;

    let ok = match cli.cmd {
        Command::Mint {
            login,
            expires,
            output,
        } => {
            token::mint(&ctx, login, expires, output)?;
            true
        }
        Command::Verify { token, json } => token::verify(&ctx, token, json)?,
        Command::Check { token } => token::check(&ctx, token)?,
        Command::Inspect { token } => {
            token::inspect(token)?;
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
