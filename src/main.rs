use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use test_token_issuer::{KeyFormat, TokenIssuer, DEFAULT_KEY_PATH, DEFAULT_SUBJECT};
use tracing_subscriber::EnvFilter;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Clone, Copy, ValueEnum)]
enum KeyFormatArg {
    Pem,
    Jwk,
}

impl From<KeyFormatArg> for KeyFormat {
    fn from(arg: KeyFormatArg) -> Self {
        match arg {
            KeyFormatArg::Pem => KeyFormat::Pem,
            KeyFormatArg::Jwk => KeyFormat::Jwk,
        }
    }
}

/// Print an RS256-signed JWT for use as a test credential.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// RSA private key used to sign the token
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_KEY_PATH)]
    key: PathBuf,

    /// Encoding of the key file
    #[arg(long, value_enum, default_value_t = KeyFormatArg::Pem)]
    key_format: KeyFormatArg,

    /// Value of the `sub` claim
    #[arg(short, long, default_value = DEFAULT_SUBJECT)]
    subject: String,

    /// Days until the token expires
    #[arg(short, long, default_value_t = 36500, value_parser = clap::value_parser!(u64).range(1..))]
    days: u64,

    /// Value of the `iss` claim
    #[arg(long)]
    issuer: Option<String>,

    /// Add an `iat` claim
    #[arg(long, default_value_t = false)]
    issued_at: bool,

    /// Value of the `kid` header
    #[arg(long)]
    kid: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let validity = cli
        .days
        .checked_mul(SECONDS_PER_DAY)
        .map(Duration::from_secs)
        .context("--days is too large")?;

    let mut issuer = TokenIssuer::new(cli.subject)
        .validity(validity)
        .include_issued_at(cli.issued_at);
    if let Some(iss) = cli.issuer {
        issuer = issuer.issuer(iss);
    }
    if let Some(kid) = cli.kid {
        issuer = issuer.key_id(kid);
    }

    let token = issuer
        .issue_from_file(&cli.key, cli.key_format.into())
        .with_context(|| format!("failed to issue token with key {}", cli.key.display()))?;

    writeln!(std::io::stdout().lock(), "{token}").context("failed to write token to stdout")?;
    Ok(())
}
