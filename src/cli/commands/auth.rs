use anyhow::{Context, Result};
use clap::{Arg, Command};
use secrecy::SecretString;

pub const ARG_TOKEN_SECRET: &str = "token-secret";
pub const ARG_TOKEN_TTL: &str = "token-ttl";
pub const ARG_FRONTEND_URL: &str = "frontend-url";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_TOKEN_SECRET)
                .long("token-secret")
                .help("Secret used to sign identity tokens")
                .env("WRAPJET_TOKEN_SECRET")
                .required(true),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL)
                .long("token-ttl")
                .help("Identity token and cookie TTL in seconds")
                .env("WRAPJET_TOKEN_TTL")
                .default_value("900")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_FRONTEND_URL)
                .long("frontend-url")
                .help("Frontend base URL, used for the CORS origin and Secure cookies")
                .env("WRAPJET_FRONTEND_URL")
                .default_value("http://localhost:5173"),
        )
}

pub struct Options {
    pub token_secret: SecretString,
    pub token_ttl_seconds: i64,
    pub frontend_url: String,
}

impl Options {
    /// Collect auth options from parsed matches.
    ///
    /// # Errors
    /// Returns an error if a required argument is missing.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let token_secret = matches
            .get_one::<String>(ARG_TOKEN_SECRET)
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --token-secret")?;
        let token_ttl_seconds = matches
            .get_one::<i64>(ARG_TOKEN_TTL)
            .copied()
            .unwrap_or(900);
        let frontend_url = matches
            .get_one::<String>(ARG_FRONTEND_URL)
            .cloned()
            .unwrap_or_else(|| "http://localhost:5173".to_string());

        Ok(Self {
            token_secret,
            token_ttl_seconds,
            frontend_url,
        })
    }
}
