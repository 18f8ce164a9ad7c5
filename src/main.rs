//! Cinema - session token service
//!
//! Serves the token API, or issues and inspects session tokens offline.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cinema_api::{ApiServer, ApiServerConfig};
use cinema_auth::{Claims, TokenConfig, TokenService};

/// Cinema - issue, verify and refresh signed session tokens
#[derive(Parser, Debug)]
#[command(name = "cinema")]
#[command(about = "Issue, verify and refresh signed session tokens")]
#[command(version = env!("GIT_TAG"))]
#[command(long_version = concat!(env!("GIT_TAG"), "\nCommit: ", env!("GIT_HASH"), "\nBuilt: ", env!("BUILD_TIME")))]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Token signing settings, shared by every command
#[derive(Args)]
struct TokenArgs {
    /// Secret used to sign and verify tokens
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    secret_key: String,

    /// Signing algorithm (HS256, HS384 or HS512)
    #[arg(long, env = "JWT_ALGORITHM", default_value = "HS256")]
    jwt_algorithm: String,

    /// Token lifetime in minutes
    #[arg(
        long,
        env = "JWT_EXPIRE_MINUTES",
        default_value_t = 60,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    jwt_expire_minutes: u32,
}

impl std::fmt::Debug for TokenArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenArgs")
            .field("secret_key", &"<redacted>")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("jwt_expire_minutes", &self.jwt_expire_minutes)
            .finish()
    }
}

impl TokenArgs {
    fn into_service(self) -> Result<TokenService> {
        let config = TokenConfig::from_parts(
            self.secret_key,
            &self.jwt_algorithm,
            self.jwt_expire_minutes,
        )
        .context("Invalid token configuration")?;

        debug!("Token configuration: {:?}", config);
        Ok(TokenService::new(config))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    #[command(long_about = r#"
Run the HTTP API server.

ENVIRONMENT VARIABLES:
  SECRET_KEY          Secret used to sign and verify tokens
  JWT_ALGORITHM       Signing algorithm (default: HS256)
  JWT_EXPIRE_MINUTES  Token lifetime in minutes (default: 60)
  CINEMA_BIND_ADDR    Address to listen on (default: 127.0.0.1:8000)
    "#)]
    Serve {
        #[command(flatten)]
        token: TokenArgs,

        /// Address to listen on
        #[arg(long, env = "CINEMA_BIND_ADDR", default_value = "127.0.0.1:8000")]
        bind: SocketAddr,

        /// Disable CORS headers
        #[arg(long)]
        no_cors: bool,
    },

    /// Issue a session token and print it
    #[command(long_about = r#"
Issue a session token and print it.

EXAMPLES:
  cinema issue --sub user-42
  cinema issue --sub user-42 --claim role=admin --claim seats=4
    "#)]
    Issue {
        #[command(flatten)]
        token: TokenArgs,

        /// Subject claim (`sub`)
        #[arg(long)]
        sub: String,

        /// Extra claim as key=value; values that parse as JSON keep their type
        #[arg(long = "claim", value_parser = parse_claim)]
        claims: Vec<(String, serde_json::Value)>,
    },

    /// Verify a token and print its claims
    Verify {
        #[command(flatten)]
        token: TokenArgs,

        /// Token to verify
        value: String,

        /// Check the signature only and ignore expiration
        #[arg(long)]
        relaxed: bool,
    },
}

fn parse_claim(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;

    if key.is_empty() {
        return Err("claim key must not be empty".to_string());
    }

    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

    Ok((key.to_string(), value))
}

/// Setup logging, honouring RUST_LOG when set
fn setup_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

fn issue(tokens: &TokenService, sub: String, extra: Vec<(String, serde_json::Value)>) -> Result<()> {
    let claims = extra
        .into_iter()
        .fold(Claims::new().with("sub", sub), |claims, (key, value)| {
            claims.with(key, value)
        });

    let token = tokens.issue(claims).context("Failed to issue token")?;

    println!("{}", token);
    Ok(())
}

fn verify(tokens: &TokenService, value: &str, relaxed: bool) -> Result<()> {
    let result = if relaxed {
        tokens.verify_relaxed(value)
    } else {
        tokens.verify(value)
    };

    let claims = result.map_err(|e| anyhow::anyhow!("{}: {}", e.kind().code(), e))?;

    println!("{}", serde_json::to_string_pretty(&claims)?);
    match claims.exp_formatted() {
        Some(exp) if claims.is_expired() => eprintln!("Expired at {}", exp),
        Some(exp) => eprintln!("Expires at {}", exp),
        None => eprintln!("No expiration claim"),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Serve {
            token,
            bind,
            no_cors,
        } => {
            let tokens = token.into_service()?;
            info!(
                "Tokens signed with {:?}, valid for {} minutes",
                tokens.config().algorithm(),
                tokens.config().expire_minutes()
            );

            let config = ApiServerConfig {
                bind_addr: bind,
                enable_cors: !no_cors,
            };

            ApiServer::new(config, tokens).start().await
        }
        Commands::Issue { token, sub, claims } => issue(&token.into_service()?, sub, claims),
        Commands::Verify {
            token,
            value,
            relaxed,
        } => verify(&token.into_service()?, &value, relaxed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_claim_keeps_json_types() {
        assert_eq!(parse_claim("seats=4").unwrap(), ("seats".to_string(), json!(4)));
        assert_eq!(parse_claim("vip=true").unwrap(), ("vip".to_string(), json!(true)));
        assert_eq!(
            parse_claim("role=admin").unwrap(),
            ("role".to_string(), json!("admin"))
        );
        assert_eq!(
            parse_claim("url=a=b").unwrap(),
            ("url".to_string(), json!("a=b"))
        );
    }

    #[test]
    fn test_parse_claim_rejects_malformed() {
        assert!(parse_claim("role").is_err());
        assert!(parse_claim("=admin").is_err());
    }

    #[test]
    fn test_expire_minutes_must_be_positive() {
        let result = Cli::try_parse_from([
            "cinema",
            "issue",
            "--secret-key",
            "s",
            "--jwt-expire-minutes",
            "0",
            "--sub",
            "user-42",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_output_hides_secret() {
        let cli = Cli::try_parse_from([
            "cinema",
            "verify",
            "--secret-key",
            "super-secret-value",
            "some.token.value",
        ])
        .unwrap();

        let printed = format!("{:?}", cli);
        assert!(!printed.contains("super-secret-value"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_issue_args_build_service() {
        let cli = Cli::try_parse_from([
            "cinema",
            "issue",
            "--secret-key",
            "s",
            "--jwt-algorithm",
            "HS512",
            "--sub",
            "user-42",
            "--claim",
            "role=admin",
        ])
        .unwrap();

        let Commands::Issue { token, sub, claims } = cli.command else {
            panic!("expected issue command");
        };
        assert_eq!(sub, "user-42");
        assert_eq!(claims, vec![("role".to_string(), json!("admin"))]);

        let tokens = token.into_service().unwrap();
        assert_eq!(tokens.config().algorithm(), cinema_auth::Algorithm::HS512);
    }
}
