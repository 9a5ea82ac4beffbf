//! trustgate - trust and access-control service
//!
//! Serves the authorizer, access request workflow and session tokens over
//! HTTP, and offers a few offline helpers for operators.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use trustgate::auth::credentials::hash_password;
use trustgate::utils::logging::init_logging;
use trustgate::{Config, Result, Trustgate};

const DEFAULT_CONFIG_PATH: &str = "config/trustgate.yaml";

/// Command line interface for trustgate
#[derive(Parser, Debug)]
#[command(name = "trustgate")]
#[command(about = "Trust and access-control layer: RBAC, access requests, session tokens")]
#[command(version)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "TRUSTGATE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print the argon2 hash of a password, for the `credentials` section
    HashPassword {
        /// Password to hash
        password: String,
    },
    /// Load and validate the configuration, then print it with secrets redacted
    CheckConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Command::Serve) {
        Command::HashPassword { password } => {
            println!("{}", hash_password(&password)?);
            Ok(())
        }
        Command::CheckConfig => {
            let config = load_config(cli.config.as_deref()).await?;
            println!("{:#?}", config);
            Ok(())
        }
        Command::Serve => {
            let config = load_config(cli.config.as_deref()).await?;
            init_logging(config.logging())?;
            Trustgate::new(config).await?.run().await
        }
    }
}

/// Explicit path, else the default file when present, else defaults plus
/// environment overrides
async fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path).await,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Config::from_file(DEFAULT_CONFIG_PATH).await
        }
        None => Config::from_env(),
    }
}
