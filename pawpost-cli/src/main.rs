mod commands;
mod render;

use clap::Parser;
use commands::{Command, CommandError};
use pawpost_client::{
    client::{ApiClient, ApiError},
    session::Session,
    token::FileTokenStore,
};
use serde::Deserialize;
use std::{path::PathBuf, process::ExitCode, sync::Arc};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Error building api client: {0}")]
    Client(#[from] ApiError),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    api_url: Url,
    #[serde(default = "default_token_path")]
    token_path: PathBuf,
}

fn default_token_path() -> PathBuf {
    PathBuf::from(".pawpost-token")
}

/// Client for the pet social network.
#[derive(Debug, Parser)]
#[command(name = "pawpost", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pawpost_cli=info,pawpost_store=debug,pawpost_client=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn get_env() -> Result<Env, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::prefixed("PAWPOST_").from_env().map_err(InitError::from)
}

async fn run(cli: Cli) -> Result<(), RunError> {
    let env = get_env()?;
    let tokens = Arc::new(FileTokenStore::new(env.token_path));
    let client = ApiClient::new(env.api_url, tokens).map_err(InitError::from)?;
    let session = Session::restore(client).await;

    commands::dispatch(session, cli.command).await?;
    Ok(())
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    Command(#[from] CommandError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    install_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "Command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
