//! CLI module for the LLM Playground
//!
//! Each subcommand builds the playground state from configuration, drives
//! one of the stores and prints what a view would render:
//! - `models`: load the catalog, filter it and pick a model
//! - `login` / `register`: run the auth flow against the simulated backend
//! - `session`: probe for a persisted session

pub mod login;
pub mod models;
pub mod register;
pub mod session;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::PlaygroundState;

/// LLM Playground - session and model catalog state driven from the terminal
#[derive(Parser)]
#[command(name = "llm-playground")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the model catalog
    Models(models::ModelsArgs),

    /// Sign in with email and password
    Login(login::LoginArgs),

    /// Create an account and sign in
    Register(register::RegisterArgs),

    /// Show the restored session and route access
    Session,
}

/// Load `.env` and configuration, install logging and build the stores
async fn bootstrap() -> anyhow::Result<PlaygroundState> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    crate::create_playground_state_with_config(&config).await
}
