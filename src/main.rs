use clap::Parser;
use llm_playground::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Models(args) => cli::models::run(args).await,
        Command::Login(args) => cli::login::run(args).await,
        Command::Register(args) => cli::register::run(args).await,
        Command::Session => cli::session::run().await,
    }
}
