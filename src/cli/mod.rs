pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "minna-style-hub")]
#[command(about = "Minna Style Hub catalog API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on, overrides PORT")]
        port: Option<u16>,
    },

    #[command(about = "Create the items table in DATABASE_URL if missing")]
    Migrate,

    #[command(about = "Mint an admin token for the configured admin identity")]
    Token,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    // Missing secrets or admin credentials abort here, before anything is served
    let config = AppConfig::from_env()?;
    tracing::info!("Loaded configuration for {:?} environment", config.environment);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => commands::serve::handle(config, port).await,
        Commands::Migrate => commands::migrate::handle(config).await,
        Commands::Token => commands::token::handle(config),
    }
}
