// ABOUTME: Rentwise binary entry point
// ABOUTME: Parses the command line, loads configuration and dispatches to the server or a job

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::error;

use rentwise_config::Config;
use rentwise_server::{run_notification_job, run_server};

#[derive(Parser)]
#[command(name = "rentwise")]
#[command(about = "Rentwise property management backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server (default)
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate lease and rent notifications once and exit
    GenerateNotifications {
        /// Day to generate for, as YYYY-MM-DD (defaults to today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            run_server(config).await
        }
        Commands::GenerateNotifications { date } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let summary = run_notification_job(&config, date).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}
