use std::sync::Arc;

use clap::Parser;

use blue_beetle::app_data::AppData;
use blue_beetle::cli::{self, Cli, Commands};
use blue_beetle::config::{init_logging, IdentitySettings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let settings = IdentitySettings::from_env()?;
    tracing::debug!(?settings, "Loaded identity settings");

    if let Commands::Migrate = cli.command {
        return cli::migrate::run_migrations(&settings).await;
    }

    let app_data = Arc::new(AppData::init(settings).await?);
    cli::execute_command(cli, app_data).await
}
