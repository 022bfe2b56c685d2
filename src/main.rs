use clap::Parser;
use intercom_oauth::{Config, Server};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "intercom-oauth")]
#[command(about = "Sign in with Intercom using the OAuth 2.0 authorization-code flow")]
struct Cli {
    #[arg(short, long, help = "Path to configuration file (default: config.yaml)")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Config::load_from_file(path),
        None => Config::load(),
    };
    let config = match loaded.and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.level))
        .init();

    info!("Starting Intercom OAuth service");
    info!(
        base_url = %config.site.base_url,
        production = config.site.production,
        "Configuration loaded successfully"
    );

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to initialize server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
