use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use qod_gateway::config::credentials::Credentials;
use qod_gateway::server;
use qod_gateway::telco::TelcoClient;
use qod_gateway::utils::config_loader;
use qod_gateway::utils::logging;
use qod_gateway::utils::logging::LogLevel;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "qod-gateway.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level).await?;

    // -------------------------------
    // 2. Build credentials and telco client
    // -------------------------------

    let credentials = Arc::new(Credentials::from_config(&service_config.telco));
    info!(
        "api version '{}', session flow {:?}",
        credentials.api_version, credentials.session_flow
    );
    let telco = TelcoClient::new(
        credentials,
        &service_config.settings.http,
        &service_config.settings.token_cache,
    )?;

    // -------------------------------
    // 3. Start http server
    // -------------------------------

    info!("Service starting...");
    server::server::start(&service_config.settings, Arc::new(telco)).await
}
