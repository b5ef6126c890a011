// Engine main entry point
use engine::config::EngineSettings;
use engine::data::{CsvDataDirectory, MarketDataStore};
use engine::services::{DashboardService, MacdDashboardServer};
use std::sync::Arc;
use tokio::sync::RwLock;
use tonic::transport::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = EngineSettings::load()?;

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&settings.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting MACD Dashboard Engine...");

    let addr = settings.listen_addr().parse()?;
    info!(data_dir = %settings.data_dir.display(), "Engine will listen on {}", addr);

    let market_data_store = Arc::new(RwLock::new(MarketDataStore::new()));
    let files = Arc::new(CsvDataDirectory::new(&settings.data_dir));
    let dashboard_service = DashboardService::new(market_data_store, files.clone(), files);

    Server::builder()
        .add_service(MacdDashboardServer::new(dashboard_service))
        .serve(addr)
        .await?;

    Ok(())
}
