// Handler for the LoadCsvData RPC
use std::sync::Arc;
use tokio::sync::RwLock;
use tonic::{Response, Status};

use crate::data::csv_parser::PriceCsvParser;
use crate::data::market_data::MarketDataStore;
use crate::error::EngineError;
use crate::services::{LoadCsvRequest, LoadCsvResponse};
use shared::utils::normalize_ticker;

pub async fn handle_load_csv_data(
    req_payload: LoadCsvRequest,
    market_data_store: Arc<RwLock<MarketDataStore>>,
) -> Result<Response<LoadCsvResponse>, Status> {
    let ticker = normalize_ticker(&req_payload.ticker);
    if ticker.is_empty() {
        return Err(EngineError::InvalidRequest("Ticker must not be empty".to_string()).into());
    }

    let path = req_payload.file_path.clone();
    let bars = tokio::task::spawn_blocking(move || PriceCsvParser::load_bars_from_csv(&path))
        .await
        .map_err(|e| EngineError::ProcessingError(format!("CSV loading task failed: {}", e)))?
        .map_err(EngineError::from_parser)?;

    let bars_loaded = bars.len() as i32;
    market_data_store.write().await.add_bars(&ticker, bars);
    tracing::debug!(ticker = %ticker, count = bars_loaded, "Stored CSV bars");

    Ok(Response::new(LoadCsvResponse {
        success: true,
        message: format!("Loaded {} bars for ticker {}", bars_loaded, ticker),
        bars_loaded,
    }))
}
