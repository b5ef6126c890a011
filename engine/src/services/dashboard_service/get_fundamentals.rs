// Handler for the GetFundamentals RPC
use std::sync::Arc;
use tonic::{Response, Status};

use super::helpers::to_fundamentals_response;
use crate::data::provider::FundamentalsProvider;
use crate::error::EngineError;
use crate::services::{FundamentalsRequest, FundamentalsResponse};
use shared::utils::normalize_ticker;

pub async fn handle_get_fundamentals(
    req_payload: FundamentalsRequest,
    fundamentals_provider: Arc<dyn FundamentalsProvider>,
) -> Result<Response<FundamentalsResponse>, Status> {
    let ticker = normalize_ticker(&req_payload.ticker);
    if ticker.is_empty() {
        return Err(EngineError::InvalidRequest("Ticker must not be empty".to_string()).into());
    }

    let lookup = ticker.clone();
    let fundamentals = tokio::task::spawn_blocking(move || fundamentals_provider.fundamentals(&lookup))
        .await
        .map_err(|e| EngineError::ProcessingError(format!("Fundamentals task failed: {}", e)))??;

    if fundamentals.is_empty() {
        tracing::warn!(ticker = %ticker, "No fundamentals available");
    }
    Ok(Response::new(to_fundamentals_response(&fundamentals)))
}
