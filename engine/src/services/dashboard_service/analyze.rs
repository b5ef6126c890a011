// Handler for the Analyze RPC
use std::sync::Arc;
use tokio::sync::RwLock;
use tonic::{Response, Status};

use super::fetch_price_series;
use super::helpers::{params_from_request, parse_date_range, to_proto_enriched_bar, to_proto_policy};
use crate::analysis::{self, AnalysisOutcome};
use crate::data::market_data::MarketDataStore;
use crate::data::provider::PriceSeriesProvider;
use crate::error::EngineError;
use crate::services::{AnalysisStatus, AnalyzeRequest, AnalyzeResponse};
use shared::models::EnrichedSeries;
use shared::utils::normalize_ticker;

pub const NO_DATA_MESSAGE: &str = "No data available for the given ticker.";

pub async fn handle_analyze(
    req_payload: AnalyzeRequest,
    market_data_store: Arc<RwLock<MarketDataStore>>,
    price_provider: Arc<dyn PriceSeriesProvider>,
) -> Result<Response<AnalyzeResponse>, Status> {
    let ticker = normalize_ticker(&req_payload.ticker);
    if ticker.is_empty() {
        return Err(EngineError::InvalidRequest("Ticker must not be empty".to_string()).into());
    }
    let (start, end) = parse_date_range(&req_payload.start_date, &req_payload.end_date)?;
    let params = params_from_request(&req_payload);

    let series = fetch_price_series(&ticker, start, end, market_data_store, price_provider).await?;
    tracing::debug!(ticker = %ticker, rows = series.len(), policy = %params.policy, "Running analysis");

    let response = match analysis::analyze(&series, &params) {
        Ok(AnalysisOutcome::Ready(enriched)) => reply(AnalysisStatus::Ready, String::new(), &enriched),
        Ok(AnalysisOutcome::NoData) => AnalyzeResponse {
            status: AnalysisStatus::NoData as i32,
            message: NO_DATA_MESSAGE.to_string(),
            bars: vec![],
            policy: to_proto_policy(params.policy) as i32,
        },
        Err(e @ EngineError::DegenerateSeries { .. }) => {
            tracing::warn!(ticker = %ticker, error_detail = %e, "Policy cannot be applied, returning price bars only");
            let fallback = analysis::raw_fallback(&series, &params);
            reply(AnalysisStatus::Degenerate, e.to_string(), &fallback)
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Response::new(response))
}

fn reply(status: AnalysisStatus, message: String, enriched: &EnrichedSeries) -> AnalyzeResponse {
    AnalyzeResponse {
        status: status as i32,
        message,
        bars: enriched.bars.iter().map(to_proto_enriched_bar).collect(),
        policy: to_proto_policy(enriched.policy) as i32,
    }
}
