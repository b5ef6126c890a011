// Handler for the GetMarketData RPC
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::RwLock;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Response, Status};

use super::fetch_price_series;
use super::helpers::{parse_date_range, to_proto_price_bar};
use crate::data::market_data::MarketDataStore;
use crate::data::provider::PriceSeriesProvider;
use crate::services::{MarketDataRequest, MarketDataResponse, ProtoPriceBar};
use shared::utils::normalize_ticker;

// Bars per streamed message.
const STREAM_CHUNK_SIZE: usize = 500;

pub async fn handle_get_market_data(
    req_payload: MarketDataRequest,
    market_data_store: Arc<RwLock<MarketDataStore>>,
    price_provider: Arc<dyn PriceSeriesProvider>,
) -> Result<Response<ReceiverStream<Result<MarketDataResponse, Status>>>, Status> {
    let ticker = normalize_ticker(&req_payload.ticker);
    let (start, end) = parse_date_range(&req_payload.start_date, &req_payload.end_date)?;
    tracing::debug!(ticker = %ticker, ?start, ?end, "Handling GetMarketDataRequest in dedicated handler");

    let series = fetch_price_series(&ticker, start, end, market_data_store, price_provider).await?;

    let (tx, rx) = mpsc::channel(4);

    tokio::spawn(async move {
        if series.is_empty() {
            tracing::warn!(ticker = %series.ticker, ?start, ?end, "No market data found in the given range (handler).");
            if let Err(e) = tx.send(Ok(MarketDataResponse { bars: vec![] })).await {
                tracing::error!(error = ?e, ticker = %series.ticker, "Failed to send empty market data to stream (handler)");
            }
            return;
        }

        tracing::debug!(ticker = %series.ticker, count = series.len(), "Streaming market data (handler).");
        for chunk in series.bars.chunks(STREAM_CHUNK_SIZE) {
            let bars: Vec<ProtoPriceBar> = chunk.iter().map(to_proto_price_bar).collect();
            if let Err(e) = tx.send(Ok(MarketDataResponse { bars })).await {
                tracing::error!(error = ?e, ticker = %series.ticker, "Failed to send market data to stream (handler)");
                return;
            }
        }
    });

    Ok(Response::new(ReceiverStream::new(rx)))
}
