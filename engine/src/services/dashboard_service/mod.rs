// DashboardService: the MacdDashboard gRPC implementation. Each RPC logs the
// request and dispatches to its handler module.
use super::{
    AnalyzeRequest, AnalyzeResponse, FundamentalsRequest, FundamentalsResponse, LoadCsvRequest, LoadCsvResponse,
    MacdDashboard, MarketDataRequest, MarketDataResponse,
};
use crate::data::market_data::MarketDataStore;
use crate::data::provider::{FundamentalsProvider, PriceSeriesProvider};
use crate::error::EngineError;
use chrono::NaiveDate;
use shared::models::PriceSeries;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};

pub mod analyze;
pub mod get_fundamentals;
pub mod get_market_data;
pub mod helpers;
pub mod load_csv_data;

pub struct DashboardService {
    market_data_store: Arc<RwLock<MarketDataStore>>,
    price_provider: Arc<dyn PriceSeriesProvider>,
    fundamentals_provider: Arc<dyn FundamentalsProvider>,
}

impl DashboardService {
    pub fn new(
        market_data_store: Arc<RwLock<MarketDataStore>>,
        price_provider: Arc<dyn PriceSeriesProvider>,
        fundamentals_provider: Arc<dyn FundamentalsProvider>,
    ) -> Self {
        DashboardService {
            market_data_store,
            price_provider,
            fundamentals_provider,
        }
    }
}

/// Bars loaded into the store take precedence; other tickers go to the
/// provider on the blocking pool.
pub(crate) async fn fetch_price_series(
    ticker: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    market_data_store: Arc<RwLock<MarketDataStore>>,
    price_provider: Arc<dyn PriceSeriesProvider>,
) -> Result<PriceSeries, EngineError> {
    {
        let store = market_data_store.read().await;
        if store.contains(ticker) {
            return store.price_series(ticker, start, end);
        }
    }

    let lookup = ticker.to_string();
    tokio::task::spawn_blocking(move || price_provider.price_series(&lookup, start, end))
        .await
        .map_err(|e| EngineError::ProcessingError(format!("Price provider task failed: {}", e)))?
}

#[tonic::async_trait]
impl MacdDashboard for DashboardService {
    async fn load_csv_data(&self, request: Request<LoadCsvRequest>) -> Result<Response<LoadCsvResponse>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(
            ticker = %req_payload.ticker,
            path = %req_payload.file_path,
            "Received LoadCsvRequest in main service, dispatching to handler."
        );
        load_csv_data::handle_load_csv_data(req_payload, self.market_data_store.clone()).await
    }

    type GetMarketDataStream = ReceiverStream<Result<MarketDataResponse, Status>>;
    async fn get_market_data(&self, request: Request<MarketDataRequest>) -> Result<Response<Self::GetMarketDataStream>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(
            ticker = %req_payload.ticker,
            start_date = %req_payload.start_date,
            end_date = %req_payload.end_date,
            "Received GetMarketDataRequest in main service, dispatching to handler."
        );
        get_market_data::handle_get_market_data(req_payload, self.market_data_store.clone(), self.price_provider.clone()).await
    }

    async fn analyze(&self, request: Request<AnalyzeRequest>) -> Result<Response<AnalyzeResponse>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(
            ticker = %req_payload.ticker,
            start_date = %req_payload.start_date,
            end_date = %req_payload.end_date,
            short_window = req_payload.short_window,
            long_window = req_payload.long_window,
            signal_window = req_payload.signal_window,
            policy = ?req_payload.policy(),
            "Received AnalyzeRequest in main service, dispatching to handler."
        );
        analyze::handle_analyze(req_payload, self.market_data_store.clone(), self.price_provider.clone()).await
    }

    async fn get_fundamentals(&self, request: Request<FundamentalsRequest>) -> Result<Response<FundamentalsResponse>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(ticker = %req_payload.ticker, "Received FundamentalsRequest in main service, dispatching to handler.");
        get_fundamentals::handle_get_fundamentals(req_payload, self.fundamentals_provider.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::CsvDataDirectory;
    use crate::services::{AnalysisStatus, ProtoRescalingPolicy};
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};
    use tokio_stream::StreamExt;

    const HEADER: &str = "Date,Open,High,Low,Close,Adj Close,Volume";

    fn create_test_engine(dir: &TempDir) -> DashboardService {
        let market_data_store = Arc::new(RwLock::new(MarketDataStore::new()));
        let files = Arc::new(CsvDataDirectory::new(dir.path()));
        DashboardService::new(market_data_store, files.clone(), files)
    }

    fn price_csv(closes: &[f64]) -> String {
        let mut content = String::from(HEADER);
        let start = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        for (i, close) in closes.iter().enumerate() {
            let date = start + chrono::Duration::days(i as i64);
            content.push_str(&format!("\n{},{c},{c},{c},{c},{c},1000", date.format("%Y-%m-%d"), c = close));
        }
        content
    }

    fn create_dummy_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    fn analyze_request(ticker: &str, policy: ProtoRescalingPolicy) -> AnalyzeRequest {
        let mut req = AnalyzeRequest {
            ticker: ticker.to_string(),
            short_window: 2,
            long_window: 4,
            signal_window: 2,
            bullish_threshold: 100.0,
            bearish_threshold: -100.0,
            ..Default::default()
        };
        req.set_policy(policy);
        req
    }

    const STEP: [f64; 10] = [10.0, 10.0, 10.0, 20.0, 20.0, 20.0, 10.0, 10.0, 10.0, 10.0];

    #[tokio::test]
    async fn test_load_csv_data_success() {
        let dir = tempfile::tempdir().unwrap();
        let engine = create_test_engine(&dir);
        let tmp_file = create_dummy_csv(&price_csv(&[1.0, 2.0, 3.0]));
        let request = Request::new(LoadCsvRequest {
            file_path: tmp_file.path().to_str().unwrap().to_string(),
            ticker: "acme".to_string(),
        });
        let response = engine.load_csv_data(request).await.unwrap().into_inner();
        assert!(response.success);
        assert_eq!(response.bars_loaded, 3);
        assert!(response.message.contains("Loaded 3 bars for ticker ACME"));
        let store = engine.market_data_store.read().await;
        assert_eq!(store.get_bars("ACME", None, None).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_load_csv_data_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let engine = create_test_engine(&dir);
        let request = Request::new(LoadCsvRequest { file_path: "non_existent_file.csv".to_string(), ticker: "TEST".to_string() });
        let status = engine.load_csv_data(request).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::Internal);
        assert!(status.message().contains("I/O error"));
        assert!(status.message().contains("non_existent_file.csv"));
    }

    #[tokio::test]
    async fn test_load_csv_data_bad_data_format() {
        let dir = tempfile::tempdir().unwrap();
        let engine = create_test_engine(&dir);
        let tmp_file = create_dummy_csv(&format!("{}\n2021-06-01,NOT_A_NUMBER,1,1,1,1,1", HEADER));
        let request = Request::new(LoadCsvRequest {
            file_path: tmp_file.path().to_str().unwrap().to_string(),
            ticker: "TEST".to_string(),
        });
        let status = engine.load_csv_data(request).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert!(status.message().contains("CSV data format error"));
        assert!(status.message().contains("Error parsing 'Open'"));
    }

    #[tokio::test]
    async fn test_analyze_from_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("STEP.csv"), price_csv(&STEP)).unwrap();
        let engine = create_test_engine(&dir);

        let request = Request::new(analyze_request("step", ProtoRescalingPolicy::Raw));
        let response = engine.analyze(request).await.unwrap().into_inner();
        assert_eq!(response.status(), AnalysisStatus::Ready);
        assert_eq!(response.bars.len(), 10);
        assert_eq!(response.policy(), ProtoRescalingPolicy::Raw);

        let crossovers: Vec<i32> = response.bars.iter().map(|b| b.crossover).collect();
        assert_eq!(crossovers, vec![0, 0, 0, 0, 0, -1, 0, 0, 0, 1]);
        assert!((response.bars[3].macd.unwrap() - 8.0 / 3.0).abs() < 1e-9);
        assert_eq!(response.bars[0].bar.as_ref().unwrap().date, "2021-06-01");
    }

    #[tokio::test]
    async fn test_analyze_prefers_loaded_bars_and_honours_range() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("STEP.csv"), price_csv(&[1.0; 10])).unwrap();
        let engine = create_test_engine(&dir);
        let tmp_file = create_dummy_csv(&price_csv(&STEP));
        engine
            .load_csv_data(Request::new(LoadCsvRequest {
                file_path: tmp_file.path().to_str().unwrap().to_string(),
                ticker: "STEP".to_string(),
            }))
            .await
            .unwrap();

        let mut req = analyze_request("STEP", ProtoRescalingPolicy::Raw);
        req.start_date = "2021-06-03".to_string();
        req.end_date = "2021-06-05".to_string();
        let response = engine.analyze(Request::new(req)).await.unwrap().into_inner();
        let closes: Vec<f64> = response.bars.iter().map(|b| b.bar.as_ref().unwrap().close).collect();
        assert_eq!(closes, vec![10.0, 20.0, 20.0]);
    }

    #[tokio::test]
    async fn test_analyze_unknown_ticker_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let engine = create_test_engine(&dir);
        let response = engine
            .analyze(Request::new(analyze_request("NOPE", ProtoRescalingPolicy::Standardized)))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.status(), AnalysisStatus::NoData);
        assert_eq!(response.message, analyze::NO_DATA_MESSAGE);
        assert!(response.bars.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_invalid_window_is_invalid_argument() {
        let dir = tempfile::tempdir().unwrap();
        let engine = create_test_engine(&dir);
        let mut req = analyze_request("NOPE", ProtoRescalingPolicy::Raw);
        req.short_window = 1;
        let status = engine.analyze(Request::new(req)).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert!(status.message().contains("short window 1"));
    }

    #[tokio::test]
    async fn test_analyze_bad_date_is_invalid_argument() {
        let dir = tempfile::tempdir().unwrap();
        let engine = create_test_engine(&dir);
        let mut req = analyze_request("STEP", ProtoRescalingPolicy::Raw);
        req.end_date = "yesterday".to_string();
        let status = engine.analyze(Request::new(req)).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_analyze_constant_prices_fall_back_to_raw_bars() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("FLAT.csv"), price_csv(&[42.0; 15])).unwrap();
        let engine = create_test_engine(&dir);

        let response = engine
            .analyze(Request::new(analyze_request("FLAT", ProtoRescalingPolicy::PercentileRescaled)))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.status(), AnalysisStatus::Degenerate);
        assert!(response.message.contains("zero variance"));
        assert_eq!(response.bars.len(), 15);
        assert!(response.bars.iter().all(|b| b.macd.is_none() && b.crossover == 0));
        assert_eq!(response.bars[14].ma12, Some(42.0));
    }

    #[tokio::test]
    async fn test_get_market_data_streams_range() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("STEP.csv"), price_csv(&STEP)).unwrap();
        let engine = create_test_engine(&dir);

        let request = Request::new(MarketDataRequest {
            ticker: "STEP".to_string(),
            start_date: "2021-06-02".to_string(),
            end_date: String::new(),
        });
        let mut stream = engine.get_market_data(request).await.unwrap().into_inner();
        let mut bars = Vec::new();
        while let Some(message) = stream.next().await {
            bars.extend(message.unwrap().bars);
        }
        assert_eq!(bars.len(), 9);
        assert_eq!(bars[0].date, "2021-06-02");
    }

    #[tokio::test]
    async fn test_get_market_data_unknown_ticker_sends_empty_message() {
        let dir = tempfile::tempdir().unwrap();
        let engine = create_test_engine(&dir);
        let request = Request::new(MarketDataRequest { ticker: "NOPE".to_string(), ..Default::default() });
        let mut stream = engine.get_market_data(request).await.unwrap().into_inner();
        let first = stream.next().await.unwrap().unwrap();
        assert!(first.bars.is_empty());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_get_fundamentals() {
        let dir = tempfile::tempdir().unwrap();
        let ticker_dir = dir.path().join("ACME");
        std::fs::create_dir(&ticker_dir).unwrap();
        std::fs::write(ticker_dir.join("cashflow.csv"), ",2023-12-31\nFree Cash Flow,12.5\n").unwrap();
        let engine = create_test_engine(&dir);

        let response = engine
            .get_fundamentals(Request::new(FundamentalsRequest { ticker: "acme".to_string() }))
            .await
            .unwrap()
            .into_inner();
        let fundamentals = helpers::from_fundamentals_response(&response);
        assert!(fundamentals.income_statement.is_empty());
        assert_eq!(fundamentals.cash_flow.rows[0].label, "Free Cash Flow");
        assert_eq!(fundamentals.cash_flow.rows[0].values, vec![Some(12.5)]);
    }

    #[tokio::test]
    async fn test_empty_ticker_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let engine = create_test_engine(&dir);
        let status = engine
            .get_fundamentals(Request::new(FundamentalsRequest { ticker: "  ".to_string() }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }
}
