// gRPC surface of the engine
pub mod dashboard_service;

pub mod proto {
    tonic::include_proto!("dashboard");
}

pub use dashboard_service::DashboardService;
pub use proto::macd_dashboard_client::MacdDashboardClient;
pub use proto::macd_dashboard_server::{MacdDashboard, MacdDashboardServer};
pub use proto::{
    AnalysisStatus, AnalyzeRequest, AnalyzeResponse, FundamentalsRequest, FundamentalsResponse, LoadCsvRequest,
    LoadCsvResponse, MarketDataRequest, MarketDataResponse,
};
pub use proto::{
    EnrichedBar as ProtoEnrichedBar, FinancialStatement as ProtoFinancialStatement, PriceBar as ProtoPriceBar,
    RescalingPolicy as ProtoRescalingPolicy,
};
