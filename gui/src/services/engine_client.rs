// gRPC client for the engine's MacdDashboard service
use anyhow::{Context, Result};
use engine::services::dashboard_service::helpers::{analyze_request, from_fundamentals_response, from_proto_enriched_bar, from_proto_policy};
use engine::services::{AnalysisStatus, FundamentalsRequest, LoadCsvRequest, MacdDashboardClient};
use shared::models::{EnrichedSeries, Fundamentals};
use tonic::transport::Channel;

use crate::state::app_state::{AnalysisReply, DashboardRequest, DashboardView, ReplyStatus};

#[derive(Clone)]
pub struct EngineClient {
    client: MacdDashboardClient<Channel>,
}

impl EngineClient {
    pub async fn connect(endpoint: String) -> Result<Self> {
        let client = MacdDashboardClient::connect(endpoint.clone())
            .await
            .with_context(|| format!("Cannot reach the engine at {}", endpoint))?;
        Ok(Self { client })
    }

    pub async fn load_csv(&self, file_path: String, ticker: String) -> Result<String> {
        let request = tonic::Request::new(LoadCsvRequest { file_path, ticker });
        let response = self.client.clone().load_csv_data(request).await?.into_inner();
        Ok(response.message)
    }

    pub async fn analyze(&self, request: &DashboardRequest) -> Result<AnalysisReply> {
        let message = analyze_request(&request.ticker, request.start, request.end, &request.params);
        let response = self.client.clone().analyze(tonic::Request::new(message)).await?.into_inner();

        let status = match response.status() {
            AnalysisStatus::Ready => ReplyStatus::Ready,
            AnalysisStatus::NoData => ReplyStatus::NoData,
            AnalysisStatus::Degenerate => ReplyStatus::Degenerate,
        };
        let bars = response
            .bars
            .iter()
            .map(from_proto_enriched_bar)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AnalysisReply {
            status,
            message: response.message.clone(),
            series: EnrichedSeries {
                ticker: request.ticker.clone(),
                policy: from_proto_policy(response.policy()),
                bars,
            },
        })
    }

    pub async fn fundamentals(&self, ticker: &str) -> Result<Fundamentals> {
        let request = tonic::Request::new(FundamentalsRequest { ticker: ticker.to_string() });
        let response = self.client.clone().get_fundamentals(request).await?.into_inner();
        Ok(from_fundamentals_response(&response))
    }

    /// Issues the analysis and fundamentals requests concurrently.
    pub async fn dashboard(&self, request: &DashboardRequest) -> DashboardView {
        tracing::info!(ticker = %request.ticker, policy = %request.params.policy, "Requesting dashboard data");
        let (analysis, fundamentals) = tokio::join!(self.analyze(request), self.fundamentals(&request.ticker));
        if let Err(e) = &analysis {
            tracing::error!(ticker = %request.ticker, error_detail = ?e, "Analysis request failed");
        }
        DashboardView::from_replies(analysis, fundamentals)
    }
}
