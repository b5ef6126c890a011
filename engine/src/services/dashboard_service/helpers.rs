// Conversions between the wire messages and the shared domain types.
// The GUI client uses the `from_proto_*` half.
use crate::error::EngineError;
use crate::services::proto::{self, Cell};
use crate::services::{AnalyzeRequest, FundamentalsResponse, ProtoEnrichedBar, ProtoPriceBar, ProtoRescalingPolicy};
use chrono::NaiveDate;
use shared::models::{
    AnalysisParams, Crossover, EnrichedBar, FinancialStatement, Fundamentals, PriceBar, RescalingPolicy, StatementRow,
};
use shared::utils::{format_iso_date, parse_iso_date, parse_optional_date};

pub fn to_proto_price_bar(bar: &PriceBar) -> ProtoPriceBar {
    ProtoPriceBar {
        date: format_iso_date(bar.date),
        open: bar.open,
        high: bar.high,
        low: bar.low,
        close: bar.close,
        volume: bar.volume,
    }
}

pub fn from_proto_price_bar(bar: &ProtoPriceBar) -> Result<PriceBar, EngineError> {
    let date = parse_iso_date(&bar.date).map_err(|e| EngineError::InvalidRequest(e.to_string()))?;
    Ok(PriceBar {
        date,
        open: bar.open,
        high: bar.high,
        low: bar.low,
        close: bar.close,
        volume: bar.volume,
    })
}

pub fn to_proto_enriched_bar(bar: &EnrichedBar) -> ProtoEnrichedBar {
    ProtoEnrichedBar {
        bar: Some(to_proto_price_bar(&bar.bar)),
        macd: bar.macd,
        signal_line: bar.signal_line,
        crossover: bar.crossover.as_i32(),
        ma12: bar.ma12,
        ma26: bar.ma26,
        ma50: bar.ma50,
        ma200: bar.ma200,
    }
}

pub fn from_proto_enriched_bar(bar: &ProtoEnrichedBar) -> Result<EnrichedBar, EngineError> {
    let price = bar
        .bar
        .as_ref()
        .ok_or_else(|| EngineError::InvalidRequest("Enriched bar without a price bar".to_string()))?;
    Ok(EnrichedBar {
        bar: from_proto_price_bar(price)?,
        macd: bar.macd,
        signal_line: bar.signal_line,
        crossover: Crossover::from_i32(bar.crossover),
        ma12: bar.ma12,
        ma26: bar.ma26,
        ma50: bar.ma50,
        ma200: bar.ma200,
    })
}

pub fn to_proto_policy(policy: RescalingPolicy) -> ProtoRescalingPolicy {
    match policy {
        RescalingPolicy::Raw => ProtoRescalingPolicy::Raw,
        RescalingPolicy::Standardized => ProtoRescalingPolicy::Standardized,
        RescalingPolicy::PercentileRescaled => ProtoRescalingPolicy::PercentileRescaled,
    }
}

pub fn from_proto_policy(policy: ProtoRescalingPolicy) -> RescalingPolicy {
    match policy {
        ProtoRescalingPolicy::Raw => RescalingPolicy::Raw,
        ProtoRescalingPolicy::Standardized => RescalingPolicy::Standardized,
        ProtoRescalingPolicy::PercentileRescaled => RescalingPolicy::PercentileRescaled,
    }
}

/// Empty strings leave that end of the range open.
pub fn parse_date_range(start: &str, end: &str) -> Result<(Option<NaiveDate>, Option<NaiveDate>), EngineError> {
    let start = parse_optional_date(start).map_err(|e| EngineError::InvalidRequest(format!("Invalid start date: {}", e)))?;
    let end = parse_optional_date(end).map_err(|e| EngineError::InvalidRequest(format!("Invalid end date: {}", e)))?;
    Ok((start, end))
}

/// Window validation happens in the analysis pipeline.
pub fn params_from_request(req: &AnalyzeRequest) -> AnalysisParams {
    AnalysisParams {
        short_window: req.short_window as usize,
        long_window: req.long_window as usize,
        signal_window: req.signal_window as usize,
        bullish_threshold: req.bullish_threshold,
        bearish_threshold: req.bearish_threshold,
        policy: from_proto_policy(req.policy()),
    }
}

pub fn analyze_request(
    ticker: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    params: &AnalysisParams,
) -> AnalyzeRequest {
    let mut req = AnalyzeRequest {
        ticker: ticker.to_string(),
        start_date: start.map(format_iso_date).unwrap_or_default(),
        end_date: end.map(format_iso_date).unwrap_or_default(),
        short_window: u32::try_from(params.short_window).unwrap_or(u32::MAX),
        long_window: u32::try_from(params.long_window).unwrap_or(u32::MAX),
        signal_window: u32::try_from(params.signal_window).unwrap_or(u32::MAX),
        bullish_threshold: params.bullish_threshold,
        bearish_threshold: params.bearish_threshold,
        policy: 0,
    };
    req.set_policy(to_proto_policy(params.policy));
    req
}

pub fn to_proto_statement(statement: &FinancialStatement) -> proto::FinancialStatement {
    proto::FinancialStatement {
        name: statement.name.clone(),
        periods: statement.periods.clone(),
        rows: statement
            .rows
            .iter()
            .map(|row| proto::StatementRow {
                label: row.label.clone(),
                values: row.values.iter().map(|&value| Cell { value }).collect(),
            })
            .collect(),
    }
}

pub fn from_proto_statement(statement: &proto::FinancialStatement) -> FinancialStatement {
    FinancialStatement {
        name: statement.name.clone(),
        periods: statement.periods.clone(),
        rows: statement
            .rows
            .iter()
            .map(|row| StatementRow {
                label: row.label.clone(),
                values: row.values.iter().map(|cell| cell.value).collect(),
            })
            .collect(),
    }
}

pub fn to_fundamentals_response(fundamentals: &Fundamentals) -> FundamentalsResponse {
    FundamentalsResponse {
        income_statement: Some(to_proto_statement(&fundamentals.income_statement)),
        balance_sheet: Some(to_proto_statement(&fundamentals.balance_sheet)),
        cash_flow: Some(to_proto_statement(&fundamentals.cash_flow)),
    }
}

pub fn from_fundamentals_response(response: &FundamentalsResponse) -> Fundamentals {
    let convert = |s: &Option<proto::FinancialStatement>| s.as_ref().map(from_proto_statement).unwrap_or_default();
    Fundamentals {
        income_statement: convert(&response.income_statement),
        balance_sheet: convert(&response.balance_sheet),
        cash_flow: convert(&response.cash_flow),
    }
}
