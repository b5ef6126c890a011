// Dashboard state: the sidebar form and what the main panel shows.
use crate::config::{AppConfig, SliderRanges};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use shared::models::{AnalysisParams, EnrichedSeries, Fundamentals};
use shared::utils::{normalize_ticker, parse_optional_date};

pub const NO_DATA_MESSAGE: &str = "No data available for the given ticker.";
pub const NO_FUNDAMENTALS_MESSAGE: &str = "No fundamentals data available for the given ticker.";

/// Raw sidebar inputs, kept as typed text until submission.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardForm {
    pub ticker: String,
    pub start_date: String,
    pub end_date: String,
    pub params: AnalysisParams,
    pub ranges: SliderRanges,
}

/// A validated submission.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRequest {
    pub ticker: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub params: AnalysisParams,
}

impl DashboardForm {
    pub fn from_config(config: &AppConfig, today: NaiveDate) -> Self {
        Self {
            ticker: config.analysis.ticker.clone(),
            start_date: config.analysis.start_date.clone(),
            end_date: today.format(shared::utils::ISO_DATE_FORMAT).to_string(),
            params: config.analysis.defaults.clone(),
            ranges: config.analysis.ranges,
        }
    }

    pub fn to_request(&self) -> Result<DashboardRequest> {
        let ticker = normalize_ticker(&self.ticker);
        if ticker.is_empty() {
            return Err(anyhow!("Please enter a stock ticker."));
        }
        let start = parse_optional_date(&self.start_date)?;
        let end = parse_optional_date(&self.end_date)?;
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(anyhow!("Start date {} is after end date {}.", s, e));
            }
        }

        let p = &self.params;
        let windows = [
            ("short", p.short_window, self.ranges.short_window),
            ("long", p.long_window, self.ranges.long_window),
            ("signal", p.signal_window, self.ranges.signal_window),
        ];
        for (name, value, range) in windows {
            if !range.contains(value) {
                return Err(anyhow!("The {} window must be between {} and {}.", name, range.min, range.max));
            }
        }
        for value in [p.bullish_threshold, p.bearish_threshold] {
            if !self.ranges.threshold.contains(value) {
                return Err(anyhow!(
                    "Thresholds must be between {} and {}.",
                    self.ranges.threshold.min,
                    self.ranges.threshold.max
                ));
            }
        }

        Ok(DashboardRequest { ticker, start, end, params: p.clone() })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplyStatus {
    Ready,
    NoData,
    Degenerate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReply {
    pub status: ReplyStatus,
    pub message: String,
    pub series: EnrichedSeries,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    Idle,
    Loading,
    /// Chart plus fundamentals. `notice` is set when the rescaling policy
    /// could not be applied and only prices are plotted.
    Ready {
        series: EnrichedSeries,
        notice: Option<String>,
        fundamentals: FundamentalsView,
    },
    NoData {
        message: String,
        fundamentals: FundamentalsView,
    },
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FundamentalsView {
    Available(Fundamentals),
    Empty,
    Failed(String),
}

impl FundamentalsView {
    pub fn from_result(result: Result<Fundamentals>) -> Self {
        match result {
            Ok(f) if f.is_empty() => FundamentalsView::Empty,
            Ok(f) => FundamentalsView::Available(f),
            Err(e) => FundamentalsView::Failed(format!("{:#}", e)),
        }
    }
}

impl DashboardView {
    /// Combines the two concurrent replies. The fundamentals never block the chart.
    pub fn from_replies(analysis: Result<AnalysisReply>, fundamentals: Result<Fundamentals>) -> Self {
        let fundamentals = FundamentalsView::from_result(fundamentals);
        match analysis {
            Err(e) => DashboardView::Error(format!("{:#}", e)),
            Ok(reply) => match reply.status {
                ReplyStatus::NoData => DashboardView::NoData {
                    message: if reply.message.is_empty() { NO_DATA_MESSAGE.to_string() } else { reply.message },
                    fundamentals,
                },
                ReplyStatus::Ready => DashboardView::Ready { series: reply.series, notice: None, fundamentals },
                ReplyStatus::Degenerate => DashboardView::Ready {
                    series: reply.series,
                    notice: Some(reply.message),
                    fundamentals,
                },
            },
        }
    }
}
