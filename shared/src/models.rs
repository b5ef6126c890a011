use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Daily bars for one ticker, ordered by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        Self { ticker: ticker.into(), bars }
    }

    pub fn empty(ticker: impl Into<String>) -> Self {
        Self::new(ticker, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// How the MACD/signal pair is rescaled before crossover detection and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RescalingPolicy {
    #[default]
    Raw,
    Standardized,
    PercentileRescaled,
}

impl RescalingPolicy {
    pub const ALL: [RescalingPolicy; 3] = [
        RescalingPolicy::Raw,
        RescalingPolicy::Standardized,
        RescalingPolicy::PercentileRescaled,
    ];

    /// Label shown in the policy selector.
    pub fn label(&self) -> &'static str {
        match self {
            RescalingPolicy::Raw => "Original",
            RescalingPolicy::Standardized => "Normalization",
            RescalingPolicy::PercentileRescaled => "Percentile",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RescalingPolicy::Raw => {
                "We use the stock price (within the range selected) to create the MACD and Signal Line \
                 (which numerically vary based on price data)."
            }
            RescalingPolicy::Standardized => {
                "We use the stock price (within the range selected) to create the MACD and Signal Line \
                 (which numerically vary based on price data). Next, we normalize the MACD/Signal Line \
                 so that they fall in a consistent range, i.e. approximately from -2 to 2."
            }
            RescalingPolicy::PercentileRescaled => {
                "We use the stock price (within the range selected) to create the MACD and Signal Line \
                 (which numerically vary based on price data). Next, we normalize the MACD/Signal Line \
                 so that they fall in a consistent range, i.e. approximately from -2 to 2. Last, we use \
                 the normalized data to create probabilities from -100% to +100%. The probability \
                 means statistically what is believed to reverse the current direction."
            }
        }
    }

    /// Caption naming the kind of values plotted in the MACD panel.
    pub fn caption(&self) -> &'static str {
        match self {
            RescalingPolicy::Raw => "original data",
            RescalingPolicy::Standardized => "normalized data",
            RescalingPolicy::PercentileRescaled => "percentile data (numbers in %)",
        }
    }
}

impl fmt::Display for RescalingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RescalingPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" | "original" => Ok(RescalingPolicy::Raw),
            "standardized" | "normalization" | "normalized" => Ok(RescalingPolicy::Standardized),
            "percentilerescaled" | "percentile_rescaled" | "percentile" => {
                Ok(RescalingPolicy::PercentileRescaled)
            }
            other => Err(anyhow::anyhow!("Unknown rescaling policy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Crossover {
    Bearish,
    #[default]
    None,
    Bullish,
}

impl Crossover {
    /// -1 / 0 / +1, the marker encoding used by the chart and the wire format.
    pub fn as_i32(&self) -> i32 {
        match self {
            Crossover::Bearish => -1,
            Crossover::None => 0,
            Crossover::Bullish => 1,
        }
    }

    pub fn from_i32(value: i32) -> Self {
        match value.signum() {
            1 => Crossover::Bullish,
            -1 => Crossover::Bearish,
            _ => Crossover::None,
        }
    }
}

/// MACD and signal line aligned index-for-index with a price series.
/// `None` marks an undefined value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn new(macd: Vec<Option<f64>>, signal: Vec<Option<f64>>) -> Self {
        Self { macd, signal }
    }

    pub fn len(&self) -> usize {
        self.macd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }
}

/// One dashboard submission. Missing fields deserialize to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    pub short_window: usize,
    pub long_window: usize,
    pub signal_window: usize,
    pub bullish_threshold: f64,
    pub bearish_threshold: f64,
    pub policy: RescalingPolicy,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            short_window: 12,
            long_window: 50,
            signal_window: 9,
            bullish_threshold: -10.0,
            bearish_threshold: 10.0,
            policy: RescalingPolicy::Raw,
        }
    }
}

/// A price bar plus the derived columns handed to the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedBar {
    pub bar: PriceBar,
    pub macd: Option<f64>,
    pub signal_line: Option<f64>,
    pub crossover: Crossover,
    pub ma12: Option<f64>,
    pub ma26: Option<f64>,
    pub ma50: Option<f64>,
    pub ma200: Option<f64>,
}

impl EnrichedBar {
    /// The overlay column for `period`; only 12, 26, 50 and 200 are computed.
    pub fn moving_average(&self, period: usize) -> Option<f64> {
        match period {
            12 => self.ma12,
            26 => self.ma26,
            50 => self.ma50,
            200 => self.ma200,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSeries {
    pub ticker: String,
    pub policy: RescalingPolicy,
    pub bars: Vec<EnrichedBar>,
}

impl EnrichedSeries {
    pub fn crossovers(&self) -> impl Iterator<Item = (usize, &EnrichedBar)> {
        self.bars
            .iter()
            .enumerate()
            .filter(|(_, b)| b.crossover != Crossover::None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// One financial statement: line items by reporting period.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialStatement {
    pub name: String,
    pub periods: Vec<String>,
    pub rows: Vec<StatementRow>,
}

impl FinancialStatement {
    pub fn empty(name: impl Into<String>) -> Self {
        Self { name: name.into(), periods: Vec::new(), rows: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Fundamentals {
    pub income_statement: FinancialStatement,
    pub balance_sheet: FinancialStatement,
    pub cash_flow: FinancialStatement,
}

impl Fundamentals {
    pub fn is_empty(&self) -> bool {
        self.income_statement.is_empty() && self.balance_sheet.is_empty() && self.cash_flow.is_empty()
    }

    pub fn statements(&self) -> [&FinancialStatement; 3] {
        [&self.income_statement, &self.balance_sheet, &self.cash_flow]
    }
}
