// GUI configuration, embedded from assets/config/default.json
pub mod theme;

use serde::Deserialize;
use shared::models::AnalysisParams;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub version: String,
    pub app: AppSettings,
    pub engine: EngineConnSettings,
    pub chart: ChartConfig,
    pub moving_averages: Vec<MovingAverageStyle>,
    pub analysis: AnalysisDefaults,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppSettings {
    pub title: String,
    pub theme: String, // "dark" or "light"
    pub window_width: f64,
    pub window_height: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EngineConnSettings {
    pub host: String,
    pub port: u16,
}

impl EngineConnSettings {
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChartConfig {
    pub width: f64,
    pub price_height: f64,
    pub macd_height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub background: String,
    pub grid_color: String,
    pub candle: CandleStyle,
    pub macd_color: String,
    pub signal_color: String,
    pub line_width: f64,
    pub bullish_marker_color: String,
    pub bearish_marker_color: String,
    pub marker_size: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CandleStyle {
    pub bullish_color: String,
    pub bearish_color: String,
    pub wick_width: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MovingAverageStyle {
    pub period: usize,
    pub color: String,
    pub line_width: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalysisDefaults {
    pub ticker: String,
    pub start_date: String,
    pub defaults: AnalysisParams,
    pub ranges: SliderRanges,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct SliderRanges {
    pub short_window: WindowRange,
    pub long_window: WindowRange,
    pub signal_window: WindowRange,
    pub threshold: ThresholdRange,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct WindowRange {
    pub min: usize,
    pub max: usize,
}

impl WindowRange {
    pub fn contains(&self, value: usize) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ThresholdRange {
    pub min: f64,
    pub max: f64,
}

impl ThresholdRange {
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl AppConfig {
    pub fn load_default() -> Result<Self, anyhow::Error> {
        let config_str = include_str!("../../assets/config/default.json");
        Self::from_json(config_str)
    }

    pub fn from_json(config_str: &str) -> Result<Self, anyhow::Error> {
        let config: AppConfig = serde_json::from_str(config_str)?;
        Ok(config)
    }
}
