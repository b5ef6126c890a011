// In-memory daily bars, filled through the LoadCsvData RPC
use super::csv_parser::normalize_bars;
use super::provider::PriceSeriesProvider;
use crate::error::EngineError;
use chrono::NaiveDate;
use shared::models::{PriceBar, PriceSeries};
use std::collections::HashMap;

pub struct MarketDataStore {
    data: HashMap<String, Vec<PriceBar>>,
}

impl MarketDataStore {
    pub fn new() -> Self {
        MarketDataStore { data: HashMap::new() }
    }

    /// Merges bars into the ticker's history. Dates stay strictly increasing;
    /// for a date already present the stored bar wins.
    pub fn add_bars(&mut self, ticker: &str, new_bars: Vec<PriceBar>) {
        let bars = self.data.entry(ticker.to_string()).or_default();
        bars.extend(new_bars);
        let merged = normalize_bars(std::mem::take(bars));
        *bars = merged;
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.data.contains_key(ticker)
    }

    /// Bars within `[start, end]`, both ends inclusive and optional. `None`
    /// when the ticker was never loaded.
    pub fn get_bars(&self, ticker: &str, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Vec<PriceBar>> {
        self.data.get(ticker).map(|bars| {
            bars.iter()
                .filter(|b| start.map_or(true, |s| b.date >= s))
                .filter(|b| end.map_or(true, |e| b.date <= e))
                .copied()
                .collect()
        })
    }
}

impl Default for MarketDataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSeriesProvider for MarketDataStore {
    fn price_series(&self, ticker: &str, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<PriceSeries, EngineError> {
        let bars = self.get_bars(ticker, start, end).unwrap_or_default();
        Ok(PriceSeries::new(ticker, bars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close, high: close, low: close, close,
            volume: 1.0,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_unknown_ticker_is_none() {
        let store = MarketDataStore::new();
        assert!(store.get_bars("AAPL", None, None).is_none());
        assert!(!store.contains("AAPL"));
    }

    #[test]
    fn test_add_bars_merges_in_date_order() {
        let mut store = MarketDataStore::new();
        store.add_bars("AAPL", vec![bar(3, 3.0), bar(1, 1.0)]);
        store.add_bars("AAPL", vec![bar(2, 2.0), bar(3, 30.0)]);
        let bars = store.get_bars("AAPL", None, None).unwrap();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_range_is_inclusive() {
        let mut store = MarketDataStore::new();
        store.add_bars("AAPL", (1..=10).map(|d| bar(d, d as f64)).collect());
        let bars = store.get_bars("AAPL", Some(date(3)), Some(date(5))).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, date(3));
        assert_eq!(bars[2].date, date(5));

        assert_eq!(store.get_bars("AAPL", Some(date(8)), None).unwrap().len(), 3);
        assert_eq!(store.get_bars("AAPL", None, Some(date(2))).unwrap().len(), 2);
        assert!(store.get_bars("AAPL", Some(date(6)), Some(date(5))).unwrap().is_empty());
    }

    #[test]
    fn test_provider_returns_empty_series_for_unknown_ticker() {
        let store = MarketDataStore::new();
        let series = store.price_series("MSFT", None, None).unwrap();
        assert_eq!(series.ticker, "MSFT");
        assert!(series.is_empty());
    }
}
