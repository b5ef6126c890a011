//! One dashboard submission: price series in, enriched series out.
//!
//! Everything here borrows the caller's series and builds new vectors; the
//! price bars are copied into the result untouched.

use crate::error::EngineError;
use crate::indicators::sma::OVERLAY_PERIODS;
use crate::indicators::{self, IndicatorCalculator, Sma};
use shared::models::{AnalysisParams, Crossover, EnrichedBar, EnrichedSeries, IndicatorSeries, PriceSeries};

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// The provider returned no bars for the ticker/range.
    NoData,
    Ready(EnrichedSeries),
}

pub fn analyze(prices: &PriceSeries, params: &AnalysisParams) -> Result<AnalysisOutcome, EngineError> {
    indicators::validate_windows(params.short_window, params.long_window, params.signal_window)?;

    if prices.is_empty() {
        tracing::warn!(ticker = %prices.ticker, "No price data, skipping indicator computation");
        return Ok(AnalysisOutcome::NoData);
    }

    let indicator_series = indicators::compute(
        &prices.bars,
        params.short_window,
        params.long_window,
        params.signal_window,
        params.policy,
    )?;
    let events = indicators::detect(&indicator_series, params.bullish_threshold, params.bearish_threshold);

    tracing::debug!(
        ticker = %prices.ticker,
        rows = prices.len(),
        bullish = events.iter().filter(|e| **e == Crossover::Bullish).count(),
        bearish = events.iter().filter(|e| **e == Crossover::Bearish).count(),
        "Analysis complete"
    );

    Ok(AnalysisOutcome::Ready(enrich(prices, params, Some((&indicator_series, &events)))))
}

/// Price bars with the moving-average overlays only, offered when the
/// selected policy cannot be applied to the series.
pub fn raw_fallback(prices: &PriceSeries, params: &AnalysisParams) -> EnrichedSeries {
    enrich(prices, params, None)
}

fn enrich(
    prices: &PriceSeries,
    params: &AnalysisParams,
    indicator: Option<(&IndicatorSeries, &[Crossover])>,
) -> EnrichedSeries {
    let overlays: Vec<Vec<Option<f64>>> = OVERLAY_PERIODS
        .iter()
        .map(|&period| {
            let sma = Sma::new(period);
            tracing::trace!(indicator = sma.name(), parameters = %sma.parameters(), "Computing overlay");
            sma.calculate(&prices.bars)
        })
        .collect();
    let overlay = |k: usize, i: usize| overlays[k].get(i).copied().flatten();

    let bars = prices
        .bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let (macd, signal_line, crossover) = match indicator {
                Some((series, events)) => (
                    series.macd.get(i).copied().flatten(),
                    series.signal.get(i).copied().flatten(),
                    events.get(i).copied().unwrap_or_default(),
                ),
                None => (None, None, Crossover::None),
            };
            EnrichedBar {
                bar: *bar,
                macd,
                signal_line,
                crossover,
                ma12: overlay(0, i),
                ma26: overlay(1, i),
                ma50: overlay(2, i),
                ma200: overlay(3, i),
            }
        })
        .collect();

    EnrichedSeries {
        ticker: prices.ticker.clone(),
        policy: params.policy,
        bars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use shared::models::{PriceBar, RescalingPolicy};

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + Duration::days(i as i64),
                open: close - 0.5, high: close + 1.0, low: close - 1.0, close,
                volume: 10_000.0,
            })
            .collect();
        PriceSeries::new("TEST", bars)
    }

    fn params(policy: RescalingPolicy) -> AnalysisParams {
        AnalysisParams {
            short_window: 2,
            long_window: 4,
            signal_window: 2,
            bullish_threshold: 100.0,
            bearish_threshold: -100.0,
            policy,
        }
    }

    fn wave(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + 10.0 * (i as f64 / 7.0).sin() + i as f64 * 0.1).collect()
    }

    #[test]
    fn test_empty_series_is_no_data() {
        let outcome = analyze(&PriceSeries::empty("NONE"), &AnalysisParams::default()).unwrap();
        assert_eq!(outcome, AnalysisOutcome::NoData);
    }

    #[test]
    fn test_invalid_window_is_reported_even_without_data() {
        let mut p = AnalysisParams::default();
        p.long_window = 1;
        let err = analyze(&PriceSeries::empty("NONE"), &p).unwrap_err();
        assert!(matches!(err, EngineError::InvalidWindow { name: "long", value: 1 }));
    }

    #[test]
    fn test_ready_series_is_aligned_with_input() {
        let prices = series_from_closes(&wave(240));
        let AnalysisOutcome::Ready(enriched) = analyze(&prices, &params(RescalingPolicy::Raw)).unwrap() else {
            panic!("expected a ready outcome");
        };
        assert_eq!(enriched.ticker, "TEST");
        assert_eq!(enriched.bars.len(), prices.len());
        for (e, b) in enriched.bars.iter().zip(prices.bars.iter()) {
            assert_eq!(e.bar, *b);
            assert!(e.macd.is_some() && e.signal_line.is_some());
        }
        assert_eq!(enriched.bars[0].crossover, Crossover::None);
        assert!(enriched.crossovers().count() > 0);
    }

    #[test]
    fn test_moving_average_warm_up() {
        let prices = series_from_closes(&wave(210));
        let AnalysisOutcome::Ready(enriched) = analyze(&prices, &params(RescalingPolicy::Raw)).unwrap() else {
            panic!("expected a ready outcome");
        };
        assert!(enriched.bars[10].ma12.is_none());
        assert!(enriched.bars[11].ma12.is_some());
        assert!(enriched.bars[24].ma26.is_none());
        assert!(enriched.bars[25].ma26.is_some());
        assert!(enriched.bars[48].ma50.is_none());
        assert!(enriched.bars[49].ma50.is_some());
        assert!(enriched.bars[198].ma200.is_none());
        assert!(enriched.bars[199].ma200.is_some());

        let expected: f64 = prices.bars[..12].iter().map(|b| b.close).sum::<f64>() / 12.0;
        assert!((enriched.bars[11].ma12.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_policy_values_in_range() {
        let prices = series_from_closes(&wave(120));
        let AnalysisOutcome::Ready(enriched) = analyze(&prices, &params(RescalingPolicy::PercentileRescaled)).unwrap() else {
            panic!("expected a ready outcome");
        };
        assert_eq!(enriched.policy, RescalingPolicy::PercentileRescaled);
        for bar in &enriched.bars {
            assert!((-100.0..=100.0).contains(&bar.macd.unwrap()));
            assert!((-100.0..=100.0).contains(&bar.signal_line.unwrap()));
        }
    }

    #[test]
    fn test_constant_prices_are_degenerate_under_standardization() {
        let prices = series_from_closes(&[50.0; 30]);
        let err = analyze(&prices, &params(RescalingPolicy::Standardized)).unwrap_err();
        assert!(matches!(err, EngineError::DegenerateSeries { .. }));
        // Raw has nothing to divide by and still succeeds.
        assert!(matches!(analyze(&prices, &params(RescalingPolicy::Raw)).unwrap(), AnalysisOutcome::Ready(_)));
    }

    #[test]
    fn test_raw_fallback_has_no_indicator_columns() {
        let prices = series_from_closes(&[50.0; 30]);
        let fallback = raw_fallback(&prices, &params(RescalingPolicy::Standardized));
        assert_eq!(fallback.bars.len(), 30);
        assert!(fallback.bars.iter().all(|b| b.macd.is_none() && b.signal_line.is_none()));
        assert!(fallback.bars.iter().all(|b| b.crossover == Crossover::None));
        assert_eq!(fallback.bars[29].ma12, Some(50.0));
    }

    #[test]
    fn test_analysis_is_repeatable() {
        let prices = series_from_closes(&wave(90));
        let p = params(RescalingPolicy::Standardized);
        assert_eq!(analyze(&prices, &p).unwrap(), analyze(&prices, &p).unwrap());
    }
}
