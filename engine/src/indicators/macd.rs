// MACD (Moving Average Convergence Divergence) and its signal line
use super::ema::{ewm_no_adjust, Ema};
use super::{rescale::rescale, IndicatorCalculator};
use crate::error::EngineError;
use shared::models::{IndicatorSeries, PriceBar, RescalingPolicy};

pub const MIN_WINDOW: usize = 2;

/// Rejects any EMA window below [`MIN_WINDOW`]. No ordering between the
/// windows is required.
pub fn validate_windows(short_window: usize, long_window: usize, signal_window: usize) -> Result<(), EngineError> {
    for (name, value) in [("short", short_window), ("long", long_window), ("signal", signal_window)] {
        if value < MIN_WINDOW {
            return Err(EngineError::InvalidWindow { name, value });
        }
    }
    Ok(())
}

/// MACD line `EMA(short) - EMA(long)` of Close and its signal line
/// `EMA(signal)` of the MACD, rescaled under `policy`.
///
/// Windows are validated before anything else, so an empty series with a bad
/// window is still an error; an empty series with valid windows yields an
/// empty result.
pub fn compute(
    prices: &[PriceBar],
    short_window: usize,
    long_window: usize,
    signal_window: usize,
    policy: RescalingPolicy,
) -> Result<IndicatorSeries, EngineError> {
    validate_windows(short_window, long_window, signal_window)?;
    let short_ema = Ema::new(short_window).calculate(prices);
    let long_ema = Ema::new(long_window).calculate(prices);
    let raw = macd_from_emas(&short_ema, &long_ema, signal_window);
    tracing::debug!(rows = raw.len(), ?policy, "Computed raw MACD lines");
    rescale(&raw, policy)
}

/// Unscaled MACD and signal line from the two price EMAs.
fn macd_from_emas(short_ema: &[Option<f64>], long_ema: &[Option<f64>], signal_window: usize) -> IndicatorSeries {
    let macd: Vec<Option<f64>> = short_ema
        .iter()
        .zip(long_ema.iter())
        .map(|(s, l)| match (s, l) {
            (Some(s), Some(l)) => Some(s - l),
            _ => None,
        })
        .collect();
    let signal = ewm_no_adjust(&macd, signal_window);

    IndicatorSeries::new(macd, signal)
}
