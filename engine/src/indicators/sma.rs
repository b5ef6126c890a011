// Simple Moving Average (SMA) indicator implementation
use super::{closes, IndicatorCalculator};
use serde_json::Value;
use shared::models::PriceBar;

/// Periods of the moving averages overlaid on the price panel.
pub const OVERLAY_PERIODS: [usize; 4] = [12, 26, 50, 200];

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("MA{}", period),
            period,
        }
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[PriceBar]) -> Vec<Option<f64>> {
        rolling_mean(&closes(data), self.period)
    }
}

/// Arithmetic mean over a trailing window of `period` rows. Undefined for the
/// first `period - 1` rows and for any window holding an undefined value.
pub fn rolling_mean(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            values[i + 1 - period..=i]
                .iter()
                .try_fold(0.0, |sum, v| v.map(|x| sum + x))
                .map(|sum| sum / period as f64)
        })
        .collect()
}
