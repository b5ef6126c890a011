// Exponential Moving Average (EMA), recursive "no adjustment" form
use super::{closes, IndicatorCalculator};
use serde_json::Value;
use shared::models::PriceBar;

pub struct Ema {
    name: String,
    span: usize,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self {
            name: format!("EMA({})", span),
            span,
        }
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "span": self.span })
    }

    fn calculate(&self, data: &[PriceBar]) -> Vec<Option<f64>> {
        ewm_no_adjust(&closes(data), self.span)
    }
}

/// Smoothing factor for a span: `2 / (span + 1)`.
pub fn alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// EMA seeded with the first defined observation:
/// `ema[i] = alpha * x[i] + (1 - alpha) * ema[i-1]`.
///
/// Undefined inputs emit the carried value (or `None` before the first
/// observation) and leave the recursion state untouched. An observation equal
/// to the current average keeps it bit-for-bit, so constant input stays
/// constant without rounding drift.
pub fn ewm_no_adjust(values: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    let alpha = alpha(span);
    let mut current: Option<f64> = None;

    values
        .iter()
        .map(|value| {
            if let Some(x) = value.filter(|x| x.is_finite()) {
                current = Some(match current {
                    None => x,
                    Some(prev) if prev == x => prev,
                    Some(prev) => alpha * x + (1.0 - alpha) * prev,
                });
            }
            current
        })
        .collect()
}
