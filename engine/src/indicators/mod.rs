// Technical indicators module
pub mod crossover;
pub mod ema;
pub mod macd;
pub mod rescale;
pub mod sma;

pub use crossover::{classify, detect};
pub use ema::{ewm_no_adjust, Ema};
pub use macd::{compute, validate_windows};
pub use rescale::rescale;
pub use sma::{rolling_mean, Sma};

use serde_json::Value;
use shared::models::PriceBar;

// Common trait for the per-bar overlays drawn on the price panel
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, data: &[PriceBar]) -> Vec<Option<f64>>; // None where the value is undefined (warm-up, missing close)
}

/// Close prices with non-finite values mapped to `None`.
pub fn closes(data: &[PriceBar]) -> Vec<Option<f64>> {
    data.iter().map(|b| Some(b.close).filter(|c| c.is_finite())).collect()
}
