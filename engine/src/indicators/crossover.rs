// MACD / signal-line crossover detection
use shared::models::{Crossover, IndicatorSeries};

/// Classifies one row from the current and previous MACD/signal values.
///
/// Only strict inequalities count, so a previous row with MACD exactly on the
/// signal line never produces a crossover, and an undefined value never
/// satisfies a comparison. The thresholds gate on the signal line, not on the
/// MACD value.
pub fn classify(
    prev_macd: Option<f64>,
    prev_signal: Option<f64>,
    macd: Option<f64>,
    signal: Option<f64>,
    bullish_threshold: f64,
    bearish_threshold: f64,
) -> Crossover {
    let (Some(prev_macd), Some(prev_signal), Some(macd), Some(signal)) = (prev_macd, prev_signal, macd, signal) else {
        return Crossover::None;
    };

    if macd > signal && prev_macd < prev_signal && signal < bullish_threshold {
        Crossover::Bullish
    } else if macd < signal && prev_macd > prev_signal && signal > bearish_threshold {
        Crossover::Bearish
    } else {
        Crossover::None
    }
}

/// One label per row; row 0 has no predecessor and is always `None`. The
/// thresholds are used literally in whatever order they are given.
pub fn detect(series: &IndicatorSeries, bullish_threshold: f64, bearish_threshold: f64) -> Vec<Crossover> {
    let rows = series.macd.len().min(series.signal.len());
    let mut events = Vec::with_capacity(rows);

    for i in 0..rows {
        if i == 0 {
            events.push(Crossover::None);
            continue;
        }
        events.push(classify(
            series.macd[i - 1],
            series.signal[i - 1],
            series.macd[i],
            series.signal[i],
            bullish_threshold,
            bearish_threshold,
        ));
    }
    events
}
