// Rescaling policies applied to the MACD/signal pair
//
// Normalization constants are taken from the series passed in, so the same
// threshold means different things for different date ranges.
use crate::error::EngineError;
use shared::models::{IndicatorSeries, RescalingPolicy};
use std::f64::consts::SQRT_2;

pub const MACD_COLUMN: &str = "MACD";
pub const SIGNAL_COLUMN: &str = "SignalLine";

pub fn rescale(series: &IndicatorSeries, policy: RescalingPolicy) -> Result<IndicatorSeries, EngineError> {
    match policy {
        RescalingPolicy::Raw => Ok(series.clone()),
        RescalingPolicy::Standardized => standardize_pair(series),
        RescalingPolicy::PercentileRescaled => {
            let z = standardize_pair(series)?;
            Ok(IndicatorSeries::new(to_percentiles(&z.macd), to_percentiles(&z.signal)))
        }
    }
}

fn standardize_pair(series: &IndicatorSeries) -> Result<IndicatorSeries, EngineError> {
    Ok(IndicatorSeries::new(
        standardize(&series.macd, MACD_COLUMN)?,
        standardize(&series.signal, SIGNAL_COLUMN)?,
    ))
}

/// Z-scores against the mean and sample standard deviation of the defined
/// values. Undefined entries stay undefined; an all-undefined column is
/// returned unchanged.
pub fn standardize(values: &[Option<f64>], column: &'static str) -> Result<Vec<Option<f64>>, EngineError> {
    let defined: Vec<f64> = values.iter().flatten().copied().collect();
    if defined.is_empty() {
        return Ok(values.to_vec());
    }
    if defined.len() < 2 {
        return Err(EngineError::DegenerateSeries { column });
    }

    let n = defined.len() as f64;
    let mean = defined.iter().sum::<f64>() / n;
    let variance = defined.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();
    let scale = defined.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));

    // Relative to the column's magnitude: summing a non-zero constant leaves
    // rounding noise in the variance. NaN fails the comparison too.
    if !(std_dev > scale * 1e-12) {
        return Err(EngineError::DegenerateSeries { column });
    }

    Ok(values.iter().map(|v| v.map(|x| (x - mean) / std_dev)).collect())
}

fn to_percentiles(z_scores: &[Option<f64>]) -> Vec<Option<f64>> {
    z_scores.iter().map(|z| z.map(percentile)).collect()
}

/// Maps a z-score onto [-100, 100] through the standard normal CDF.
pub fn percentile(z: f64) -> f64 {
    (normal_cdf(z) * 200.0 - 100.0).clamp(-100.0, 100.0)
}

pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Abramowitz & Stegun 7.1.26, |error| < 1.5e-7. Evaluated on |x| and
/// mirrored so the result is odd and non-decreasing through zero.
fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_series() -> IndicatorSeries {
        IndicatorSeries::new(
            vec![Some(-1.5), Some(0.25), Some(2.0), Some(3.5), Some(-0.75), Some(1.0)],
            vec![Some(0.1), Some(0.4), Some(0.2), Some(0.9), Some(-0.3), Some(0.05)],
        )
    }

    fn mean_and_std(values: &[Option<f64>]) -> (f64, f64) {
        let xs: Vec<f64> = values.iter().flatten().copied().collect();
        let n = xs.len() as f64;
        let mean = xs.iter().sum::<f64>() / n;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        (mean, var.sqrt())
    }

    #[test]
    fn test_raw_is_identity() {
        let series = sample_series();
        assert_eq!(rescale(&series, RescalingPolicy::Raw).unwrap(), series);
    }

    #[test]
    fn test_standardized_has_zero_mean_unit_std() {
        let z = rescale(&sample_series(), RescalingPolicy::Standardized).unwrap();
        for column in [&z.macd, &z.signal] {
            let (mean, std) = mean_and_std(column);
            assert!(mean.abs() < 1e-12, "mean {}", mean);
            assert!((std - 1.0).abs() < 1e-12, "std {}", std);
        }
    }

    #[test]
    fn test_percentile_bounds_and_monotonicity() {
        let series = sample_series();
        let z = rescale(&series, RescalingPolicy::Standardized).unwrap();
        let p = rescale(&series, RescalingPolicy::PercentileRescaled).unwrap();

        for (zs, ps) in [(&z.macd, &p.macd), (&z.signal, &p.signal)] {
            let mut pairs: Vec<(f64, f64)> = zs.iter().zip(ps.iter()).map(|(z, p)| (z.unwrap(), p.unwrap())).collect();
            assert!(pairs.iter().all(|(_, p)| (-100.0..=100.0).contains(p)));
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
            for w in pairs.windows(2) {
                assert!(w[1].1 >= w[0].1, "percentile decreased: {:?} -> {:?}", w[0], w[1]);
            }
        }
    }

    #[test]
    fn test_percentile_reference_points() {
        assert!(percentile(0.0).abs() < 1e-6);
        assert!((percentile(1.0) - 68.2689).abs() < 1e-3);
        assert!((percentile(-1.96) + 95.0).abs() < 1e-2);
        assert_eq!(percentile(40.0), 100.0);
        assert_eq!(percentile(-40.0), -100.0);
        assert_eq!(percentile(f64::INFINITY), 100.0);
    }

    #[test]
    fn test_percentile_monotone_across_zero() {
        let grid: Vec<f64> = (-400..=400).map(|i| i as f64 * 0.01).collect();
        for w in grid.windows(2) {
            assert!(percentile(w[1]) >= percentile(w[0]), "{} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn test_constant_column_is_degenerate() {
        let series = IndicatorSeries::new(vec![Some(0.0); 5], vec![Some(0.0); 5]);
        let err = rescale(&series, RescalingPolicy::Standardized).unwrap_err();
        assert!(matches!(err, EngineError::DegenerateSeries { column: "MACD" }));
        let err = rescale(&series, RescalingPolicy::PercentileRescaled).unwrap_err();
        assert!(matches!(err, EngineError::DegenerateSeries { .. }));
    }

    #[test]
    fn test_constant_signal_only_is_degenerate() {
        let series = IndicatorSeries::new(vec![Some(1.0), Some(2.0), Some(3.0)], vec![Some(0.7); 3]);
        let err = standardize_pair(&series).unwrap_err();
        assert!(matches!(err, EngineError::DegenerateSeries { column: "SignalLine" }));
    }

    #[test]
    fn test_single_value_is_degenerate() {
        assert!(standardize(&[Some(3.0)], MACD_COLUMN).is_err());
    }

    #[test]
    fn test_empty_and_undefined_columns_pass_through() {
        let empty = IndicatorSeries::default();
        assert!(rescale(&empty, RescalingPolicy::PercentileRescaled).unwrap().is_empty());
        assert_eq!(standardize(&[None, None], MACD_COLUMN).unwrap(), vec![None, None]);
    }

    #[test]
    fn test_undefined_values_are_kept_in_place() {
        let z = standardize(&[None, Some(1.0), Some(3.0)], MACD_COLUMN).unwrap();
        assert_eq!(z[0], None);
        assert!((z[1].unwrap() + std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert!((z[2].unwrap() - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_cutoff_is_relative_to_magnitude() {
        // Spread of a few ulps around 1.0: std well below 1e-12 of the values.
        let err = standardize(&[Some(1.0), Some(1.0 + 1e-15)], MACD_COLUMN).unwrap_err();
        assert!(matches!(err, EngineError::DegenerateSeries { column } if column == MACD_COLUMN));

        // std ~7e-9 against a 1e-9 cutoff at magnitude 1000.
        assert!(standardize(&[Some(1000.0), Some(1000.0 + 1e-8)], MACD_COLUMN).is_ok());

        // Tiny in absolute terms but a real spread relative to its own size.
        let z = standardize(&[Some(1e-20), Some(3e-20)], MACD_COLUMN).unwrap();
        assert!((z[0].unwrap() + std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
        assert!((z[1].unwrap() - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
    }
}
