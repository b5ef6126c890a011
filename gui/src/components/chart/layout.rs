// Chart geometry: maps bar indices and values to SVG coordinates.
use shared::models::{Crossover, EnrichedBar};

/// Horizontal placement shared by both panels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XAxis {
    pub left: f64,
    pub right: f64,
    pub count: usize,
}

impl XAxis {
    pub fn new(width: f64, margin_left: f64, margin_right: f64, count: usize) -> Self {
        Self { left: margin_left, right: (width - margin_right).max(margin_left), count }
    }

    pub fn slot_width(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.right - self.left) / self.count as f64
        }
    }

    /// Centre of the i-th slot.
    pub fn x(&self, i: usize) -> f64 {
        self.left + (i as f64 + 0.5) * self.slot_width()
    }
}

/// Vertical value scale of one panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YScale {
    pub min: f64,
    pub max: f64,
    pub top: f64,
    pub height: f64,
}

impl YScale {
    /// Range over the finite values, padded by 5% so lines do not touch the
    /// panel edges. A flat range is widened by one unit each way.
    pub fn fit(values: impl IntoIterator<Item = f64>, top: f64, height: f64) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        let (min, max) = if max - min > 0.0 {
            let pad = (max - min) * 0.05;
            (min - pad, max + pad)
        } else {
            (min - 1.0, max + 1.0)
        };
        Some(Self { min, max, top, height })
    }

    pub fn y(&self, value: f64) -> f64 {
        self.top + (self.max - value) / (self.max - self.min) * self.height
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if count < 2 {
            return vec![self.min];
        }
        let step = (self.max - self.min) / (count - 1) as f64;
        (0..count).map(|i| self.min + step * i as f64).collect()
    }
}

/// `points` strings for SVG polylines, one per run of defined values.
pub fn polyline_segments(values: &[Option<f64>], x_axis: &XAxis, scale: &YScale) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for (i, value) in values.iter().enumerate() {
        match value.filter(|v| v.is_finite()) {
            Some(v) => current.push(format!("{:.2},{:.2}", x_axis.x(i), scale.y(v))),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current).join(" ")),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current.join(" "));
    }
    segments
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleShape {
    pub x: f64,
    pub body_left: f64,
    pub body_width: f64,
    pub body_top: f64,
    pub body_height: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub rising: bool,
}

pub fn candle_shapes(bars: &[EnrichedBar], x_axis: &XAxis, scale: &YScale) -> Vec<CandleShape> {
    let body_width = (x_axis.slot_width() * 0.7).max(1.0);
    bars.iter()
        .enumerate()
        .filter(|(_, b)| [b.bar.open, b.bar.high, b.bar.low, b.bar.close].iter().all(|v| v.is_finite()))
        .map(|(i, b)| {
            let x = x_axis.x(i);
            let open_y = scale.y(b.bar.open);
            let close_y = scale.y(b.bar.close);
            CandleShape {
                x,
                body_left: x - body_width / 2.0,
                body_width,
                body_top: open_y.min(close_y),
                body_height: (open_y - close_y).abs().max(1.0),
                wick_top: scale.y(b.bar.high),
                wick_bottom: scale.y(b.bar.low),
                rising: b.bar.close >= b.bar.open,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub kind: Crossover,
}

impl Marker {
    pub fn glyph(&self) -> &'static str {
        match self.kind {
            Crossover::Bullish => "▲",
            Crossover::Bearish => "▼",
            Crossover::None => "",
        }
    }
}

/// One marker per crossover row, placed at the value `pick` returns for that
/// bar. Rows where `pick` is undefined get no marker.
pub fn markers(
    bars: &[EnrichedBar],
    x_axis: &XAxis,
    scale: &YScale,
    pick: impl Fn(&EnrichedBar) -> Option<f64>,
) -> Vec<Marker> {
    bars.iter()
        .enumerate()
        .filter(|(_, b)| b.crossover != Crossover::None)
        .filter_map(|(i, b)| {
            let value = pick(b).filter(|v| v.is_finite())?;
            Some(Marker { x: x_axis.x(i), y: scale.y(value), kind: b.crossover })
        })
        .collect()
}
