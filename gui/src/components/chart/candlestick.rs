// Price panel: candlesticks, moving-average overlays and crossover markers at the close
#![allow(non_snake_case)]
use dioxus::prelude::*;
use shared::models::{Crossover, EnrichedSeries};

use super::layout::{candle_shapes, markers, polyline_segments, CandleShape, XAxis, YScale};
use crate::config::{ChartConfig, MovingAverageStyle};

pub const PANEL_TOP: f64 = 24.0;
pub const PANEL_BOTTOM: f64 = 8.0;

#[component]
pub fn CandlestickChart(series: EnrichedSeries, chart: ChartConfig, moving_averages: Vec<MovingAverageStyle>) -> Element {
    let bars = &series.bars;
    let x_axis = XAxis::new(chart.width, chart.margin_left, chart.margin_right, bars.len());
    let plot_height = chart.price_height - PANEL_TOP - PANEL_BOTTOM;
    let Some(scale) = YScale::fit(bars.iter().flat_map(|b| [b.bar.high, b.bar.low]), PANEL_TOP, plot_height) else {
        return None;
    };

    let title = format!("{} Candlestick", series.ticker);
    let grid: Vec<(f64, String)> = scale.ticks(5).into_iter().map(|t| (scale.y(t), format!("{:.2}", t))).collect();
    let grid_right = chart.width - chart.margin_right;
    let label_x = chart.margin_left - 6.0;
    let wick_width = chart.candle.wick_width;
    let marker_font = chart.marker_size * 2.0;

    let candles: Vec<(CandleShape, &str)> = candle_shapes(bars, &x_axis, &scale)
        .into_iter()
        .map(|c| {
            let color = if c.rising { chart.candle.bullish_color.as_str() } else { chart.candle.bearish_color.as_str() };
            (c, color)
        })
        .collect();

    let overlays: Vec<(String, &str, f64)> = moving_averages
        .iter()
        .flat_map(|style| {
            let values: Vec<Option<f64>> = bars.iter().map(|b| b.moving_average(style.period)).collect();
            polyline_segments(&values, &x_axis, &scale)
                .into_iter()
                .map(move |points| (points, style.color.as_str(), style.line_width))
        })
        .collect();

    let marker_views: Vec<(f64, f64, &str, &str)> = markers(bars, &x_axis, &scale, |b| Some(b.bar.close))
        .into_iter()
        .map(|m| {
            let color = match m.kind {
                Crossover::Bullish => chart.bullish_marker_color.as_str(),
                _ => chart.bearish_marker_color.as_str(),
            };
            (m.x, m.y + chart.marker_size / 2.0, color, m.glyph())
        })
        .collect();

    rsx! {
        svg {
            class: "price-panel",
            width: "{chart.width}",
            height: "{chart.price_height}",
            style: "background-color: {chart.background}; display: block;",
            text { x: "{chart.margin_left}", y: "16", font_size: "13", font_weight: "bold", "{title}" }
            for (i, (y, label)) in grid.iter().enumerate() {
                g { key: "grid-{i}",
                    line { x1: "{chart.margin_left}", y1: "{y}", x2: "{grid_right}", y2: "{y}", stroke: "{chart.grid_color}", stroke_width: "1" }
                    text { x: "{label_x}", y: "{y}", font_size: "10", text_anchor: "end", "{label}" }
                }
            }
            for (i, (c, color)) in candles.iter().enumerate() {
                g { key: "candle-{i}",
                    line {
                        x1: "{c.x}", y1: "{c.wick_top}", x2: "{c.x}", y2: "{c.wick_bottom}",
                        stroke: "{color}", stroke_width: "{wick_width}"
                    }
                    rect {
                        x: "{c.body_left}", y: "{c.body_top}", width: "{c.body_width}", height: "{c.body_height}",
                        fill: "{color}"
                    }
                }
            }
            for (i, (points, color, width)) in overlays.iter().enumerate() {
                polyline { key: "ma-{i}", points: "{points}", fill: "none", stroke: "{color}", stroke_width: "{width}" }
            }
            for (i, (x, y, color, glyph)) in marker_views.iter().enumerate() {
                text {
                    key: "marker-{i}", x: "{x}", y: "{y}", fill: "{color}",
                    font_size: "{marker_font}", text_anchor: "middle",
                    "{glyph}"
                }
            }
        }
    }
}
