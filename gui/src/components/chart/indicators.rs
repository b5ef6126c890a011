// MACD panel: MACD and signal line with crossover markers on the MACD value
#![allow(non_snake_case)]
use dioxus::prelude::*;
use shared::models::{Crossover, EnrichedSeries};
use shared::utils::format_iso_date;

use super::candlestick::{PANEL_BOTTOM, PANEL_TOP};
use super::layout::{markers, polyline_segments, XAxis, YScale};
use crate::config::ChartConfig;

const AXIS_LABELS: f64 = 18.0;

#[component]
pub fn MacdChart(series: EnrichedSeries, chart: ChartConfig) -> Element {
    let bars = &series.bars;
    let x_axis = XAxis::new(chart.width, chart.margin_left, chart.margin_right, bars.len());
    let plot_height = chart.macd_height - PANEL_TOP - PANEL_BOTTOM - AXIS_LABELS;
    let height = chart.macd_height;
    let bottom = chart.macd_height - AXIS_LABELS;
    let grid_right = chart.width - chart.margin_right;
    let label_x = chart.margin_left - 6.0;
    let marker_font = chart.marker_size * 1.6;
    let notice_y = PANEL_TOP + 20.0;
    let date_y = bottom + 14.0;

    let macd: Vec<Option<f64>> = bars.iter().map(|b| b.macd).collect();
    let signal: Vec<Option<f64>> = bars.iter().map(|b| b.signal_line).collect();

    // First, middle and last date under the panel.
    let date_labels: Vec<(f64, String)> = if bars.is_empty() {
        Vec::new()
    } else {
        let mut idx = vec![0, bars.len() / 2, bars.len() - 1];
        idx.dedup();
        idx.into_iter().map(|i| (x_axis.x(i), format_iso_date(bars[i].bar.date))).collect()
    };

    let Some(scale) = YScale::fit(macd.iter().chain(signal.iter()).flatten().copied(), PANEL_TOP, plot_height) else {
        return rsx! {
            svg {
                class: "macd-panel",
                width: "{chart.width}",
                height: "{height}",
                style: "background-color: {chart.background}; display: block;",
                text { x: "{chart.margin_left}", y: "16", font_size: "13", font_weight: "bold", "MACD" }
                text { x: "{chart.margin_left}", y: "{notice_y}", font_size: "12", "MACD is not available for this selection." }
            }
        };
    };

    let grid: Vec<(f64, String)> = scale.ticks(3).into_iter().map(|t| (scale.y(t), format!("{:.2}", t))).collect();
    let zero_y = (scale.min < 0.0 && scale.max > 0.0).then(|| scale.y(0.0));
    let macd_lines = polyline_segments(&macd, &x_axis, &scale);
    let signal_lines = polyline_segments(&signal, &x_axis, &scale);

    let marker_views: Vec<(f64, f64, &str, &str)> = markers(bars, &x_axis, &scale, |b| b.macd)
        .into_iter()
        .map(|m| {
            let color = match m.kind {
                Crossover::Bullish => chart.bullish_marker_color.as_str(),
                _ => chart.bearish_marker_color.as_str(),
            };
            (m.x, m.y + marker_font / 3.0, color, m.glyph())
        })
        .collect();

    rsx! {
        svg {
            class: "macd-panel",
            width: "{chart.width}",
            height: "{height}",
            style: "background-color: {chart.background}; display: block;",
            text { x: "{chart.margin_left}", y: "16", font_size: "13", font_weight: "bold", "MACD" }
            for (i, (y, label)) in grid.iter().enumerate() {
                g { key: "grid-{i}",
                    line { x1: "{chart.margin_left}", y1: "{y}", x2: "{grid_right}", y2: "{y}", stroke: "{chart.grid_color}", stroke_width: "1" }
                    text { x: "{label_x}", y: "{y}", font_size: "10", text_anchor: "end", "{label}" }
                }
            }
            for y in zero_y.iter() {
                line { x1: "{chart.margin_left}", y1: "{y}", x2: "{grid_right}", y2: "{y}", stroke: "#999999", stroke_dasharray: "4 3" }
            }
            for (i, points) in macd_lines.iter().enumerate() {
                polyline { key: "macd-{i}", points: "{points}", fill: "none", stroke: "{chart.macd_color}", stroke_width: "{chart.line_width}" }
            }
            for (i, points) in signal_lines.iter().enumerate() {
                polyline { key: "signal-{i}", points: "{points}", fill: "none", stroke: "{chart.signal_color}", stroke_width: "{chart.line_width}" }
            }
            for (i, (x, y, color, glyph)) in marker_views.iter().enumerate() {
                text {
                    key: "marker-{i}", x: "{x}", y: "{y}", fill: "{color}",
                    font_size: "{marker_font}", text_anchor: "middle",
                    "{glyph}"
                }
            }
            for (i, (x, label)) in date_labels.iter().enumerate() {
                text { key: "date-{i}", x: "{x}", y: "{date_y}", font_size: "10", text_anchor: "middle", "{label}" }
            }
        }
    }
}
