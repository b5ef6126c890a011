// Two stacked panels sharing the x axis: prices on top, MACD below.
#![allow(non_snake_case)]
use dioxus::prelude::*;
use shared::models::EnrichedSeries;

use crate::config::{ChartConfig, MovingAverageStyle};

pub mod candlestick;
pub mod indicators;
pub mod layout;

use candlestick::CandlestickChart;
use indicators::MacdChart;

#[component]
pub fn Chart(series: EnrichedSeries, chart: ChartConfig, moving_averages: Vec<MovingAverageStyle>) -> Element {
    let legend: Vec<(String, String)> = moving_averages
        .iter()
        .map(|ma| (format!("MA{} days", ma.period), ma.color.clone()))
        .chain([
            ("MACD".to_string(), chart.macd_color.clone()),
            ("Signal Line".to_string(), chart.signal_color.clone()),
            ("▲ Bullish crossover".to_string(), chart.bullish_marker_color.clone()),
            ("▼ Bearish crossover".to_string(), chart.bearish_marker_color.clone()),
        ])
        .collect();
    let caption = format!("In the above graph, we use {}.", series.policy.caption());

    rsx! {
        div {
            class: "chart",
            CandlestickChart { series: series.clone(), chart: chart.clone(), moving_averages: moving_averages.clone() }
            MacdChart { series: series.clone(), chart: chart.clone() }
            div {
                class: "chart-legend",
                style: "display: flex; flex-wrap: wrap; gap: 12px; font-size: 12px; margin-top: 6px;",
                for (label, color) in legend.iter() {
                    span { key: "{label}", style: "color: {color};", "{label}" }
                }
            }
            p { class: "chart-caption", style: "font-size: 12px; font-style: italic;", "{caption}" }
        }
    }
}
