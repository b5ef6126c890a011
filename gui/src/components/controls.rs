// Sidebar: ticker, date range, MACD windows, thresholds and rescaling policy.
#![allow(non_snake_case)]
use dioxus::prelude::*;
use shared::models::RescalingPolicy;

use crate::config::{AppConfig, ThresholdRange, WindowRange};
use crate::services::engine_client::EngineClient;
use crate::state::app_state::DashboardForm;

#[component]
pub fn Controls(form: Signal<DashboardForm>, on_submit: EventHandler<()>, busy: bool) -> Element {
    let mut form = form;
    let current = form.read().clone();
    let ranges = current.ranges;
    let params = current.params.clone();

    rsx! {
        div {
            class: "controls",
            style: "display: flex; flex-direction: column; gap: 10px;",
            label { "Enter a stock ticker:" }
            input {
                r#type: "text",
                value: "{current.ticker}",
                oninput: move |evt| form.write().ticker = evt.value(),
            }
            label { "Start Date" }
            input {
                r#type: "date",
                value: "{current.start_date}",
                oninput: move |evt| form.write().start_date = evt.value(),
            }
            label { "End Date" }
            input {
                r#type: "date",
                value: "{current.end_date}",
                oninput: move |evt| form.write().end_date = evt.value(),
            }

            p { style: "font-weight: bold; margin-bottom: 0;", "Please select your own parameters." }
            WindowSlider {
                label: "Select the short-term window",
                value: params.short_window,
                range: ranges.short_window,
                on_change: move |v| form.write().params.short_window = v,
            }
            WindowSlider {
                label: "Select the long-term window",
                value: params.long_window,
                range: ranges.long_window,
                on_change: move |v| form.write().params.long_window = v,
            }
            WindowSlider {
                label: "Select the signal window",
                value: params.signal_window,
                range: ranges.signal_window,
                on_change: move |v| form.write().params.signal_window = v,
            }
            ThresholdSlider {
                label: "Bearish threshold",
                value: params.bearish_threshold,
                range: ranges.threshold,
                on_change: move |v| form.write().params.bearish_threshold = v,
            }
            ThresholdSlider {
                label: "Bullish threshold",
                value: params.bullish_threshold,
                range: ranges.threshold,
                on_change: move |v| form.write().params.bullish_threshold = v,
            }

            label { "Choose a type" }
            select {
                onchange: move |evt| {
                    match evt.value().parse::<RescalingPolicy>() {
                        Ok(policy) => form.write().params.policy = policy,
                        Err(e) => tracing::warn!(error_detail = %e, "Ignoring unknown policy selection"),
                    }
                },
                for policy in RescalingPolicy::ALL {
                    option {
                        key: "{policy.label()}",
                        value: "{policy.label()}",
                        selected: policy == params.policy,
                        "{policy.label()}"
                    }
                }
            }

            button {
                disabled: busy,
                onclick: move |_| on_submit.call(()),
                if busy { "Loading..." } else { "Submit" }
            }

            CsvImport {}
        }
    }
}

#[component]
fn WindowSlider(#[props(into)] label: String, value: usize, range: WindowRange, on_change: EventHandler<usize>) -> Element {
    rsx! {
        div {
            class: "slider",
            label { "{label}: {value}" }
            input {
                r#type: "range",
                min: "{range.min}",
                max: "{range.max}",
                step: "1",
                value: "{value}",
                style: "width: 100%;",
                oninput: move |evt| {
                    if let Ok(v) = evt.value().parse::<usize>() {
                        on_change.call(v);
                    }
                },
            }
        }
    }
}

#[component]
fn ThresholdSlider(#[props(into)] label: String, value: f64, range: ThresholdRange, on_change: EventHandler<f64>) -> Element {
    rsx! {
        div {
            class: "slider",
            label { "{label}: {value}" }
            input {
                r#type: "range",
                min: "{range.min}",
                max: "{range.max}",
                step: "1",
                value: "{value}",
                style: "width: 100%;",
                oninput: move |evt| {
                    if let Ok(v) = evt.value().parse::<f64>() {
                        on_change.call(v);
                    }
                },
            }
        }
    }
}

/// Pushes a local CSV file into the engine's in-memory store.
#[component]
fn CsvImport() -> Element {
    let config = use_context::<AppConfig>();
    let mut path = use_signal(String::new);
    let mut ticker = use_signal(String::new);
    let mut status = use_signal(|| None::<String>);

    let status_text = status.read().clone();

    let load = move |_| {
        let endpoint = config.engine.endpoint();
        let file_path = path.read().trim().to_string();
        let symbol = ticker.read().clone();
        spawn(async move {
            let outcome = match EngineClient::connect(endpoint).await {
                Ok(client) => client.load_csv(file_path, symbol).await,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(message) => status.set(Some(message)),
                Err(e) => {
                    tracing::error!(error_detail = ?e, "CSV import failed");
                    status.set(Some(format!("{:#}", e)));
                }
            }
        });
    };

    rsx! {
        details {
            summary { "Import CSV" }
            div {
                style: "display: flex; flex-direction: column; gap: 6px; margin-top: 6px;",
                input {
                    r#type: "text",
                    placeholder: "Path to CSV file",
                    value: "{path}",
                    oninput: move |evt| path.set(evt.value()),
                }
                input {
                    r#type: "text",
                    placeholder: "Ticker",
                    value: "{ticker}",
                    oninput: move |evt| ticker.set(evt.value()),
                }
                button { onclick: load, "Load CSV" }
                for message in status_text.iter() {
                    small { "{message}" }
                }
            }
        }
    }
}
