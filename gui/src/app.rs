#![allow(non_snake_case)]
use dioxus::prelude::*;

use crate::components::chart::Chart;
use crate::components::controls::Controls;
use crate::components::fundamentals::FundamentalsPanel;
use crate::config::theme::ThemePalette;
use crate::config::AppConfig;
use crate::services::engine_client::EngineClient;
use crate::state::app_state::{DashboardForm, DashboardView};

#[component]
pub fn App() -> Element {
    let config = use_context::<AppConfig>();
    let palette = ThemePalette::from_name(&config.app.theme);
    let form_config = config.clone();
    let form = use_signal(move || DashboardForm::from_config(&form_config, chrono::Local::now().date_naive()));
    let mut view = use_signal(|| DashboardView::Idle);

    let endpoint = config.engine.endpoint();
    let submit = move |_| {
        let request = match form.read().to_request() {
            Ok(request) => request,
            Err(e) => {
                view.set(DashboardView::Error(format!("{:#}", e)));
                return;
            }
        };
        view.set(DashboardView::Loading);
        let endpoint = endpoint.clone();
        spawn(async move {
            let next = match EngineClient::connect(endpoint).await {
                Ok(client) => client.dashboard(&request).await,
                Err(e) => {
                    tracing::error!(error_detail = ?e, "Engine connection failed");
                    DashboardView::Error(format!("{:#}", e))
                }
            };
            view.set(next);
        });
    };

    let page_style = palette.page_style();
    let sidebar_style = format!(
        "width: 300px; padding: 16px; background-color: {}; border-right: 1px solid {};",
        palette.sidebar, palette.border
    );
    let notice_style = format!("padding: 8px 12px; border-radius: 4px; background-color: {};", palette.success_background);
    let warning_style = format!("padding: 8px 12px; border-radius: 4px; background-color: {};", palette.warning_background);
    let error_style = format!("color: {};", palette.error_foreground);
    let description = form.read().params.policy.description();
    let busy = matches!(*view.read(), DashboardView::Loading);
    let current = view.read().clone();

    rsx! {
        div {
            style: "{page_style}",
            div {
                style: "{sidebar_style}",
                Controls { form, on_submit: submit, busy }
            }
            div {
                style: "flex: 1; padding: 16px; overflow: auto;",
                h1 { "{config.app.title}" }
                p { style: "{notice_style}", "{description}" }
                match current {
                    DashboardView::Idle => rsx! {},
                    DashboardView::Loading => rsx! { p { "Fetching data..." } },
                    DashboardView::Error(message) => rsx! { p { style: "{error_style}", "{message}" } },
                    DashboardView::NoData { message, fundamentals } => rsx! {
                        p { style: "{error_style}", "{message}" }
                        FundamentalsPanel { view: fundamentals }
                    },
                    DashboardView::Ready { series, notice, fundamentals } => rsx! {
                        for text in notice.iter() {
                            p { style: "{warning_style}", "{text}" }
                        }
                        Chart {
                            series,
                            chart: config.chart.clone(),
                            moving_averages: config.moving_averages.clone(),
                        }
                        FundamentalsPanel { view: fundamentals }
                    },
                }
            }
        }
    }
}
