// Fundamentals viewer: the three statements side by side, one row per period.
#![allow(non_snake_case)]
use dioxus::prelude::*;
use shared::models::Fundamentals;

use crate::state::app_state::{FundamentalsView, NO_FUNDAMENTALS_MESSAGE};

/// Statements concatenated then transposed: columns are line items, rows
/// are reporting periods in order of first appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct TransposedTable {
    pub columns: Vec<String>,
    pub rows: Vec<(String, Vec<Option<f64>>)>,
}

pub fn transpose_statements(fundamentals: &Fundamentals) -> TransposedTable {
    let mut periods: Vec<String> = Vec::new();
    for statement in fundamentals.statements() {
        for period in &statement.periods {
            if !periods.contains(period) {
                periods.push(period.clone());
            }
        }
    }

    let mut columns = Vec::new();
    let mut cells: Vec<Vec<Option<f64>>> = vec![Vec::new(); periods.len()];
    for statement in fundamentals.statements() {
        for row in &statement.rows {
            columns.push(row.label.clone());
            for (p, period) in periods.iter().enumerate() {
                let value = statement
                    .periods
                    .iter()
                    .position(|candidate| candidate == period)
                    .and_then(|k| row.values.get(k).copied().flatten());
                cells[p].push(value);
            }
        }
    }

    TransposedTable { columns, rows: periods.into_iter().zip(cells).collect() }
}

pub fn format_cell(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{:.0}", v),
        Some(v) => format!("{:.4}", v),
        None => String::new(),
    }
}

#[component]
pub fn FundamentalsPanel(view: FundamentalsView) -> Element {
    let mut expanded = use_signal(|| false);
    let arrow = if expanded() { "▾" } else { "▸" };

    rsx! {
        div {
            class: "fundamentals",
            style: "margin-top: 16px; border: 1px solid #d6d6d6; border-radius: 4px;",
            div {
                style: "padding: 8px; cursor: pointer; font-weight: bold;",
                onclick: move |_| expanded.toggle(),
                "{arrow} View Fundamentals Data"
            }
            if expanded() {
                div {
                    style: "padding: 8px; overflow: auto; max-height: 480px;",
                    match &view {
                        FundamentalsView::Available(fundamentals) => rsx! { StatementTable { table: transpose_statements(fundamentals) } },
                        FundamentalsView::Empty => rsx! { p { "{NO_FUNDAMENTALS_MESSAGE}" } },
                        FundamentalsView::Failed(message) => rsx! { p { style: "color: #c62828;", "{message}" } },
                    }
                }
            }
        }
    }
}

#[component]
fn StatementTable(table: TransposedTable) -> Element {
    rsx! {
        table {
            style: "border-collapse: collapse; font-size: 12px;",
            thead {
                tr {
                    th { style: "text-align: left; padding: 4px;", "date" }
                    for (i, column) in table.columns.iter().enumerate() {
                        th { key: "col-{i}", style: "text-align: right; padding: 4px;", "{column}" }
                    }
                }
            }
            tbody {
                for (period, values) in table.rows.iter() {
                    tr { key: "{period}",
                        td { style: "padding: 4px;", "{period}" }
                        for (i, value) in values.iter().enumerate() {
                            td { key: "cell-{i}", style: "text-align: right; padding: 4px;", {format_cell(*value)} }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{FinancialStatement, StatementRow};

    fn statement(name: &str, periods: &[&str], rows: &[(&str, Vec<Option<f64>>)]) -> FinancialStatement {
        FinancialStatement {
            name: name.to_string(),
            periods: periods.iter().map(|p| p.to_string()).collect(),
            rows: rows
                .iter()
                .map(|(label, values)| StatementRow { label: label.to_string(), values: values.clone() })
                .collect(),
        }
    }

    #[test]
    fn test_transpose_aligns_periods_across_statements() {
        let fundamentals = Fundamentals {
            income_statement: statement("Income Statement", &["2023", "2022"], &[("Revenue", vec![Some(10.0), Some(9.0)])]),
            balance_sheet: statement("Balance Sheet", &["2022", "2021"], &[("Assets", vec![Some(50.0), Some(40.0)])]),
            cash_flow: FinancialStatement::empty("Cash Flow"),
        };
        let table = transpose_statements(&fundamentals);
        assert_eq!(table.columns, vec!["Revenue", "Assets"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], ("2023".to_string(), vec![Some(10.0), None]));
        assert_eq!(table.rows[1], ("2022".to_string(), vec![Some(9.0), Some(50.0)]));
        assert_eq!(table.rows[2], ("2021".to_string(), vec![None, Some(40.0)]));
    }

    #[test]
    fn test_transpose_empty() {
        let table = transpose_statements(&Fundamentals::default());
        assert!(table.columns.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(Some(383285000000.0)), "383285000000");
        assert_eq!(format_cell(Some(0.25)), "0.2500");
        assert_eq!(format_cell(None), "");
    }
}
