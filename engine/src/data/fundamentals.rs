// Financial statement tables: one CSV per statement, line items as rows and
// reporting periods as columns.
//
// ,2023-09-30,2022-09-30,2021-09-30
// Total Revenue,383285000000,394328000000,365817000000
// Net Income,96995000000,,94680000000
use super::csv_parser::parse_quote;
use anyhow::{anyhow, Result};
use csv::ReaderBuilder;
use shared::models::{FinancialStatement, StatementRow};
use std::io::Read;

pub const INCOME_STATEMENT: &str = "Income Statement";
pub const BALANCE_SHEET: &str = "Balance Sheet";
pub const CASH_FLOW: &str = "Cash Flow";

pub struct StatementCsvParser;

impl StatementCsvParser {
    pub fn parse_statement<R: Read>(name: &str, reader: R) -> Result<FinancialStatement> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let periods: Vec<String> = rdr.headers()?.iter().skip(1).map(str::to_string).collect();
        let mut rows = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result.map_err(|e| anyhow!("Error reading {} record at line {}: {}", name, line, e))?;
            let label = record.get(0).unwrap_or_default().to_string();

            let values = record
                .iter()
                .skip(1)
                .map(|cell| {
                    parse_quote(cell)
                        .map(|v| Some(v).filter(|v| !v.is_nan()))
                        .map_err(|e| anyhow!("Error parsing '{}' at line {}: {}", label, line, e))
                })
                .collect::<Result<Vec<_>>>()?;

            rows.push(StatementRow { label, values });
        }

        Ok(FinancialStatement {
            name: name.to_string(),
            periods,
            rows,
        })
    }
}
