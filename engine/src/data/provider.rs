//! Where price bars and financial statements come from.
//!
//! The analysis pipeline only sees [`PriceSeries`] and [`Fundamentals`]
//! values; these traits are the seam between it and the storage backend.

use super::csv_parser::PriceCsvParser;
use super::fundamentals::{StatementCsvParser, BALANCE_SHEET, CASH_FLOW, INCOME_STATEMENT};
use crate::error::EngineError;
use chrono::NaiveDate;
use shared::models::{FinancialStatement, Fundamentals, PriceSeries};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

pub trait PriceSeriesProvider: Send + Sync {
    /// Daily bars in `[start, end]` (inclusive, either end open). An unknown
    /// ticker yields an empty series, not an error.
    fn price_series(&self, ticker: &str, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<PriceSeries, EngineError>;
}

pub trait FundamentalsProvider: Send + Sync {
    fn fundamentals(&self, ticker: &str) -> Result<Fundamentals, EngineError>;
}

const STATEMENT_FILES: [(&str, &str); 3] = [
    (INCOME_STATEMENT, "income_stmt.csv"),
    (BALANCE_SHEET, "balance_sheet.csv"),
    (CASH_FLOW, "cashflow.csv"),
];

/// Reads `<data_dir>/<TICKER>.csv` for prices and
/// `<data_dir>/<TICKER>/{income_stmt,balance_sheet,cashflow}.csv` for
/// fundamentals.
#[derive(Debug, Clone)]
pub struct CsvDataDirectory {
    root: PathBuf,
}

impl CsvDataDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CsvDataDirectory { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn price_file(&self, ticker: &str) -> PathBuf {
        self.root.join(format!("{}.csv", ticker))
    }

    fn statement(&self, ticker: &str, name: &str, file_name: &str) -> Result<FinancialStatement, EngineError> {
        let path = self.root.join(ticker).join(file_name);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(ticker = %ticker, path = %path.display(), "Statement file not found, using an empty table");
                return Ok(FinancialStatement::empty(name));
            }
            Err(e) => return Err(e.into()),
        };
        StatementCsvParser::parse_statement(name, BufReader::new(file))
            .map_err(|e| EngineError::CsvDataFormatError(format!("{}: {:#}", path.display(), e)))
    }
}

impl PriceSeriesProvider for CsvDataDirectory {
    fn price_series(&self, ticker: &str, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<PriceSeries, EngineError> {
        let path = self.price_file(ticker);
        if !path.is_file() {
            tracing::debug!(ticker = %ticker, path = %path.display(), "Price file not found");
            return Ok(PriceSeries::empty(ticker));
        }

        let path_str = path.to_string_lossy();
        let bars = PriceCsvParser::load_bars_from_csv(&path_str)
            .map_err(EngineError::from_parser)?
            .into_iter()
            .filter(|b| start.map_or(true, |s| b.date >= s))
            .filter(|b| end.map_or(true, |e| b.date <= e))
            .collect();

        Ok(PriceSeries::new(ticker, bars))
    }
}

impl FundamentalsProvider for CsvDataDirectory {
    fn fundamentals(&self, ticker: &str) -> Result<Fundamentals, EngineError> {
        let [income, balance, cash] = STATEMENT_FILES;
        Ok(Fundamentals {
            income_statement: self.statement(ticker, income.0, income.1)?,
            balance_sheet: self.statement(ticker, balance.0, balance.1)?,
            cash_flow: self.statement(ticker, cash.0, cash.1)?,
        })
    }
}
