// Date helpers shared by the engine (wire/CSV parsing) and the GUI (form inputs).
use anyhow::{anyhow, Result};
use chrono::NaiveDate;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE_FORMAT)
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", s, e))
}

/// Empty input means "unbounded".
pub fn parse_optional_date(s: &str) -> Result<Option<NaiveDate>> {
    if s.trim().is_empty() {
        Ok(None)
    } else {
        parse_iso_date(s).map(Some)
    }
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}
