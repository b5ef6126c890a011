use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use shared::models::PriceBar;
use shared::utils::parse_iso_date;
use std::fs::File;
use std::io::{BufReader, Read};

// Daily price export, comma-delimited with a header row:
// Date,Open,High,Low,Close,Adj Close,Volume
// 2020-01-02,74.059998,75.150002,73.797501,75.087502,73.449394,135480400
//
// "Adj Close" is ignored. Missing quotes ("null" or empty) become NaN, which
// the indicator engine treats as undefined.
pub struct PriceCsvParser;

impl PriceCsvParser {
    pub fn load_bars_from_csv(file_path: &str) -> Result<Vec<PriceBar>> {
        let file = File::open(file_path).with_context(|| format!("Failed to open CSV file '{}'", file_path))?;
        Self::parse_bars(BufReader::new(file))
    }

    pub fn parse_bars<R: Read>(reader: R) -> Result<Vec<PriceBar>> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut bars = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result.map_err(|e| anyhow!("Error reading CSV record at line {}: {}", line, e))?;

            let date_str = Self::required_field(&record, &headers, "Date", line)?;
            let date = parse_iso_date(date_str).map_err(|e| anyhow!("Error parsing 'Date' at line {}: {}", line, e))?;

            let open = Self::price_field(&record, &headers, "Open", line)?;
            let high = Self::price_field(&record, &headers, "High", line)?;
            let low = Self::price_field(&record, &headers, "Low", line)?;
            let close = Self::price_field(&record, &headers, "Close", line)?;
            let volume = Self::price_field(&record, &headers, "Volume", line)?;

            bars.push(PriceBar {
                date,
                open,
                high,
                low,
                close,
                volume: if volume.is_nan() { 0.0 } else { volume },
            });
        }

        Ok(normalize_bars(bars))
    }

    fn price_field(record: &StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<f64> {
        let raw = Self::required_field(record, headers, name, line)?;
        parse_quote(raw).map_err(|e| anyhow!("Error parsing '{}' at line {}: {}", name, line, e))
    }

    fn required_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<&'a str> {
        Self::get_field(record, headers, name)
            .ok_or_else(|| anyhow!("Missing '{}' field in CSV record at line {}", name, line))
    }

    // Columns are looked up by header name so reordered exports still load.
    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
    }
}

pub fn parse_quote(s: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    s.parse::<f64>().map_err(|e| anyhow!("Failed to parse number '{}': {}", s, e))
}

/// Sorts by date and keeps the first bar of each date.
pub fn normalize_bars(mut bars: Vec<PriceBar>) -> Vec<PriceBar> {
    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);
    bars
}
