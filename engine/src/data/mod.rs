pub mod csv_parser;
pub mod fundamentals;
pub mod market_data;
pub mod provider;

pub use market_data::MarketDataStore;
pub use provider::{CsvDataDirectory, FundamentalsProvider, PriceSeriesProvider};
