use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid {name} window {value}: EMA windows must be at least 2")]
    InvalidWindow { name: &'static str, value: usize },

    #[error("Degenerate series: '{column}' has zero variance and cannot be standardized")]
    DegenerateSeries { column: &'static str },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal processing error: {0}")]
    ProcessingError(String),
}

impl EngineError {
    /// Converts a parser failure, keeping file-system errors apart from
    /// malformed content.
    pub fn from_parser(err: anyhow::Error) -> Self {
        let message = format!("{:#}", err);
        match err.downcast_ref::<std::io::Error>() {
            Some(io) => EngineError::IoError {
                source: std::io::Error::new(io.kind(), message),
            },
            None => EngineError::CsvDataFormatError(message),
        }
    }
}

impl From<EngineError> for tonic::Status {
    fn from(err: EngineError) -> Self {
        tracing::error!("Mapping EngineError to tonic::Status: {:?}", err);
        match err {
            EngineError::ConfigError(msg) => tonic::Status::failed_precondition(format!("Configuration error: {}", msg)),
            e @ EngineError::InvalidWindow { .. } => tonic::Status::invalid_argument(e.to_string()),
            e @ EngineError::DegenerateSeries { .. } => tonic::Status::failed_precondition(e.to_string()),
            EngineError::IoError { source } => tonic::Status::internal(format!("I/O error: {}", source)),
            EngineError::JsonError { source } => tonic::Status::internal(format!("JSON error: {}", source)),
            EngineError::CsvDataFormatError(msg) => tonic::Status::invalid_argument(format!("CSV data format error: {}", msg)),
            EngineError::InvalidRequest(msg) => tonic::Status::invalid_argument(msg),
            EngineError::ProcessingError(msg) => tonic::Status::internal(format!("Processing error: {}", msg)),
        }
    }
}
