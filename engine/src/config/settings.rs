// Engine settings, loaded from a JSON file named by ENGINE_CONFIG
use crate::error::EngineError;
use crate::indicators::validate_windows;
use serde::Deserialize;
use shared::models::AnalysisParams;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "ENGINE_CONFIG";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub host: String,
    pub port: u16,
    /// Directory holding `<TICKER>.csv` price files and `<TICKER>/` statement folders.
    pub data_dir: PathBuf,
    /// Used when RUST_LOG is not set.
    pub log_level: String,
    /// Applied by the GUI on startup; the engine checks the windows when loading.
    pub defaults: AnalysisParams,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            host: "127.0.0.1".to_string(),
            port: 50051,
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            defaults: AnalysisParams::default(),
        }
    }
}

impl EngineSettings {
    /// Reads the file named by `ENGINE_CONFIG`, or returns the defaults when
    /// the variable is unset.
    pub fn load() -> Result<Self, EngineError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load_from(Path::new(&path)),
            None => {
                tracing::debug!("{} not set, using default engine settings", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::ConfigError(format!("Cannot read '{}': {}", path.display(), e)))?;
        let settings: EngineSettings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        validate_windows(self.defaults.short_window, self.defaults.long_window, self.defaults.signal_window)
            .map_err(|e| EngineError::ConfigError(format!("Invalid default analysis parameters: {}", e)))
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
