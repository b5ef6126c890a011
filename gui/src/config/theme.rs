// Page colours for the dashboard shell; chart colours come from ChartConfig.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemePalette {
    pub background: String,
    pub foreground: String,
    pub sidebar: String,
    pub border: String,
    pub primary: String,
    pub success_background: String,
    pub warning_background: String,
    pub error_foreground: String,
}

impl ThemePalette {
    pub fn default_dark() -> Self {
        Self {
            background: "#1e1e1e".to_string(),
            foreground: "#d1d4dc".to_string(),
            sidebar: "#252526".to_string(),
            border: "#3c3c3c".to_string(),
            primary: "#007acc".to_string(),
            success_background: "#1e3a2a".to_string(),
            warning_background: "#3d3416".to_string(),
            error_foreground: "#ef5350".to_string(),
        }
    }

    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            foreground: "#262730".to_string(),
            sidebar: "#f0f2f6".to_string(),
            border: "#d6d6d6".to_string(),
            primary: "#ff4b4b".to_string(),
            success_background: "#dff0d8".to_string(),
            warning_background: "#fff3cd".to_string(),
            error_foreground: "#c62828".to_string(),
        }
    }

    /// Unknown names fall back to the light palette.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "dark" => Self::default_dark(),
            _ => Self::default_light(),
        }
    }

    /// Root style attribute for the page.
    pub fn page_style(&self) -> String {
        format!(
            "background-color: {}; color: {}; font-family: sans-serif; display: flex; min-height: 100vh; margin: 0;",
            self.background, self.foreground
        )
    }
}
