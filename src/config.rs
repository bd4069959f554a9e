use crate::model::document::HighlightTiming;
use crate::services::debounce::{DEFAULT_EDIT_DEBOUNCE_MS, DEFAULT_INITIAL_DELAY_MS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the config file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Color theme name ("dark" or "light")
    #[serde(default = "default_theme_name")]
    pub theme: String,

    /// Editor behavior settings
    #[serde(default)]
    pub editor: EditorConfig,
}

fn default_theme_name() -> String {
    "dark".to_string()
}

/// Editor behavior configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Number of spaces the Tab key inserts
    #[serde(default = "default_tab_size")]
    pub tab_size: usize,

    /// Show line numbers in the gutter
    #[serde(default = "default_true")]
    pub line_numbers: bool,

    /// Enable syntax highlighting
    #[serde(default = "default_true")]
    pub syntax_highlighting: bool,

    /// Run highlight passes on a background thread instead of the UI loop
    #[serde(default = "default_true")]
    pub background_highlighting: bool,

    /// Quiet period after the last edit before re-highlighting (milliseconds)
    #[serde(default = "default_highlight_debounce_ms")]
    pub highlight_debounce_ms: u64,

    /// Delay before a newly opened file is first highlighted (milliseconds)
    #[serde(default = "default_initial_highlight_delay_ms")]
    pub initial_highlight_delay_ms: u64,

    /// Lines scrolled per mouse wheel step
    #[serde(default = "default_mouse_scroll_lines")]
    pub mouse_scroll_lines: usize,
}

fn default_tab_size() -> usize {
    4
}

fn default_true() -> bool {
    true
}

fn default_highlight_debounce_ms() -> u64 {
    DEFAULT_EDIT_DEBOUNCE_MS
}

fn default_initial_highlight_delay_ms() -> u64 {
    DEFAULT_INITIAL_DELAY_MS
}

fn default_mouse_scroll_lines() -> usize {
    3
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_size: default_tab_size(),
            line_numbers: true,
            syntax_highlighting: true,
            background_highlighting: true,
            highlight_debounce_ms: default_highlight_debounce_ms(),
            initial_highlight_delay_ms: default_initial_highlight_delay_ms(),
            mouse_scroll_lines: default_mouse_scroll_lines(),
        }
    }
}

impl EditorConfig {
    /// Debounce settings handed to every document
    pub fn highlight_timing(&self) -> HighlightTiming {
        HighlightTiming {
            edit_delay: Duration::from_millis(self.highlight_debounce_ms),
            initial_delay: Duration::from_millis(self.initial_highlight_delay_ms),
            enabled: self.syntax_highlighting,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            editor: EditorConfig::default(),
        }
    }
}

impl Config {
    /// Default config directory (`<user config dir>/kode`)
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("kode"))
    }

    /// Load `config.json` from `config_dir`, falling back to defaults if it
    /// is missing or invalid
    pub fn load(config_dir: &Path) -> Self {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            return Self::default();
        }
        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    "Failed to load config from {}: {}, using defaults",
                    config_path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Load and validate configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.editor.tab_size == 0 {
            return Err(ConfigError::ValidationError(
                "tab_size must be greater than 0".to_string(),
            ));
        }
        if self.editor.highlight_debounce_ms > 60_000 {
            return Err(ConfigError::ValidationError(
                "highlight_debounce_ms must be <= 60000".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
