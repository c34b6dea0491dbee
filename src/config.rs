use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Log level for debug logging to file.
///
/// `DEBUG_LEVEL` and the `--log-level` CLI flag take precedence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging (log file not created)
    #[default]
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

mod defaults {
    pub fn font_height() -> u32 {
        16
    }

    pub fn foreground() -> [u8; 4] {
        [229, 229, 229, 255] // Light gray
    }

    pub fn background() -> [u8; 4] {
        [30, 30, 30, 255] // Near black
    }

    pub fn columns() -> usize {
        80
    }
}

/// Rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Cell height in pixels
    #[serde(default = "defaults::font_height")]
    pub font_height: u32,

    /// Font family; `None` picks the system monospace font
    #[serde(default)]
    pub font_family: Option<String>,

    /// Text colour (RGBA)
    #[serde(default = "defaults::foreground")]
    pub foreground: [u8; 4],

    /// Canvas colour (RGBA)
    #[serde(default = "defaults::background")]
    pub background: [u8; 4],

    /// Columns per line before text wraps
    #[serde(default = "defaults::columns")]
    pub columns: usize,

    /// Log level when neither `--log-level` nor `DEBUG_LEVEL` is given
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font_height: defaults::font_height(),
            font_family: None,
            foreground: defaults::foreground(),
            background: defaults::background(),
            columns: defaults::columns(),
            log_level: None,
        }
    }
}

impl Config {
    /// Load the config from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load the config at `path`, falling back to defaults when it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Config path: {:?}", path);

        if !path.exists() {
            log::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = serde_yaml_ng::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as YAML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml_ng::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.font_height > 0, "font_height must be positive");
        anyhow::ensure!(self.columns > 0, "columns must be positive");
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path
    pub fn config_dir() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("cellglyph")
        } else {
            PathBuf::from(".")
        }
    }

    pub fn with_font_height(mut self, height: u32) -> Self {
        self.font_height = height;
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }
}
