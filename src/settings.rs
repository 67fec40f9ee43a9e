//! Configuration management for gaussnbo.
//!
//! Settings are read from INI files with the following precedence:
//!
//! 1. Local configuration (`./gaussnbo_config.cfg`)
//! 2. User configuration (`~/.config/gaussnbo/gaussnbo_config.cfg`)
//! 3. System configuration (`/etc/gaussnbo/gaussnbo_config.cfg`)
//! 4. Built-in defaults
//!
//! Each file only overrides the keys it sets.
//!
//! # Configuration File Format
//!
//! ```ini
//! [logging]
//! level = info
//!
//! [export]
//! pretty = true
//! output_dir =
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use gaussnbo::settings::SettingsManager;
//!
//! let settings = SettingsManager::load().unwrap();
//! println!("Pretty JSON: {}", settings.export().pretty);
//! ```

use configparser::ini::Ini;
use log::{debug, info, warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file in every search location.
pub const CONFIG_FILE_NAME: &str = "gaussnbo_config.cfg";

/// Errors that can occur during configuration loading and processing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error when reading configuration files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// INI parsing error
    #[error("INI parsing error: {0}")]
    IniParse(String),
    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Main configuration structure containing all program settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    /// Logging configuration
    pub logging: LoggingSettings,
    /// JSON export configuration
    pub export: ExportSettings,
}

/// Logging configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level (default: "info")
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingSettings {
    /// Log level as a filter, `Info` when the configured name is unknown.
    pub fn level_filter(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::Info)
    }
}

/// JSON export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportSettings {
    /// Indent the JSON output (default: true)
    pub pretty: bool,
    /// Directory for exported files; next to the log when unset
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            pretty: true,
            output_dir: None,
        }
    }
}

/// Configuration manager that handles loading and accessing program settings.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings: Settings,
    config_source: String,
}

impl SettingsManager {
    /// Loads configuration from the available configuration files.
    ///
    /// Files that exist but cannot be read or parsed are reported with a
    /// warning and skipped.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Settings::default();
        let mut config_source = "built-in defaults".to_string();

        let candidates = [
            ("system", Self::get_system_config_path()),
            ("user", Self::get_user_config_path()),
            ("local", Some(PathBuf::from(CONFIG_FILE_NAME))),
        ];
        for (scope, path) in candidates {
            let Some(path) = path.filter(|p| p.exists()) else {
                continue;
            };
            match Self::apply_file(&mut settings, &path) {
                Ok(()) => {
                    config_source = format!("{} config ({})", scope, path.display());
                    debug!("Loaded {} configuration from: {}", scope, path.display());
                }
                Err(e) => warn!("Failed to load {} config from {}: {}", scope, path.display(), e),
            }
        }

        Ok(Self {
            settings,
            config_source,
        })
    }

    /// Loads a single configuration file on top of the built-in defaults.
    ///
    /// Unlike [`SettingsManager::load`], read and parse failures are returned.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut settings = Settings::default();
        Self::apply_file(&mut settings, path)?;
        Ok(Self {
            settings,
            config_source: format!("file ({})", path.display()),
        })
    }

    /// Returns the source of the loaded configuration.
    pub fn config_source(&self) -> &str {
        &self.config_source
    }

    /// Gets a reference to the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Gets the logging settings.
    pub fn logging(&self) -> &LoggingSettings {
        &self.settings.logging
    }

    /// Gets the export settings.
    pub fn export(&self) -> &ExportSettings {
        &self.settings.export
    }

    /// Reads one INI file and overrides the keys it sets.
    fn apply_file(settings: &mut Settings, path: &Path) -> Result<(), ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut ini = Ini::new();
        ini.read(content)
            .map_err(|e| ConfigError::IniParse(format!("Failed to parse INI: {}", e)))?;

        if let Some(logging_map) = ini.get_map_ref().get("logging") {
            Self::parse_logging(logging_map, &mut settings.logging)?;
        }
        if let Some(export_map) = ini.get_map_ref().get("export") {
            Self::parse_export(export_map, &mut settings.export)?;
        }
        Ok(())
    }

    /// Parses the logging section from INI configuration.
    fn parse_logging(
        section: &HashMap<String, Option<String>>,
        logging: &mut LoggingSettings,
    ) -> Result<(), ConfigError> {
        if let Some(Some(level)) = section.get("level") {
            let level = level.trim().to_lowercase();
            if level.parse::<LevelFilter>().is_err() {
                return Err(ConfigError::InvalidValue(format!("Invalid log level: {}", level)));
            }
            logging.level = level;
        }
        Ok(())
    }

    /// Parses the export section from INI configuration.
    fn parse_export(
        section: &HashMap<String, Option<String>>,
        export: &mut ExportSettings,
    ) -> Result<(), ConfigError> {
        if let Some(Some(pretty)) = section.get("pretty") {
            export.pretty = pretty.trim().parse().map_err(|_| {
                ConfigError::InvalidValue(format!("Invalid pretty value: {}", pretty))
            })?;
        }
        if let Some(output_dir) = section.get("output_dir") {
            export.output_dir = output_dir
                .as_deref()
                .map(str::trim)
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from);
        }
        Ok(())
    }

    /// Gets the system configuration file path.
    fn get_system_config_path() -> Option<PathBuf> {
        #[cfg(unix)]
        {
            Some(PathBuf::from("/etc/gaussnbo").join(CONFIG_FILE_NAME))
        }
        #[cfg(windows)]
        {
            std::env::var("PROGRAMDATA")
                .ok()
                .map(|pd| PathBuf::from(pd).join("gaussnbo").join(CONFIG_FILE_NAME))
        }
    }

    /// Gets the user configuration file path.
    fn get_user_config_path() -> Option<PathBuf> {
        #[cfg(unix)]
        {
            std::env::var("HOME").ok().map(|home| {
                PathBuf::from(home)
                    .join(".config")
                    .join("gaussnbo")
                    .join(CONFIG_FILE_NAME)
            })
        }
        #[cfg(windows)]
        {
            std::env::var("APPDATA")
                .ok()
                .map(|appdata| PathBuf::from(appdata).join("gaussnbo").join(CONFIG_FILE_NAME))
        }
    }
}

impl SettingsManager {
    /// Creates a commented configuration file with every option at its default.
    ///
    /// # Arguments
    ///
    /// * `path` - Path where the configuration file should be created
    pub fn create_template(path: &Path) -> Result<(), ConfigError> {
        fs::write(path, Self::generate_template_content())?;
        info!("Created settings template at: {}", path.display());
        Ok(())
    }

    /// Generates the content of a configuration template.
    fn generate_template_content() -> String {
        format!(
            r#"# gaussnbo Configuration File
#
# Configuration files are loaded in hierarchical order with local settings taking precedence:
#
# 1. Current working directory (./{name}) - highest priority
# 2. User config directory (~/.config/gaussnbo/{name})
# 3. System config directory (/etc/gaussnbo/{name})
# 4. Built-in defaults (fallback)
#
# Any missing sections or values use the built-in defaults shown below.

[logging]
# Log level: off, error, warn, info, debug, trace (default: info)
# RUST_LOG overrides this value.
level = {level}

[export]
# Indent the JSON output (default: true)
pretty = {pretty}

# Directory for exported JSON files (default: next to the log)
output_dir =
"#,
            name = CONFIG_FILE_NAME,
            level = LoggingSettings::default().level,
            pretty = ExportSettings::default().pretty,
        )
    }
}
