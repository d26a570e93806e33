//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse JSON (and TOML) configuration files
//! - Validate required keys and their format
//! - Generate `TargetConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("config.json")).unwrap();
//! println!("Endpoint: {}", config.api_url);
//! ```

mod parser;
mod validator;

pub use contracts::TargetConfig;
pub use parser::ConfigFormat;

use contracts::TargetError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// `.toml` files are read as TOML, anything else as JSON.
    ///
    /// # Errors
    /// - File read failure
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<TargetConfig, TargetError> {
        let format = Self::detect_format(path);
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<TargetConfig, TargetError> {
        Self::parse_and_validate(content, format)
    }

    /// Validate the empty document used when no config file is given
    ///
    /// Always fails on the missing `api_url`; kept as a real load path so the
    /// error is reported exactly like for a file missing the key.
    pub fn empty() -> Result<TargetConfig, TargetError> {
        Self::parse_and_validate("{}", ConfigFormat::Json)
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> ConfigFormat {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(ConfigFormat::from_extension)
            .unwrap_or(ConfigFormat::Json)
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, TargetError> {
        std::fs::read_to_string(path).map_err(|e| TargetError::ConfigParse {
            message: format!("cannot read {}: {e}", path.display()),
            source: Some(Box::new(e)),
        })
    }

    /// Parse and validate configuration content
    fn parse_and_validate(content: &str, format: ConfigFormat) -> Result<TargetConfig, TargetError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }
}
