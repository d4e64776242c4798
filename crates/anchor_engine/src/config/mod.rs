//! Configuration persistence
//!
//! Any serde type with a `Default` can be stored as TOML or RON; the format
//! is chosen from the file extension.

use std::path::Path;

pub use serde::{Serialize, Deserialize};

/// On-disk configuration formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Pick the format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn parse<T: for<'de> Deserialize<'de>>(self, contents: &str) -> Result<T, ConfigError> {
        match self {
            Self::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Self::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    fn render<T: Serialize>(self, value: &T) -> Result<String, ConfigError> {
        match self {
            Self::Toml => toml::to_string_pretty(value).map_err(|e| ConfigError::Serialize(e.to_string())),
            Self::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }
}

/// Serde-backed configuration that can be loaded from and saved to disk
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Read and parse a configuration file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = ConfigFormat::from_path(path)?.parse(&contents)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse text in the format implied by `path`
    fn from_str_with_format(contents: &str, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigFormat::from_path(path.as_ref())?.parse(contents)
    }

    /// Render to text in the format implied by `path`
    fn to_string_with_format(&self, path: impl AsRef<Path>) -> Result<String, ConfigError> {
        ConfigFormat::from_path(path.as_ref())?.render(self)
    }

    /// Write the configuration to `path`
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_string_with_format(path)?)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The text is not valid for its format
    #[error("Parse error: {0}")]
    Parse(String),

    /// The value could not be rendered
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Neither `.toml` nor `.ron`
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is outside its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
