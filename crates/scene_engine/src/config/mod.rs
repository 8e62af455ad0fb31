//! Configuration system

use log::LevelFilter;
pub use serde::{Deserialize, Serialize};

use crate::foundation::{logging, time::DEFAULT_MAX_DELTA_TIME};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_str_with_format(path, &contents)
    }

    /// Parse configuration text, picking the format from `path`'s extension
    fn from_str_with_format(path: &str, contents: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Engine host configuration.
///
/// Window, renderer and resource settings belong to the collaborating
/// subsystems and are configured there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log level (`"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`)
    pub log_level: String,

    /// Largest delta time handed to a single frame, in seconds
    pub max_delta_time: f32,

    /// Scene created and activated during initialization
    pub initial_scene: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            max_delta_time: DEFAULT_MAX_DELTA_TIME,
            initial_scene: None,
        }
    }
}

impl EngineConfig {
    /// Parsed log level, `Info` for unknown names
    pub fn level_filter(&self) -> LevelFilter {
        logging::parse_level(&self.log_level)
    }
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.level_filter(), LevelFilter::Info);
        assert!(config.initial_scene.is_none());
        assert!((config.max_delta_time - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_toml_with_missing_fields() {
        let config = EngineConfig::from_str_with_format(
            "engine.toml",
            "log_level = \"debug\"\ninitial_scene = \"Main\"\n",
        )
        .unwrap();

        assert_eq!(config.level_filter(), LevelFilter::Debug);
        assert_eq!(config.initial_scene.as_deref(), Some("Main"));
        assert!((config.max_delta_time - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_ron() {
        let config = EngineConfig::from_str_with_format(
            "engine.ron",
            "(log_level: \"warn\", max_delta_time: 0.1)",
        )
        .unwrap();

        assert_eq!(config.level_filter(), LevelFilter::Warn);
        assert!((config.max_delta_time - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = EngineConfig::from_str_with_format("engine.ini", "");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = std::env::temp_dir().join(format!("scene_engine_config_{}.toml", std::process::id()));
        let path = path.to_string_lossy().to_string();

        let config = EngineConfig {
            log_level: "trace".to_string(),
            max_delta_time: 0.05,
            initial_scene: Some("Level1".to_string()),
        };
        config.save_to_file(&path).unwrap();
        let loaded = EngineConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }
}
