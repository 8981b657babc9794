//! Survey Configuration
//!
//! Which norms to survey and how. Loadable from TOML; defaults reproduce
//! the classic run over the even norms 2, 4, ..., 18.

use e8_core::NormSq;
use serde::{Deserialize, Serialize};

/// Accepted log levels
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Survey configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    /// First squared norm
    pub start: i64,

    /// Squared norms stop before this value
    pub end: i64,

    /// Distance between surveyed norms
    pub step: u64,

    /// Generate shells on the rayon pool
    pub parallel: bool,

    /// Compare shell sizes against the divisor-sum formulas
    pub verify: bool,

    /// Print every vector of each combined shell
    pub show_vectors: bool,

    /// Log level
    pub log_level: String,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            start: 2,
            end: 20,
            step: 2,
            parallel: true,
            verify: true,
            show_vectors: false,
            log_level: "info".to_string(),
        }
    }
}

impl SurveyConfig {
    /// Create a new configuration builder
    pub fn builder() -> SurveyConfigBuilder {
        SurveyConfigBuilder::default()
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::IoError(e.to_string()))
    }

    /// Tracing level named by `log_level` (unknown names fall back to info)
    pub fn tracing_level(&self) -> tracing::Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }

    /// Squared norms to survey, in order
    pub fn norms(&self) -> impl Iterator<Item = i64> {
        let step = usize::try_from(self.step).unwrap_or(usize::MAX).max(1);
        (self.start..self.end).step_by(step)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        NormSq::try_from(self.start)
            .map_err(|e| ConfigError::InvalidValue(format!("start: {}", e)))?;

        if self.end < self.start {
            return Err(ConfigError::InvalidValue(format!(
                "end ({}) must not be below start ({})",
                self.end, self.start
            )));
        }

        if self.end > 0 {
            NormSq::try_from(self.end - 1)
                .map_err(|e| ConfigError::InvalidValue(format!("end: {}", e)))?;
        }

        if self.step == 0 {
            return Err(ConfigError::InvalidValue("step cannot be 0".into()));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }

        Ok(())
    }
}

/// Configuration builder
#[derive(Default)]
pub struct SurveyConfigBuilder {
    config: SurveyConfig,
}

impl SurveyConfigBuilder {
    /// Set first norm
    pub fn start(mut self, start: i64) -> Self {
        self.config.start = start;
        self
    }

    /// Set exclusive upper bound
    pub fn end(mut self, end: i64) -> Self {
        self.config.end = end;
        self
    }

    /// Set step between norms
    pub fn step(mut self, step: u64) -> Self {
        self.config.step = step;
        self
    }

    /// Enable/disable rayon
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.config.parallel = enabled;
        self
    }

    /// Enable/disable formula cross-checks
    pub fn verify(mut self, enabled: bool) -> Self {
        self.config.verify = enabled;
        self
    }

    /// Enable/disable vector listing
    pub fn show_vectors(mut self, enabled: bool) -> Self {
        self.config.show_vectors = enabled;
        self
    }

    /// Set log level
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log_level = level.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<SurveyConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_level_from_config() {
        let config = SurveyConfig::builder().log_level("DEBUG").build().unwrap();
        assert_eq!(config.tracing_level(), tracing::Level::DEBUG);
        assert_eq!(SurveyConfig::default().tracing_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_default_config() {
        let config = SurveyConfig::default();
        assert_eq!(config.start, 2);
        assert_eq!(config.end, 20);
        assert!(config.validate().is_ok());
        assert_eq!(config.norms().collect::<Vec<_>>(), vec![2, 4, 6, 8, 10, 12, 14, 16, 18]);
    }

    #[test]
    fn test_config_builder() {
        let config = SurveyConfig::builder()
            .start(0)
            .end(7)
            .step(3)
            .parallel(false)
            .build()
            .unwrap();

        assert_eq!(config.norms().collect::<Vec<_>>(), vec![0, 3, 6]);
        assert!(!config.parallel);
    }

    #[test]
    fn test_config_validation() {
        assert!(SurveyConfig::builder().start(-2).build().is_err());
        assert!(SurveyConfig::builder().start(10).end(4).build().is_err());
        assert!(SurveyConfig::builder().step(0).build().is_err());
        assert!(SurveyConfig::builder().log_level("loud").build().is_err());
        assert!(SurveyConfig::builder().log_level("DEBUG").build().is_ok());
    }

    #[test]
    fn test_empty_range() {
        let config = SurveyConfig::builder().start(4).end(4).build().unwrap();
        assert_eq!(config.norms().count(), 0);
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.toml");
        let config = SurveyConfig::builder().start(4).end(12).show_vectors(true).build().unwrap();

        config.save_to_file(&path).unwrap();
        let loaded = SurveyConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "end = 8\nverify = false\n").unwrap();

        let loaded = SurveyConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.start, 2);
        assert_eq!(loaded.end, 8);
        assert!(!loaded.verify);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "start = -6\n").unwrap();
        assert!(matches!(
            SurveyConfig::load_from_file(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
