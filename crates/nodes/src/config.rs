//! Pipeline configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use pipeline::ModelId;
use thiserror::Error;

/// Model pinned for fact-checking, independent of the writer's model.
pub const DEFAULT_FACT_CHECK_MODEL: &str = "gemini-2.0-flash";
/// Total fact-check attempts per run (the first check plus revisions).
pub const DEFAULT_MAX_FACT_CHECK_ATTEMPTS: u32 = 2;

/// Invalid pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A model name was set but empty.
    #[error("Configuration error: {setting} must not be empty")]
    EmptyModel {
        /// Name of the offending setting.
        setting: &'static str,
    },
}

/// Configuration for the agents and the fact-check loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Model for the researcher, writer, and polisher. `None` uses the
    /// text generator's default model.
    pub model: Option<ModelId>,
    /// Model the fact-checker is pinned to.
    pub fact_check_model: ModelId,
    /// Total fact-check attempts before proceeding with an unverified draft.
    /// Always at least 1.
    pub max_fact_check_attempts: u32,
}

impl PipelineConfig {
    /// Creates a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a model variable is set but empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    model: Option<String>,
    fact_check_model: Option<String>,
    max_fact_check_attempts: Option<u32>,
}

impl PipelineConfigBuilder {
    /// Populates unset fields from environment variables.
    pub fn from_env(mut self) -> Self {
        if self.model.is_none() {
            self.model = std::env::var("DRAFTSMITH_MODEL").ok();
        }
        if self.fact_check_model.is_none() {
            self.fact_check_model = std::env::var("DRAFTSMITH_FACT_CHECK_MODEL").ok();
        }
        if self.max_fact_check_attempts.is_none() {
            self.max_fact_check_attempts = std::env::var("DRAFTSMITH_MAX_FACT_CHECK_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        self
    }

    /// Sets the model used by the researcher, writer, and polisher.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the fact-check model.
    pub fn fact_check_model(mut self, model: impl Into<String>) -> Self {
        self.fact_check_model = Some(model.into());
        self
    }

    /// Sets the total number of fact-check attempts.
    pub fn max_fact_check_attempts(mut self, n: u32) -> Self {
        self.max_fact_check_attempts = Some(n);
        self
    }

    /// Builds the [`PipelineConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyModel`] if a model name was set to `""`.
    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let model = match self.model {
            Some(name) => Some(ModelId::new(name).ok_or(ConfigError::EmptyModel { setting: "model" })?),
            None => None,
        };
        let fact_check_model = ModelId::new(
            self.fact_check_model
                .unwrap_or_else(|| DEFAULT_FACT_CHECK_MODEL.to_string()),
        )
        .ok_or(ConfigError::EmptyModel {
            setting: "fact_check_model",
        })?;

        Ok(PipelineConfig {
            model,
            fact_check_model,
            max_fact_check_attempts: self
                .max_fact_check_attempts
                .unwrap_or(DEFAULT_MAX_FACT_CHECK_ATTEMPTS)
                .max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = PipelineConfig::builder().build().unwrap();
        assert_eq!(config.model, None);
        assert_eq!(config.fact_check_model.as_str(), DEFAULT_FACT_CHECK_MODEL);
        assert_eq!(config.max_fact_check_attempts, 2);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = PipelineConfig::builder()
            .model("gemini-1.5-pro")
            .fact_check_model("gemini-1.5-flash")
            .max_fact_check_attempts(4)
            .build()
            .unwrap();
        assert_eq!(config.model.as_ref().map(ModelId::as_str), Some("gemini-1.5-pro"));
        assert_eq!(config.fact_check_model.as_str(), "gemini-1.5-flash");
        assert_eq!(config.max_fact_check_attempts, 4);
    }

    #[test]
    fn test_zero_attempts_is_raised_to_one() {
        let config = PipelineConfig::builder()
            .max_fact_check_attempts(0)
            .build()
            .unwrap();
        assert_eq!(config.max_fact_check_attempts, 1);
    }

    #[test]
    fn test_empty_model_is_rejected() {
        let err = PipelineConfig::builder().fact_check_model("").build().unwrap_err();
        assert_eq!(
            err,
            ConfigError::EmptyModel {
                setting: "fact_check_model"
            }
        );
    }
}
