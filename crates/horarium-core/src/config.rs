use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub resolver: ResolverConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Hard cap on occurrences expanded per rule.
    pub max_instances: u16,
    /// Length of the default resolution window, in days.
    pub window_days: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it
    /// fails, or if the resulting values are unusable.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("resolver.max_instances", 1000)?
            .set_default("resolver.window_days", 7)?
            .set_default("logging.level", "info")?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("horarium.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects settings the resolver cannot operate under.
    fn validate(&self) -> CoreResult<()> {
        if self.resolver.max_instances == 0 {
            return Err(CoreError::InvalidConfiguration(
                "resolver.max_instances must be positive".into(),
            ));
        }
        if self.resolver.window_days == 0 {
            return Err(CoreError::InvalidConfiguration(
                "resolver.window_days must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
