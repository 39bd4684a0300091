//! Service configuration

use anyhow::Result;
use serde::Deserialize;

/// Pricing service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Path to the serialized model bundle
    #[serde(default = "default_model_path")]
    pub model_path: String,
}

fn default_api_port() -> u16 {
    8090
}

fn default_model_path() -> String {
    "models/price_model.json".to_string()
}

impl ServiceConfig {
    /// Load configuration from the environment (PRICE_ prefix)
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PRICE"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| ServiceConfig {
            api_port: default_api_port(),
            model_path: default_model_path(),
        }))
    }
}
