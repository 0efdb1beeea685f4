//! Layered replay settings

use alerting::AlertConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use dms::DmsConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix, e.g. `VIGIL_DMS__SMOOTHING_ALPHA=0.2`
pub const ENV_PREFIX: &str = "VIGIL";

/// Everything the replay tool can be configured with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaySettings {
    pub dms: DmsConfig,
    pub alerts: AlertConfig,
}

impl ReplaySettings {
    /// Defaults, overridden by the optional file, overridden by `VIGIL_*`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        Self::build(builder, environment())
    }

    fn build(builder: ConfigBuilder<DefaultState>, env: Environment) -> Result<Self, ConfigError> {
        builder.add_source(env).build()?.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
