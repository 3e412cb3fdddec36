use anyhow::Result;
use serde::Deserialize;

use crate::session::CaptureConfig;

/// File-backed application configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub capture: CaptureConfig,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
        }
    }
}
