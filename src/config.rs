//! Codec configuration
//!
//! Loaded from YAML; every section and field is optional and falls back to
//! its default.
//!
//! ```yaml
//! encoder:
//!   quarter-duration: 480
//!   notes-per-measure: 16
//!   part-name: Encoded Bytes
//! decoder:
//!   naturals: reject
//! engrave:
//!   lilypond-dir: /opt/lilypond/bin
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::codec::{CodecError, DecoderConfig, EncoderConfig};
use crate::lilypond_renderer::EngraveConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Invalid(#[from] CodecError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub encoder: EncoderConfig,
    pub decoder: DecoderConfig,
    pub engrave: EngraveConfig,
}

impl CodecConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty file is a valid, all-defaults config
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.encoder.check()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}
