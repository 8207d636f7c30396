//! Configuration file loading for tessera.
//!
//! Reads `tessera.config.json` from the current working directory, or from
//! the path given with `--config`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tessera_atelier::LowerOptions;
use tessera_croquis::AnalyzerOptions;
use tessera_retouch::DiffOptions;

pub const CONFIG_FILE: &str = "tessera.config.json";

/// Top-level tessera configuration.
#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TesseraConfig {
    /// JSON Schema reference (for editor autocompletion).
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    pub lower: LowerOptions,

    pub analyze: AnalyzerOptions,

    pub diff: DiffOptions,
}

/// Load the configuration file. Missing files yield defaults; unreadable or
/// malformed ones are reported and yield defaults.
pub fn load_config(path: Option<&Path>) -> TesseraConfig {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(|| {
        std::env::current_dir()
            .unwrap_or_default()
            .join(CONFIG_FILE)
    });

    if !config_path.exists() {
        if path.is_some() {
            tracing::warn!(path = %config_path.display(), "config file not found; using defaults");
        }
        return TesseraConfig::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => parse_config(&content, &config_path),
        Err(err) => {
            tracing::warn!(path = %config_path.display(), %err, "failed to read config");
            TesseraConfig::default()
        }
    }
}

fn parse_config(content: &str, path: &Path) -> TesseraConfig {
    match serde_json::from_str(content) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "failed to parse config");
            TesseraConfig::default()
        }
    }
}
