use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::universe::GeneratorConfig;
use crate::viewport::ViewportConfig;
use crate::visibility::SortOrder;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    pub max_visible_notes: usize,
    pub sort_order: SortOrder,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_visible_notes: 400,
            sort_order: SortOrder::default(),
        }
    }
}

/// Everything the viewer reads at startup. Missing keys take their defaults.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Signed so a negative request can be clamped with a warning instead
    /// of failing to parse.
    pub initial_notes: i64,
    pub generator: GeneratorConfig,
    pub viewport: ViewportConfig,
    pub filter: FilterConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_notes: 800,
            generator: GeneratorConfig::default(),
            viewport: ViewportConfig::default(),
            filter: FilterConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse galaxy config")
    }

    /// Reads `path` when given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_json_str(&json)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        info!(path = %path.display(), notes = config.initial_notes, "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = AppConfig::load(None).expect("defaults never fail");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.filter.max_visible_notes, 400);
        assert_eq!(config.filter.sort_order, SortOrder::Newest);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = AppConfig::from_json_str(
            r#"{
                "initial_notes": -5,
                "generator": { "seed": 42, "dust_spread": 900.0 },
                "filter": { "sort_order": "oldest" }
            }"#,
        )
        .expect("valid config");

        assert_eq!(config.initial_notes, -5);
        assert_eq!(config.generator.seed, Some(42));
        assert_eq!(config.generator.dust_spread, 900.0);
        assert_eq!(config.generator.cluster_radius, 2000.0);
        assert_eq!(config.generator.topics.len(), 5);
        assert_eq!(config.filter.sort_order, SortOrder::Oldest);
        assert_eq!(config.filter.max_visible_notes, 400);
        assert_eq!(config.viewport, ViewportConfig::default());
    }

    #[test]
    fn malformed_json_is_reported() {
        let error = AppConfig::from_json_str("{ \"initial_notes\": \"many\" }")
            .expect_err("string is not a count");
        assert!(error.to_string().contains("failed to parse galaxy config"));
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let path = PathBuf::from("/nonexistent/logos-galaxy/config.json");
        let error = AppConfig::load(Some(&path)).expect_err("file does not exist");
        assert!(format!("{error:#}").contains("/nonexistent/logos-galaxy/config.json"));
    }
}
