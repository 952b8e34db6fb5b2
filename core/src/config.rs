use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct IngestionConfig {
    pub data_path: String,
    /// Skip undecodable lines with a warning instead of aborting the load.
    pub skip_malformed: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            data_path: "appliances_data.json".to_string(),
            skip_malformed: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Minimum compound sentiment for a similar review to recommend its product.
    pub recommendation_threshold: f64,
    pub max_recommendations: usize,
    pub max_wordcloud_terms: usize,
    pub max_distribution_products: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            recommendation_threshold: 0.5,
            max_recommendations: 6,
            max_wordcloud_terms: 100,
            max_distribution_products: 6,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Extensions the `config` crate recognises for `default.*`.
const CONFIG_EXTENSIONS: &[&str] = &["toml", "json", "yaml", "yml", "ini", "ron", "json5"];

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    pub fn has_default_file(dir: impl AsRef<Path>) -> bool {
        let dir = dir.as_ref();
        CONFIG_EXTENSIONS
            .iter()
            .any(|ext| dir.join(format!("default.{}", ext)).is_file())
    }

    /// Built-in defaults when `dir` has no `default.*` file. A present but
    /// invalid file is still an error.
    pub fn load_or_default(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        if Self::has_default_file(dir) {
            Self::load_from(dir)
        } else {
            Ok(Self::default())
        }
    }

    /// Layer `<dir>/default`, an optional `<dir>/<RUN_MODE>` file and
    /// `REVIEWGRAPH__SECTION__KEY` environment variables.
    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::from(dir.join("default")))
            .add_source(File::from(dir.join(&run_mode)).required(false))
            .add_source(Environment::with_prefix("REVIEWGRAPH").separator("__"));

        builder.build()?.try_deserialize()
    }
}
