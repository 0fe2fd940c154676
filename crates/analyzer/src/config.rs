use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use super::error::Error;
use common::numeric_kernel::Tolerance;

#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorConfig {
    pub currencies: usize,
    pub min_price: f64,
    pub max_price: f64,
    pub fee_bps: f64,
    /// Mispricing applied to one random leg; `None` keeps the market arbitrage-free.
    pub inject_arbitrage_bps: Option<f64>,
    /// Fixed seed for reproducible markets; `None` draws from the OS.
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RateQuery {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    pub timeout_ms: u64,
    #[serde(default)]
    pub queries: Vec<RateQuery>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub tolerance: Tolerance,
    pub simulator: SimulatorConfig,
    pub analysis: AnalysisConfig,
}

/// Loads configuration from `crates/analyzer/Config.toml` and environment variables.
pub fn load_config() -> Result<Config, Error> {
    let base_path = env::current_dir().map_err(|e| {
        Error::ConfigLoadError(format!("Failed to determine current directory: {}", e))
    })?;

    let config_file_path: PathBuf = base_path
        .join("crates")
        .join("analyzer")
        .join("Config.toml");

    load_config_from(&config_file_path)
}

/// Loads configuration from `path`, overridden by `ANALYZER_`-prefixed variables
/// such as `ANALYZER_TOLERANCE__DETECT_EPSILON`.
pub fn load_config_from(path: &Path) -> Result<Config, Error> {
    if !path.exists() {
        return Err(Error::ConfigLoadError(format!(
            "Configuration file not found at calculated path: {}",
            path.display()
        )));
    }

    let s = ConfigLoader::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("ANALYZER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?;

    let app_config: Config = s
        .try_deserialize()
        .map_err(|e| Error::ConfigLoadError(format!("Failed to deserialize config: {}", e)))?;

    if app_config.simulator.min_price <= 0.0
        || app_config.simulator.max_price <= app_config.simulator.min_price
    {
        return Err(Error::ConfigLoadError(
            "simulator price range must be positive and non-empty".to_string(),
        ));
    }

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    const MOCK_CONFIG: &str = r#"
[tolerance]
relax_epsilon = 1e-10
detect_epsilon = 1e-6

[simulator]
currencies = 5
min_price = 0.01
max_price = 1.5
fee_bps = 5.0
seed = 7

[analysis]
timeout_ms = 250

[[analysis.queries]]
source = "USD"
target = "EUR"
"#;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut temp_file = Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("Failed to create temp file");
        temp_file
            .write_all(content.as_bytes())
            .expect("Failed to write mock content");
        temp_file
    }

    #[test]
    fn test_load_config_from_file() {
        let file = write_config(MOCK_CONFIG);
        let config = load_config_from(file.path()).expect("config should load");

        assert_eq!(config.tolerance.relax_epsilon(), 1e-10);
        assert_eq!(config.tolerance.detect_epsilon(), 1e-6);
        assert_eq!(config.simulator.currencies, 5);
        assert_eq!(config.simulator.seed, Some(7));
        assert_eq!(config.simulator.inject_arbitrage_bps, None);
        assert_eq!(config.analysis.timeout_ms, 250);
        assert_eq!(
            config.analysis.queries,
            vec![RateQuery {
                source: "USD".into(),
                target: "EUR".into()
            }]
        );
    }

    #[test]
    fn test_missing_tolerance_uses_defaults() {
        let content = MOCK_CONFIG.replace(
            "[tolerance]\nrelax_epsilon = 1e-10\ndetect_epsilon = 1e-6\n",
            "",
        );
        let file = write_config(&content);
        let config = load_config_from(file.path()).expect("config should load");

        assert_eq!(config.tolerance, Tolerance::default());
    }

    #[test]
    fn test_inverted_tolerance_is_rejected() {
        let content = MOCK_CONFIG.replace("detect_epsilon = 1e-6", "detect_epsilon = 1e-12");
        let file = write_config(&content);

        let result = load_config_from(file.path());
        assert!(matches!(result, Err(Error::ConfigLoadError(_))));
    }

    #[test]
    fn test_empty_price_range_is_rejected() {
        let content = MOCK_CONFIG.replace("max_price = 1.5", "max_price = 0.01");
        let file = write_config(&content);

        let result = load_config_from(file.path());
        assert!(matches!(result, Err(Error::ConfigLoadError(_))));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let result = load_config_from(Path::new("does/not/exist/Config.toml"));
        assert!(matches!(result, Err(Error::ConfigLoadError(_))));
    }
}
