//! Engine configuration.
//!
//! Settings come from an optional TOML file and `VAGABOND_`-prefixed
//! environment variables (the latter win). Rules tables are a separate JSON
//! file layered over the built-in Vagabond defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use vagabond_domain::RulesConfig;

/// Environment variable prefix, e.g. `VAGABOND_SEED=42`.
pub const ENV_PREFIX: &str = "VAGABOND";
/// Log filter used when none is configured.
pub const DEFAULT_LOG_FILTER: &str = "vagabond_engine=info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load engine settings: {0}")]
    Settings(#[from] config::ConfigError),
    #[error("Failed to read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid rules file {path}: {source}")]
    Rules {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime settings of the engine binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// JSON file with rules table overrides
    pub rules_path: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
    /// Seed for reproducible dice; system randomness when unset
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rules_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Load from an optional settings file plus the environment.
    pub fn load(settings_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = settings_file {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// The rules tables: defaults, overlaid with `rules_path` when set.
    pub fn rules(&self) -> Result<RulesConfig, ConfigError> {
        match &self.rules_path {
            Some(path) => load_rules(path),
            None => Ok(RulesConfig::default()),
        }
    }
}

/// Read a rules override file and layer it over the defaults.
pub fn load_rules(path: &Path) -> Result<RulesConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let overrides: RulesConfig =
        serde_json::from_str(&text).map_err(|source| ConfigError::Rules {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(RulesConfig::default().merged_with(overrides))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_without_sources() {
        let config = EngineConfig::default();
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert!(config.seed.is_none());
        assert_eq!(config.rules().unwrap(), RulesConfig::default());
    }

    #[test]
    fn loads_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "seed = 99\nlog_filter = \"vagabond_engine=debug\"\n").unwrap();

        let config = EngineConfig::load(Some(&path)).unwrap();
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.log_filter, "vagabond_engine=debug");
    }

    #[test]
    fn missing_settings_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn rules_file_overlays_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"speedByDexterity": {{"7": 45}}, "skills": {{"alchemy": {{"stat": "reason"}}}}}}"#
        )
        .unwrap();

        let rules = load_rules(file.path()).unwrap();
        assert_eq!(rules.base_speed(7), 45);
        assert_eq!(rules.base_speed(3), 30);
        assert_eq!(rules.skills.len(), 13);
        assert_eq!(rules.attacks.len(), 4);
    }

    #[test]
    fn bad_rules_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_rules(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Rules { .. }));
        assert!(err.to_string().contains("Invalid rules file"));

        let missing = load_rules(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
