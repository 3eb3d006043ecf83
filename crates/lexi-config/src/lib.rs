use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use self::dictionary::DictionaryConfig;
use self::store::StoreConfig;
use self::translator::TranslatorConfig;

pub mod dictionary;
pub mod store;
pub mod translator;

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "lexi.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid store path {path:?}: {reason}")]
    InvalidStorePath { path: PathBuf, reason: &'static str },
}

fn default_source() -> String {
    "en".to_string()
}

fn default_target() -> String {
    "fr".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LanguageConfig {
    /// Language being learned, the one headwords are written in
    #[serde(default = "default_source")]
    pub source: String,
    /// Learner's language, the one translations are written in
    #[serde(default = "default_target")]
    pub target: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            target: default_target(),
        }
    }
}

fn default_definitions_secs() -> u64 {
    10
}

fn default_translations_secs() -> u64 {
    15
}

/// Upper bounds on remote lookups. Translation providers are slower.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TimeoutConfig {
    #[serde(default = "default_definitions_secs")]
    pub definitions_secs: u64,
    #[serde(default = "default_translations_secs")]
    pub translations_secs: u64,
}

impl TimeoutConfig {
    pub fn definitions(&self) -> Duration {
        Duration::from_secs(self.definitions_secs)
    }

    pub fn translations(&self) -> Duration {
        Duration::from_secs(self.translations_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            definitions_secs: default_definitions_secs(),
            translations_secs: default_translations_secs(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("lexi.log")
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    /// Fallback filter when RUST_LOG is not set
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: default_log_file(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub languages: LanguageConfig,
    pub dictionary: DictionaryConfig,
    pub translator: TranslatorConfig,
    pub store: StoreConfig,
    pub timeouts: TimeoutConfig,
    pub log: LogConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the configuration: defaults, then the JSON file, then environment
    /// variables (a `.env` file in the working directory is honoured).
    ///
    /// An explicit `path` must exist; the default `lexi.json` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    tracing::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    Self::new()
                }
            }
        };

        config.apply_overrides(|key| env::var(key).ok());

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Using config file: {}", path.display());

        Ok(config)
    }

    /// Applies variable overrides, `lookup` resolving a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("OXFORD_URL") {
            self.dictionary.url = v;
        }
        if let Some(v) = lookup("OXFORD_APP_ID") {
            self.dictionary.app_id = v;
        }
        if let Some(v) = lookup("OXFORD_APP_KEY") {
            self.dictionary.app_key = v;
        }
        if let Some(v) = lookup("DEEPL_API_URL") {
            self.translator.api_url = v;
        }
        if let Some(v) = lookup("DEEPL_API_KEY") {
            self.translator.api_key = v;
        }
        if let Some(v) = lookup("LEXI_STORE_PATH") {
            self.store.path = PathBuf::from(v);
        }
        if let Some(v) = lookup("LEXI_LOG_LEVEL") {
            self.log.level = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_are_usable_without_file() {
        let config = Config::new();
        assert_eq!(config.languages.source, "en");
        assert_eq!(config.languages.target, "fr");
        assert_eq!(config.timeouts.definitions(), Duration::from_secs(10));
        assert_eq!(config.timeouts.translations(), Duration::from_secs(15));
        assert!(config.translator.enabled);
        assert_eq!(config.log.file, PathBuf::from("lexi.log"));
    }

    #[test]
    fn sparse_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "dictionary": {{ "app_id": "id-1" }}, "timeouts": {{ "translations_secs": 30 }} }}"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.dictionary.app_id, "id-1");
        assert_eq!(config.dictionary.url, "https://od-api.oxforddictionaries.com");
        assert_eq!(config.timeouts.translations_secs, 30);
        assert_eq!(config.timeouts.definitions_secs, 10);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_explicit_file_is_an_io_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn environment_overrides_file_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("DEEPL_API_KEY", "secret"),
            ("LEXI_STORE_PATH", "/tmp/cards"),
            ("LEXI_LOG_LEVEL", "debug"),
        ]);

        let mut config = Config::new();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.translator.api_key, "secret");
        assert_eq!(config.store.path, PathBuf::from("/tmp/cards"));
        assert_eq!(config.log.level, "debug");
        assert!(config.dictionary.app_key.is_empty());
    }

    #[test]
    fn store_path_must_be_an_absolute_directory() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = StoreConfig::default();
        assert!(store.validated_path().is_err());

        store.path = PathBuf::from("relative/cards");
        assert!(matches!(
            store.validated_path(),
            Err(ConfigError::InvalidStorePath { .. })
        ));

        store.path = dir.path().join("missing");
        assert!(store.validated_path().is_err());

        store.path = dir.path().to_path_buf();
        assert_eq!(store.validated_path().unwrap(), dir.path());
    }
}
