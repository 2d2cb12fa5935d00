use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Default backend host; user-overridable at runtime (settings screen / CLI)
/// and via config file or environment.
pub const DEFAULT_BASE_URL: &str = "https://pms.example.com/api";

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Search keystrokes are coalesced with this delay before a filter pass runs.
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub page_size: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    /// Location of the key-value state file (tokens, offline queue,
    /// notification preferences).
    pub state_path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub state_path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: 30,
                page_size: DEFAULT_PAGE_SIZE,
            },
            storage: StorageConfig { state_path: PathBuf::from("procure-state.json") },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    api: Option<ApiPatch>,
    storage: Option<StoragePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiPatch {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    page_size: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    state_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    /// Layered load: defaults, then the config file (if any), then
    /// environment variables, then explicit overrides. Validation runs on
    /// the final shape.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match resolve_config_path(options.config_path.as_deref()) {
            Some(path) => {
                let patch = read_patch(&path)?;
                config.apply_patch(patch);
            }
            None if options.require_file => {
                let wanted = options
                    .config_path
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
                return Err(ConfigError::MissingConfigFile(wanted));
            }
            None => {}
        }

        config.apply_env()?;
        config.apply_overrides(options.overrides)?;
        config.validate()?;
        Ok(config)
    }

    /// User-editable backend host override. Only URL syntax is checked; the
    /// backend itself is a collaborator we cannot vouch for here.
    pub fn set_base_url(&mut self, raw: &str) -> Result<(), ConfigError> {
        let trimmed = raw.trim();
        validate_base_url(trimmed)?;
        self.api.base_url = trimmed.trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn reset_base_url(&mut self) {
        self.api.base_url = DEFAULT_BASE_URL.to_string();
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(api) = patch.api {
            if let Some(base_url) = api.base_url {
                self.api.base_url = base_url;
            }
            if let Some(timeout_secs) = api.timeout_secs {
                self.api.timeout_secs = timeout_secs;
            }
            if let Some(page_size) = api.page_size {
                self.api.page_size = page_size;
            }
        }
        if let Some(storage) = patch.storage {
            if let Some(state_path) = storage.state_path {
                self.storage.state_path = state_path;
            }
        }
        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(value) = env::var("PROCURE_API_BASE_URL") {
            self.api.base_url = value;
        }
        if let Ok(value) = env::var("PROCURE_API_TIMEOUT_SECS") {
            self.api.timeout_secs = value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: "PROCURE_API_TIMEOUT_SECS".to_string(),
                value,
            })?;
        }
        if let Ok(value) = env::var("PROCURE_API_PAGE_SIZE") {
            self.api.page_size = value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: "PROCURE_API_PAGE_SIZE".to_string(),
                value,
            })?;
        }
        if let Ok(value) = env::var("PROCURE_STATE_PATH") {
            self.storage.state_path = PathBuf::from(value);
        }
        if let Ok(value) = env::var("PROCURE_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Ok(value) = env::var("PROCURE_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) -> Result<(), ConfigError> {
        if let Some(base_url) = overrides.base_url {
            self.set_base_url(&base_url)?;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
        if let Some(state_path) = overrides.state_path {
            self.storage.state_path = state_path;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url(&self.api.base_url)?;
        if self.api.page_size == 0 {
            return Err(ConfigError::Validation("api.page_size must be at least 1".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation("api.timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }
}

const DEFAULT_CONFIG_FILE: &str = "procure.toml";

fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(raw).map_err(|error| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: error.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme `{}`", parsed.scheme()),
        });
    }
    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }
    Ok(())
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }
    if let Ok(path) = env::var("PROCURE_CONFIG") {
        let path = PathBuf::from(path);
        return path.exists().then_some(path);
    }
    let default = PathBuf::from(DEFAULT_CONFIG_FILE);
    default.exists().then_some(default)
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{
        AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, DEFAULT_BASE_URL,
    };

    #[test]
    fn defaults_validate_cleanly() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn file_patch_overrides_only_named_fields() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "[api]\nbase_url = \"https://pms.internal:8443/api\"\n\n[logging]\nformat = \"json\""
        )
        .expect("write config");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            overrides: ConfigOverrides::default(),
        })
        .expect("load");

        assert_eq!(config.api.base_url, "https://pms.internal:8443/api");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.api.page_size, super::DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = AppConfig::load(LoadOptions {
            config_path: Some("does-not-exist.toml".into()),
            require_file: true,
            overrides: ConfigOverrides::default(),
        });
        assert!(matches!(result, Err(ConfigError::MissingConfigFile(_))));
    }

    #[test]
    fn base_url_override_requires_http_syntax() {
        let mut config = AppConfig::default();
        assert!(config.set_base_url("not a url").is_err());
        assert!(config.set_base_url("ftp://pms.example.com").is_err());
        assert!(config.set_base_url("https://10.0.0.5:8000/api/").is_ok());
        assert_eq!(config.api.base_url, "https://10.0.0.5:8000/api");
    }

    #[test]
    fn reset_restores_the_default_host() {
        let mut config = AppConfig::default();
        config.set_base_url("https://pms.staging.example.com/api").expect("override");
        config.reset_base_url();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn zero_page_size_fails_validation() {
        let mut config = AppConfig::default();
        config.api.page_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>().expect("parse"), LogFormat::Json);
        assert!("yaml".parse::<LogFormat>().is_err());
    }
}
