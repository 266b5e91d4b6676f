//! Config file handling

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{ClientOptions, USER_AGENT_STRING};
use crate::errors::{ReqpadError, Result};
use crate::models::HeaderMapDict;

/// Environment variable that overrides the config directory
pub const CONFIG_DIR_ENV: &str = "REQPAD_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";
const STORE_FILE: &str = "store.json";

/// reqpad configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub config_dir: PathBuf,
    /// Request timeout
    pub timeout: Duration,
    pub verify_ssl: bool,
    /// Save requests automatically after they are sent
    pub auto_save_requests: bool,
    /// Headers added to every request that does not already set them
    pub default_headers: HeaderMapDict,
    pub storage_path: PathBuf,
}

impl Config {
    /// Defaults rooted at `config_dir`
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self {
            storage_path: config_dir.join(STORE_FILE),
            config_dir,
            timeout: Duration::from_secs(30),
            verify_ssl: true,
            auto_save_requests: true,
            default_headers: HeaderMapDict::new(),
        }
    }

    /// Load configuration from `config.toml` in the config directory.
    ///
    /// `dir_override` wins over `REQPAD_CONFIG_DIR`, which wins over the
    /// platform config directory. A missing file yields the defaults.
    pub fn load(dir_override: Option<&Path>) -> Result<Self> {
        let config_dir = match dir_override {
            Some(dir) => dir.to_path_buf(),
            None => Self::default_config_dir(),
        };
        let config_file = config_dir.join(CONFIG_FILE);

        if !config_file.exists() {
            tracing::debug!(path = %config_file.display(), "no config file, using defaults");
            return Ok(Self::with_dir(config_dir));
        }

        let content = std::fs::read_to_string(&config_file)
            .map_err(|e| ReqpadError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content, config_dir)
    }

    /// Parse config file content; relative paths resolve against `config_dir`
    pub fn from_toml(content: &str, config_dir: PathBuf) -> Result<Self> {
        let toml_value: toml::Value = toml::from_str(content)
            .map_err(|e| ReqpadError::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::with_dir(config_dir);
        let defaults = toml_value.get("defaults");

        if let Some(timeout) = defaults.and_then(|d| d.get("timeout")) {
            let secs = timeout
                .as_float()
                .or_else(|| timeout.as_integer().map(|i| i as f64))
                .filter(|s| s.is_finite() && *s > 0.0)
                .ok_or_else(|| ReqpadError::Config("defaults.timeout must be a positive number".to_string()))?;
            config.timeout = Duration::from_secs_f64(secs);
        }

        if let Some(verify) = defaults.and_then(|d| d.get("verify_ssl")).and_then(|v| v.as_bool()) {
            config.verify_ssl = verify;
        }

        if let Some(auto_save) = defaults
            .and_then(|d| d.get("auto_save_requests"))
            .and_then(|v| v.as_bool())
        {
            config.auto_save_requests = auto_save;
        }

        if let Some(headers) = defaults.and_then(|d| d.get("headers")).and_then(|v| v.as_table()) {
            for (name, value) in headers {
                match value.as_str() {
                    Some(v) => {
                        config.default_headers.insert(name.clone(), v.to_string());
                    }
                    None => tracing::warn!(header = %name, "ignoring non-string default header"),
                }
            }
        }

        if let Some(path) = toml_value
            .get("storage")
            .and_then(|s| s.get("path"))
            .and_then(|v| v.as_str())
        {
            let path = PathBuf::from(path);
            config.storage_path = if path.is_absolute() {
                path
            } else {
                config.config_dir.join(path)
            };
        }

        Ok(config)
    }

    /// Options for building the HTTP client
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: self.timeout,
            verify_ssl: self.verify_ssl,
            user_agent: USER_AGENT_STRING.to_string(),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Get the default config directory
    fn default_config_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return PathBuf::from(dir);
        }
        dirs::config_dir()
            .map(|p| p.join("reqpad"))
            .unwrap_or_else(|| PathBuf::from(".reqpad"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("", PathBuf::from("/cfg")).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.verify_ssl);
        assert!(config.auto_save_requests);
        assert!(config.default_headers.is_empty());
        assert_eq!(config.storage_path, PathBuf::from("/cfg/store.json"));
    }

    #[test]
    fn test_full_file() {
        let content = r#"
[defaults]
timeout = 2.5
verify_ssl = false
auto_save_requests = false

[defaults.headers]
Accept = "application/json"
X-Client = "reqpad"

[storage]
path = "data/requests.json"
"#;
        let config = Config::from_toml(content, PathBuf::from("/cfg")).unwrap();
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert!(!config.verify_ssl);
        assert!(!config.auto_save_requests);
        assert_eq!(config.default_headers["Accept"], "application/json");
        assert_eq!(config.default_headers.len(), 2);
        assert_eq!(config.storage_path, PathBuf::from("/cfg/data/requests.json"));
    }

    #[test]
    fn test_integer_timeout_and_absolute_storage() {
        let content = "[defaults]\ntimeout = 5\n[storage]\npath = \"/var/reqpad.json\"\n";
        let config = Config::from_toml(content, PathBuf::from("/cfg")).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.storage_path, PathBuf::from("/var/reqpad.json"));
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            Config::from_toml("[defaults", PathBuf::from("/cfg")),
            Err(ReqpadError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("[defaults]\ntimeout = -1", PathBuf::from("/cfg")),
            Err(ReqpadError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path())).unwrap();
        assert_eq!(config.config_dir, dir.path());
        assert_eq!(config.storage_path, dir.path().join("store.json"));
    }
}
