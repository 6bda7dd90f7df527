//! # Register Configuration
//!
//! Settings for one register: where the backend lives, what the store is
//! called, how money is displayed and a few register knobs.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     RXPOS_BACKEND_URL=https://project.example.co                       │
//! │     RXPOS_CURRENCY_CODE=EUR                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/rxpos/register.toml (Linux)                              │
//! │     ~/Library/Application Support/com.rxpos.rxpos/register.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # register.toml
//! [backend]
//! url = "https://project.example.co"
//! api_key = "anon-key"
//! request_timeout_secs = 15
//!
//! [store]
//! pharmacy_name = "Corner Pharmacy"
//! location = "12 Main St"
//!
//! [currency]
//! code = "EUR"
//! locale = "de-DE"
//!
//! [register]
//! search_limit = 20
//! recent_limit = 6
//! operator = "front-counter"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use rxpos_core::{
    CurrencyConfig, StoreSettings, SymbolPosition, DEFAULT_SEARCH_LIMIT, RECENT_ADDS_LIMIT,
};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Backend Settings
// =============================================================================

/// How to reach the managed backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL of the service (http or https).
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Public API key sent with every request.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Upper bound on any single backend call (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            url: default_backend_url(),
            api_key: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

// =============================================================================
// Store Settings
// =============================================================================

/// What the receipt header says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default = "default_pharmacy_name")]
    pub pharmacy_name: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub logo_url: Option<String>,
}

fn default_pharmacy_name() -> String {
    StoreSettings::default().pharmacy_name
}

impl Default for StoreSection {
    fn default() -> Self {
        StoreSection {
            pharmacy_name: default_pharmacy_name(),
            location: String::new(),
            logo_url: None,
        }
    }
}

// =============================================================================
// Register Settings
// =============================================================================

/// Per-register knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSettings {
    /// Maximum search results shown.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Length of the recently-added strip.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Name recorded on safety overrides when the caller names nobody.
    #[serde(default = "default_operator")]
    pub operator: String,
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_recent_limit() -> usize {
    RECENT_ADDS_LIMIT
}

fn default_operator() -> String {
    "register".to_string()
}

impl Default for RegisterSettings {
    fn default() -> Self {
        RegisterSettings {
            search_limit: default_search_limit(),
            recent_limit: default_recent_limit(),
            operator: default_operator(),
        }
    }
}

// =============================================================================
// Main Register Configuration
// =============================================================================

/// Complete register configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterConfig {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub currency: CurrencyConfig,

    #[serde(default)]
    pub register: RegisterSettings,
}

impl RegisterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (register.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading register config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load register config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a config file body. Missing sections and keys take defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Register config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let parsed = url::Url::parse(&self.backend.url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.backend.url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "Backend URL must start with http:// or https://, got: {}",
                self.backend.url
            )));
        }

        if self.backend.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.store.pharmacy_name.trim().is_empty() {
            return Err(ConfigError::Invalid("pharmacy_name is required".into()));
        }

        let code = self.currency.code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::Invalid(format!(
                "currency code must be three letters, got: '{}'",
                self.currency.code
            )));
        }

        if self.register.search_limit == 0 {
            return Err(ConfigError::Invalid(
                "search_limit must be greater than 0".into(),
            ));
        }
        if self.register.recent_limit == 0 {
            return Err(ConfigError::Invalid(
                "recent_limit must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `RXPOS_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key → value lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("RXPOS_BACKEND_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.url = url;
        }

        if let Some(key) = lookup("RXPOS_API_KEY") {
            self.backend.api_key = Some(key);
        }

        if let Some(timeout) = lookup("RXPOS_REQUEST_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.backend.request_timeout_secs = secs,
                Err(_) => {
                    warn!(value = %timeout, "Ignoring non-numeric RXPOS_REQUEST_TIMEOUT_SECS")
                }
            }
        }

        if let Some(name) = lookup("RXPOS_PHARMACY_NAME") {
            self.store.pharmacy_name = name;
        }

        if let Some(location) = lookup("RXPOS_STORE_LOCATION") {
            self.store.location = location;
        }

        if let Some(code) = lookup("RXPOS_CURRENCY_CODE") {
            debug!(code = %code, "Overriding currency code from environment");
            self.currency.code = code;
        }

        if let Some(symbol) = lookup("RXPOS_CURRENCY_SYMBOL") {
            self.currency.symbol = Some(symbol).filter(|s| !s.trim().is_empty());
        }

        if let Some(position) = lookup("RXPOS_CURRENCY_POSITION") {
            match position.to_lowercase().as_str() {
                "prefix" => self.currency.position = SymbolPosition::Prefix,
                "suffix" => self.currency.position = SymbolPosition::Suffix,
                _ => warn!(position = %position, "Unknown currency position in environment"),
            }
        }

        if let Some(locale) = lookup("RXPOS_LOCALE") {
            self.currency.locale = locale;
        }

        if let Some(operator) = lookup("RXPOS_OPERATOR") {
            self.register.operator = operator;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "rxpos", "rxpos")
            .map(|dirs| dirs.config_dir().join("register.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The settings the receipt renderer reads.
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            pharmacy_name: self.store.pharmacy_name.clone(),
            location: self.store.location.clone(),
            logo_url: self.store.logo_url.clone(),
            currency: self.currency.clone(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.request_timeout_secs)
    }
}
