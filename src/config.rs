//! Configuration for charger-scout.
//!
//! [`Config::load`] layers the embedded defaults, an optional TOML file and
//! `CHARGER_SCOUT__SECTION__KEY` environment variables, in that order.
//! [`Config::defaults`] returns the embedded defaults only (useful in tests).

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[server]
bind = "127.0.0.1:3000"

[store]
geo_key    = "chargers:geo"
key_prefix = "charger:"

[search]
default_radius_km  = 10.0
default_limit      = 50
max_limit          = 500
request_timeout_ms = 2000

[seed]
builtin = true
"#;

const ENV_PREFIX: &str = "CHARGER_SCOUT";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub search: SearchConfig,
    pub seed: SeedConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

/// `[store]` section: where chargers live in the backing store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Name of the geo set holding every charger location
    pub geo_key: String,
    /// Prefix of each charger's attribute key, followed by its ID
    pub key_prefix: String,
}

/// `[search]` section: request defaults and bounds.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub default_radius_km: f64,
    pub default_limit: usize,
    pub max_limit: usize,
    pub request_timeout_ms: u64,
}

impl SearchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// `[seed]` section: what to ingest at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Load the bundled Singapore chargers
    pub builtin: bool,
    /// JSON file of additional chargers
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Defaults, then `path` if given, then environment overrides
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: Config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    fn validate(&self) -> anyhow::Result<()> {
        let search = &self.search;
        if !(search.default_radius_km.is_finite() && search.default_radius_km > 0.0) {
            anyhow::bail!("search.default_radius_km must be positive");
        }
        if search.max_limit == 0 || search.default_limit == 0 {
            anyhow::bail!("search limits must be at least 1");
        }
        if search.default_limit > search.max_limit {
            anyhow::bail!(
                "search.default_limit ({}) exceeds search.max_limit ({})",
                search.default_limit,
                search.max_limit
            );
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
