//! Runtime settings and logging setup.
//!
//! Settings are layered: built-in defaults, then an optional
//! `allowance-ledger.toml` in the working directory, then environment
//! variables (`DATABASE_URL`, `BIND_ADDRESS`, `LOG_LEVEL`, `LOG_FORMAT`,
//! `ALLOWED_ORIGIN`, `MAX_CONNECTIONS`). A `.env` file is loaded into the
//! environment first when present.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

const CONFIG_FILE: &str = "allowance-ledger";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Single origin allowed by CORS; any origin when unset
    pub allowed_origin: Option<String>,
    pub max_connections: u32,
}

impl Settings {
    /// Load settings from the default sources
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_sources(Some(CONFIG_FILE), Environment::default())
    }

    fn from_sources(file: Option<&str>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("database_url", "sqlite:allowance.db")?
            .set_default("bind_address", "127.0.0.1:3000")?
            .set_default("log_level", "info")?
            .set_default("log_format", "pretty")?
            .set_default("max_connections", 5)?;

        if let Some(name) = file {
            builder = builder.add_source(File::with_name(name).required(false));
        }

        builder
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

/// Install the global tracing subscriber. `RUST_LOG` takes precedence over
/// the configured level.
pub fn init_logging(settings: &Settings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    match settings.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).pretty().init(),
        LogFormat::Compact => tracing_subscriber::fmt().with_env_filter(filter).compact().init(),
    }
}
