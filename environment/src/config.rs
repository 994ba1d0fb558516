//! Deployment configuration and logging setup.

use alloy::primitives::U256;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use crate::descriptor::NetworkName;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to install log subscriber: {0}")]
    Logging(String),
}

/// Event formatter for the `[logging]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One line per event with span context
    #[default]
    Full,
    Compact,
    /// Multi-line, for reading a single deployment
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Installs the global subscriber. Events go to stderr so stdout stays
    /// free for the deployment report.
    pub fn init(&self) -> Result<(), ConfigError> {
        let builder = fmt()
            .with_env_filter(self.filter())
            .with_writer(std::io::stderr);
        let installed = match self.format {
            LogFormat::Full => builder.try_init(),
            LogFormat::Compact => builder.compact().try_init(),
            LogFormat::Pretty => builder.pretty().try_init(),
            LogFormat::Json => builder.json().try_init(),
        };
        installed.map_err(|e| ConfigError::Logging(e.to_string()))
    }
}

/// Top-level configuration read from `deploy.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeployConfig {
    /// JSON-RPC endpoint of the (forked) node
    pub rpc_url: Url,
    #[serde(default = "default_network")]
    pub network: NetworkName,
    /// Directory holding the `v2.<network>.json` descriptors
    #[serde(default = "default_descriptor_dir")]
    pub descriptor_dir: PathBuf,
    /// Artifact directories, searched in order
    #[serde(default = "default_artifact_dirs")]
    pub artifact_dirs: Vec<PathBuf>,
    /// Balance given to every impersonated account, e.g. `"100e18"`
    #[serde(default)]
    pub impersonated_balance: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_network() -> NetworkName {
    NetworkName::Mainnet
}

fn default_descriptor_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_artifact_dirs() -> Vec<PathBuf> {
    vec![
        PathBuf::from("build/contracts"),
        PathBuf::from("scripts/artifacts"),
    ]
}

impl DeployConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Parsed `impersonated_balance`, if configured.
    pub fn impersonated_balance(&self) -> Result<Option<U256>, ConfigError> {
        self.impersonated_balance
            .as_deref()
            .map(|literal| {
                utils::parse_scaled(literal).map_err(|e| ConfigError::InvalidValue {
                    field: "impersonated_balance",
                    reason: e.to_string(),
                })
            })
            .transpose()
    }

    /// HTTP provider without a local signer; transactions are signed by the
    /// node for impersonated accounts.
    pub fn connect(&self) -> Arc<DynProvider> {
        Arc::new(
            ProviderBuilder::new()
                .connect_http(self.rpc_url.clone())
                .erased(),
        )
    }
}
