//! Client configuration.
//!
//! Settings come from `ragdesk.toml` layered with `RAGDESK_*` environment
//! variables (double underscore separates sections, e.g.
//! `RAGDESK_API__BASE_URL`). Everything has a default, so a missing file is
//! fine unless one was named explicitly.

use crate::types::{AppError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the chat service REST API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Where the bearer token is persisted. Defaults to
    /// `<user config dir>/ragdesk/token`.
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Use the in-process mock assistant instead of the live `/chat`
    /// endpoint. On by default until a backend is deployed.
    #[serde(default = "default_mock")]
    pub mock: bool,

    /// Simulated response delay of the mock assistant.
    #[serde(default = "default_mock_delay_ms")]
    pub mock_delay_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_mock() -> bool {
    true
}

fn default_mock_delay_ms() -> u64 {
    1500
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { token_file: None }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            mock: default_mock(),
            mock_delay_ms: default_mock_delay_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            auth: AuthConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the given file (or `ragdesk.toml` in the
    /// working directory) merged with `RAGDESK_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name("ragdesk").required(false),
        };

        config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("RAGDESK").separator("__"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::Config(e.to_string()))
    }

    /// Resolved path of the token file.
    pub fn token_path(&self) -> PathBuf {
        self.auth.token_file.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("ragdesk")
                .join("token")
        })
    }
}
