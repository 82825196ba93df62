//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{default_quit_message, default_read_buffer_size};
use crate::session::Identity;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server to connect to.
    pub server: ServerConfig,
    /// Names presented at login.
    pub identity: IdentityConfig,
    /// Client behavior.
    #[serde(default)]
    pub client: ClientConfig,
    /// Log output.
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Server endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// `host[:port]`; the port defaults to 6667.
    pub address: String,
}

/// Login identity.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    pub nick: String,
    /// Username; defaults to the nick.
    pub user: Option<String>,
    /// Real name; defaults to the nick.
    pub realname: Option<String>,
    /// Request user mode +i.
    #[serde(default)]
    pub hidden: bool,
}

impl IdentityConfig {
    pub fn to_identity(&self) -> Identity {
        Identity::new(
            &self.nick,
            self.user.as_deref().unwrap_or(&self.nick),
            self.realname.as_deref().unwrap_or(&self.nick),
            self.hidden,
        )
    }
}

/// Client behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Bytes per socket read.
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
    /// Reason sent with QUIT on exit.
    #[serde(default = "default_quit_message")]
    pub quit_message: String,
    /// Channels joined one after another once logged in.
    #[serde(default)]
    pub autojoin: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: default_read_buffer_size(),
            quit_message: default_quit_message(),
            autojoin: Vec::new(),
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}
