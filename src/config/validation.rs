//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use crate::event::is_channel;
use crate::network::ServerAddr;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("identity.nick is required")]
    MissingNick,
    #[error("identity.nick must not contain spaces, got '{0}'")]
    InvalidNick(String),
    #[error("server.address is not a valid host[:port]: '{0}'")]
    InvalidAddress(String),
    #[error("client.read_buffer_size must be at least 1")]
    ZeroReadBuffer,
    #[error("client.autojoin entry is not a channel: '{0}'")]
    InvalidAutojoin(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let nick = &config.identity.nick;
    if nick.is_empty() {
        errors.push(ValidationError::MissingNick);
    } else if nick.contains(char::is_whitespace) {
        errors.push(ValidationError::InvalidNick(nick.clone()));
    }

    if ServerAddr::parse(&config.server.address).is_err() {
        errors.push(ValidationError::InvalidAddress(config.server.address.clone()));
    }

    if config.client.read_buffer_size == 0 {
        errors.push(ValidationError::ZeroReadBuffer);
    }

    for channel in &config.client.autojoin {
        if !is_channel(channel) || channel.contains([' ', ',']) {
            errors.push(ValidationError::InvalidAutojoin(channel.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
