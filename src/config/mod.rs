//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions and loading
//! - [`validation`]: Startup checks collected into a list of errors
//! - `defaults`: serde default functions

mod defaults;
mod types;
mod validation;

pub use types::{ClientConfig, Config, ConfigError, IdentityConfig, LogConfig, LogFormat, ServerConfig};
pub use validation::{ValidationError, validate};
