//! Network module.
//!
//! Contains the server address type, the per-server [`Connection`] with its
//! read and write tasks, and the [`Registry`] of live connections.

mod address;
mod connection;
mod registry;

use std::fmt;

pub use address::{DEFAULT_PORT, ServerAddr};
pub use connection::{Connection, ConnectionState, DEFAULT_READ_BUFFER_SIZE};
pub use registry::Registry;

/// Registry-assigned connection identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}
