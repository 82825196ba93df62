//! slirc-client - a small IRC client engine.
//!
//! Connections frame and parse server lines, track the login and channel
//! join requests awaiting a reply, and report everything user-visible as
//! [`Event`]s. The [`console`] module is a line-oriented front-end on top.

pub mod config;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod network;
pub mod pending;
pub mod session;
pub mod telemetry;

pub use crate::error::{ClientError, RequestError};
pub use crate::event::{ChatMessage, Event, EventSink};
pub use crate::network::{Connection, ConnectionId, ConnectionState, Registry, ServerAddr};
pub use crate::pending::{PendingReply, RequestKind};
pub use crate::session::Identity;
