//! Unified error handling for slirc-client.
//!
//! Two layers: [`RequestError`] is the outcome of a single correlated request
//! (login, channel join) and travels inside events, [`ClientError`] is what
//! a caller gets back synchronously from a connection or registry call.

use std::io;

use thiserror::Error;

use crate::network::{ConnectionId, ConnectionState};
use crate::pending::RequestKind;

// ============================================================================
// Request Errors (pending request outcomes)
// ============================================================================

/// Why a pending request did not succeed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("nickname is already in use")]
    NameTaken,

    #[error("nickname was rejected by the server")]
    BadName,

    #[error("channel is full")]
    ChannelFull,

    #[error("illegal channel name")]
    IllegalChannelName,

    /// A request of this kind is already outstanding; the earlier one is
    /// unaffected.
    #[error("a {0} request is already pending")]
    Conflict(RequestKind),

    #[error("connection closed")]
    ConnectionClosed,
}

impl RequestError {
    /// Whether the server itself rejected the request.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NameTaken | Self::BadName | Self::ChannelFull | Self::IllegalChannelName
        )
    }
}

// ============================================================================
// Client Errors (caller-facing)
// ============================================================================

/// Errors returned by connection and registry operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    #[error("not connected")]
    NotConnected,

    #[error("connection is already {0}")]
    AlreadyActive(ConnectionState),

    #[error("invalid server address: {0}")]
    InvalidAddress(String),

    #[error("unknown connection: {0}")]
    UnknownConnection(ConnectionId),

    #[error(transparent)]
    Request(#[from] RequestError),
}

impl ClientError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::NotConnected => "not_connected",
            Self::AlreadyActive(_) => "already_active",
            Self::InvalidAddress(_) => "invalid_address",
            Self::UnknownConnection(_) => "unknown_connection",
            Self::Request(RequestError::Conflict(_)) => "request_conflict",
            Self::Request(RequestError::ConnectionClosed) => "connection_closed",
            Self::Request(_) => "request_rejected",
        }
    }
}
