//! Events emitted by the client engine for the presentation layer.
//!
//! The engine never renders anything itself. Every user-visible outcome is
//! handed to an [`EventSink`] tagged with the connection it came from.

use tokio::sync::mpsc;

use crate::error::RequestError;
use crate::network::ConnectionId;

/// Events the engine emits to its consumer (console, GUI, bot, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Transport connected; the read loop is running.
    Connected,

    /// Transport connect failed. The connection is back to disconnected.
    ConnectFailed { reason: String },

    /// The connection left the connected state.
    Disconnected { reason: String },

    /// Outcome of the pending login.
    Login(Result<(), RequestError>),

    /// Outcome of the pending channel join; carries the joined channel.
    Join(Result<String, RequestError>),

    /// A PRIVMSG addressed to a channel or to us.
    Chat(ChatMessage),

    /// The server announced its network name.
    NetworkName(String),

    /// A complete LIST reply: the raw item lines in arrival order.
    List(Vec<String>),

    /// Text for the server window.
    Display(String),
}

/// One chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub nick: String,
    pub dest: String,
    pub text: String,
}

impl ChatMessage {
    pub fn new(nick: impl Into<String>, dest: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            dest: dest.into(),
            text: text.into(),
        }
    }

    /// Conversation this message belongs in.
    ///
    /// Channel messages stay in the channel; a private message lands in the
    /// sender's conversation.
    pub fn conversation(&self) -> &str {
        if is_channel(&self.dest) {
            &self.dest
        } else {
            &self.nick
        }
    }
}

/// Whether `target` names a channel.
pub fn is_channel(target: &str) -> bool {
    target.starts_with(['#', '&'])
}

/// Consumer of engine events.
///
/// Called from connection tasks after the connection's own state lock has
/// been released; implementations must not block or call back into a
/// connection from another thread. Events of one connection arrive in the
/// order its state changed, `Connected` before any `Disconnected` that ends
/// it.
pub trait EventSink: Send + Sync {
    fn emit(&self, conn: ConnectionId, event: Event);
}

/// Sending half of the channel-backed sink.
pub type EventSender = mpsc::UnboundedSender<(ConnectionId, Event)>;

/// Receiving half of the channel-backed sink.
pub type EventReceiver = mpsc::UnboundedReceiver<(ConnectionId, Event)>;

/// Create a channel-backed event sink.
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

impl EventSink for EventSender {
    fn emit(&self, conn: ConnectionId, event: Event) {
        if self.send((conn, event)).is_err() {
            tracing::trace!(conn = %conn, "Event receiver dropped");
        }
    }
}
