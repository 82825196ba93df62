//! # slirc-proto
//!
//! Wire-level building blocks for the slirc chat client: byte-stream line
//! framing, lenient inbound line parsing, outbound command formatting, and
//! the handful of numeric replies the client reacts to.
//!
//! This crate performs no I/O of its own. [`LineCodec`] plugs into
//! `tokio_util::codec` for callers that want framed streams.
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_proto::{Command, CommandToken, LineFramer, ParsedLine};
//!
//! let mut framer = LineFramer::new();
//! let lines: Vec<String> = framer.feed(b":alice!u@h PRIVMSG #rust :hi\r\nPI").collect();
//! assert_eq!(lines.len(), 1);
//! assert_eq!(framer.pending(), b"PI");
//!
//! let line = ParsedLine::parse(&lines[0]);
//! assert_eq!(line.source_nick(), Some("alice"));
//! assert_eq!(line.command, CommandToken::Named("PRIVMSG".into()));
//!
//! let reply = Command::PRIVMSG("#rust".into(), "hello".into());
//! assert_eq!(reply.to_string(), "PRIVMSG #rust :hello");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod isupport;
pub mod line;
pub mod list;
pub mod message;
pub mod response;

pub use self::command::{Command, ServerQuery};
pub use self::error::ProtocolError;
pub use self::isupport::network_name;
pub use self::line::{LineCodec, LineFramer, Lines, CRLF};
pub use self::list::ListEntry;
pub use self::message::{CommandToken, ParsedLine};
pub use self::response::Response;
