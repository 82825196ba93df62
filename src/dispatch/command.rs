//! Named command handlers.

use slirc_proto::{Command, ParsedLine};
use tracing::{debug, info};

use super::{Context, Handler};
use crate::event::{ChatMessage, Event};

/// PING: answer immediately, echoing the token exactly as sent.
pub struct PingHandler;

impl Handler for PingHandler {
    fn handle(&self, ctx: &mut Context<'_>, line: &ParsedLine) {
        ctx.send(Command::PONG(line.rest().to_string()));
    }
}

/// PRIVMSG: a chat line for a channel or for us.
pub struct ChatHandler;

impl Handler for ChatHandler {
    fn handle(&self, ctx: &mut Context<'_>, line: &ParsedLine) {
        let nick = line.source_nick().unwrap_or_default();
        let dest = line.arg(0).unwrap_or_default();
        ctx.emit(Event::Chat(ChatMessage::new(nick, dest, line.text())));
    }
}

/// JOIN: completes the pending channel join.
///
/// The reply carries no correlation with our request, so whichever JOIN
/// arrives first while a join is pending resolves it.
pub struct JoinHandler;

impl Handler for JoinHandler {
    fn handle(&self, ctx: &mut Context<'_>, line: &ParsedLine) {
        let channel = line.arg(0).unwrap_or_default().to_string();
        debug!(channel = %channel, source = ?line.source_nick(), "JOIN received");
        ctx.resolve_join(Ok(channel));
    }
}

/// SQUIT: the server is going away.
pub struct SquitHandler;

impl Handler for SquitHandler {
    fn handle(&self, ctx: &mut Context<'_>, line: &ParsedLine) {
        info!("Server quit, disconnecting");
        match line.trailing.as_deref() {
            Some(comment) if !comment.is_empty() => ctx.disconnect(format!("Server quit: {comment}")),
            _ => ctx.disconnect("Server quit"),
        }
    }
}

/// Lines that need no reaction (PART, NAMES markers).
pub struct IgnoreHandler;

impl Handler for IgnoreHandler {
    fn handle(&self, _ctx: &mut Context<'_>, _line: &ParsedLine) {}
}
