//! Inbound line dispatch.
//!
//! This module contains the [`Handler`] trait and the [`Dispatcher`] table
//! that routes each parsed line to a handler by reply code or command name.
//!
//! Handlers are synchronous and perform no I/O. They mutate the connection's
//! [`Session`] and record what the connection should do next as [`Action`]s:
//! lines to send, events to emit, or a forced disconnect. The connection
//! applies those actions in order once the handler returns.

mod command;
mod numeric;

use std::collections::HashMap;

use slirc_proto::{CommandToken, ParsedLine, Response};
use tracing::trace;

use crate::error::RequestError;
use crate::event::Event;
use crate::session::Session;

pub use command::{ChatHandler, IgnoreHandler, JoinHandler, PingHandler, SquitHandler};
pub use numeric::{
    ErroneousNickHandler, IsupportHandler, JoinRejectedHandler, ListEndHandler, ListItemHandler,
    ListStartHandler, NickInUseHandler, WelcomeHandler,
};

/// Side effect requested by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Write one line to the server.
    Send(String),
    /// Hand an event to the sink.
    Emit(Event),
    /// Tear the connection down; later lines in the same read are dropped.
    Disconnect(String),
}

/// Handler context passed to each handler.
pub struct Context<'a> {
    /// State of the connection the line arrived on.
    pub session: &'a mut Session,
    actions: Vec<Action>,
}

impl<'a> Context<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self {
            session,
            actions: Vec::new(),
        }
    }

    pub fn send(&mut self, line: impl Into<String>) {
        self.actions.push(Action::Send(line.into()));
    }

    pub fn emit(&mut self, event: Event) {
        self.actions.push(Action::Emit(event));
    }

    /// Emit a generic display line.
    pub fn display(&mut self, text: impl Into<String>) {
        self.emit(Event::Display(text.into()));
    }

    pub fn disconnect(&mut self, reason: impl Into<String>) {
        self.actions.push(Action::Disconnect(reason.into()));
    }

    /// Resolve the pending login, emitting the result if one was outstanding.
    pub fn resolve_login(&mut self, outcome: Result<(), RequestError>) {
        if self.session.pending.login().resolve(outcome.clone()) {
            self.emit(Event::Login(outcome));
        }
    }

    /// Resolve the pending join, emitting the result if one was outstanding.
    pub fn resolve_join(&mut self, outcome: Result<String, RequestError>) {
        if self.session.pending.join().resolve(outcome.clone()) {
            self.emit(Event::Join(outcome));
        }
    }

    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }
}

/// A handler for one reply code or command.
pub trait Handler: Send + Sync {
    fn handle(&self, ctx: &mut Context<'_>, line: &ParsedLine);
}

/// Fallback for anything without a dedicated handler.
struct DisplayHandler;

impl Handler for DisplayHandler {
    fn handle(&self, ctx: &mut Context<'_>, line: &ParsedLine) {
        ctx.display(line.display_text());
    }
}

/// Routing table from reply code / command name to handler.
pub struct Dispatcher {
    numeric: HashMap<Response, Box<dyn Handler>>,
    named: HashMap<&'static str, Box<dyn Handler>>,
    fallback: Box<dyn Handler>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Create a dispatcher with all handlers registered.
    pub fn new() -> Self {
        let mut numeric: HashMap<Response, Box<dyn Handler>> = HashMap::new();

        // Login outcome
        numeric.insert(Response::RPL_WELCOME, Box::new(WelcomeHandler));
        numeric.insert(Response::ERR_NICKNAMEINUSE, Box::new(NickInUseHandler));
        numeric.insert(Response::ERR_ERRONEUSNICKNAME, Box::new(ErroneousNickHandler));

        // Server info
        numeric.insert(Response::RPL_ISUPPORT, Box::new(IsupportHandler));

        // Join rejections
        numeric.insert(
            Response::ERR_CHANNELISFULL,
            Box::new(JoinRejectedHandler::new(RequestError::ChannelFull)),
        );
        numeric.insert(
            Response::ERR_BADCHANNAME,
            Box::new(JoinRejectedHandler::new(RequestError::IllegalChannelName)),
        );

        // Channel list
        numeric.insert(Response::RPL_LISTSTART, Box::new(ListStartHandler));
        numeric.insert(Response::RPL_LIST, Box::new(ListItemHandler));
        numeric.insert(Response::RPL_LISTEND, Box::new(ListEndHandler));

        // NAMES markers
        numeric.insert(Response::RPL_NAMREPLY, Box::new(IgnoreHandler));
        numeric.insert(Response::RPL_ENDOFNAMES, Box::new(IgnoreHandler));

        let mut named: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();
        named.insert("PING", Box::new(PingHandler));
        named.insert("PRIVMSG", Box::new(ChatHandler));
        named.insert("JOIN", Box::new(JoinHandler));
        named.insert("PART", Box::new(IgnoreHandler));
        named.insert("SQUIT", Box::new(SquitHandler));

        Self {
            numeric,
            named,
            fallback: Box::new(DisplayHandler),
        }
    }

    /// Handler registered for `command`. Numerics outside [`Response`] and
    /// unregistered names have none.
    fn lookup(&self, command: &CommandToken) -> Option<&dyn Handler> {
        let handler = match command.response() {
            Some(response) => self.numeric.get(&response),
            None => command.name().and_then(|name| self.named.get(name)),
        };
        handler.map(|handler| handler.as_ref())
    }

    /// Dispatch a line to its handler, or to the display fallback.
    pub fn dispatch(&self, ctx: &mut Context<'_>, line: &ParsedLine) {
        match self.lookup(&line.command) {
            Some(handler) => {
                trace!(command = %line.command, "Dispatching");
                handler.handle(ctx, line);
            }
            None => self.fallback.handle(ctx, line),
        }
    }

    /// Dispatch one raw line against `session`, returning the actions.
    pub fn run(&self, session: &mut Session, raw: &str) -> Vec<Action> {
        let line = ParsedLine::parse(raw);
        let mut ctx = Context::new(session);
        self.dispatch(&mut ctx, &line);
        ctx.into_actions()
    }
}
