//! Numeric reply handlers.

use slirc_proto::{ParsedLine, isupport};
use tracing::{debug, info, warn};

use super::{Context, Handler};
use crate::error::RequestError;
use crate::event::Event;

/// 001: registration accepted.
pub struct WelcomeHandler;

impl Handler for WelcomeHandler {
    fn handle(&self, ctx: &mut Context<'_>, line: &ParsedLine) {
        ctx.display(line.display_text());
        ctx.resolve_login(Ok(()));
    }
}

/// 433: nickname in use.
///
/// The connection is dropped after the login fails; the caller has to
/// reconnect with another nickname.
pub struct NickInUseHandler;

impl Handler for NickInUseHandler {
    fn handle(&self, ctx: &mut Context<'_>, line: &ParsedLine) {
        ctx.display(line.display_text());
        ctx.resolve_login(Err(RequestError::NameTaken));
        info!("Nickname in use, disconnecting");
        ctx.disconnect("Nickname is already in use");
    }
}

/// 432: nickname rejected.
pub struct ErroneousNickHandler;

impl Handler for ErroneousNickHandler {
    fn handle(&self, ctx: &mut Context<'_>, line: &ParsedLine) {
        ctx.display(line.display_text());
        ctx.resolve_login(Err(RequestError::BadName));
    }
}

/// 005: picks the network name out of the feature list.
pub struct IsupportHandler;

impl Handler for IsupportHandler {
    fn handle(&self, ctx: &mut Context<'_>, line: &ParsedLine) {
        if let Some(name) = isupport::network_name(&line.raw) {
            debug!(network = %name, "Network name discovered");
            ctx.session.network = Some(name.to_string());
            ctx.emit(Event::NetworkName(name.to_string()));
        }
        ctx.display(line.display_text());
    }
}

/// Join rejection replies (471, 479).
pub struct JoinRejectedHandler {
    reason: RequestError,
}

impl JoinRejectedHandler {
    pub fn new(reason: RequestError) -> Self {
        Self { reason }
    }
}

impl Handler for JoinRejectedHandler {
    fn handle(&self, ctx: &mut Context<'_>, _line: &ParsedLine) {
        ctx.resolve_join(Err(self.reason.clone()));
    }
}

/// 321: a LIST reply begins.
pub struct ListStartHandler;

impl Handler for ListStartHandler {
    fn handle(&self, ctx: &mut Context<'_>, line: &ParsedLine) {
        ctx.display(line.display_text());
        ctx.session.list.start();
    }
}

/// 322: one channel of a LIST reply.
pub struct ListItemHandler;

impl Handler for ListItemHandler {
    fn handle(&self, ctx: &mut Context<'_>, line: &ParsedLine) {
        ctx.display(line.display_text());
        ctx.session.list.push(line.raw.as_str());
    }
}

/// 323: the LIST reply is complete.
pub struct ListEndHandler;

impl Handler for ListEndHandler {
    fn handle(&self, ctx: &mut Context<'_>, line: &ParsedLine) {
        ctx.display(line.display_text());
        let dropped = ctx.session.list.dropped();
        if dropped > 0 {
            warn!(dropped, "Channel list truncated");
        }
        let items = ctx.session.list.finish();
        debug!(count = items.len(), "Channel list complete");
        ctx.emit(Event::List(items));
    }
}
