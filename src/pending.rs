//! Pending request tracking.
//!
//! The protocol carries no correlation identifiers, so a reply is matched to
//! the request that caused it by kind alone. Each connection therefore holds
//! at most one outstanding request per [`RequestKind`]; issuing a second one
//! is refused without touching the first.
//!
//! A slot resolves exactly once. The continuation is a oneshot channel whose
//! sender is taken out of the slot on resolution, so a duplicate or late reply
//! finds nothing to resolve.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::RequestError;

/// Kind of correlated request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Login,
    Join,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequestKind::Login => "login",
            RequestKind::Join => "join",
        })
    }
}

/// Outcome delivered to a pending request.
pub type Outcome<T> = Result<T, RequestError>;

/// A single-occupancy request slot.
#[derive(Debug)]
pub struct PendingSlot<T> {
    kind: RequestKind,
    tx: Option<oneshot::Sender<Outcome<T>>>,
}

impl<T> PendingSlot<T> {
    pub fn new(kind: RequestKind) -> Self {
        Self { kind, tx: None }
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Whether a request is outstanding.
    ///
    /// A request stays outstanding even if its caller stopped waiting; the
    /// server's reply still has to be consumed by it.
    pub fn is_pending(&self) -> bool {
        self.tx.is_some()
    }

    /// Occupy the slot, returning the future the caller awaits.
    pub fn issue(&mut self) -> Result<PendingReply<T>, RequestError> {
        if self.tx.is_some() {
            return Err(RequestError::Conflict(self.kind));
        }
        let (tx, rx) = oneshot::channel();
        self.tx = Some(tx);
        Ok(PendingReply { rx })
    }

    /// Deliver `outcome` and clear the slot.
    ///
    /// Returns `false` without doing anything when nothing is outstanding.
    pub fn resolve(&mut self, outcome: Outcome<T>) -> bool {
        match self.tx.take() {
            Some(tx) => {
                // The caller may have dropped its reply future; the slot is
                // cleared either way.
                let _ = tx.send(outcome);
                true
            }
            None => false,
        }
    }

    pub fn fail(&mut self, reason: RequestError) -> bool {
        self.resolve(Err(reason))
    }
}

/// The caller's side of a pending request.
///
/// Resolves to the request's outcome. If the slot is dropped without ever
/// resolving (the connection itself went away) the reply reads as
/// [`RequestError::ConnectionClosed`].
#[derive(Debug)]
#[must_use = "a pending reply does nothing unless awaited"]
pub struct PendingReply<T> {
    rx: oneshot::Receiver<Outcome<T>>,
}

impl<T> PendingReply<T> {
    /// Take the outcome if it has already arrived.
    pub fn try_outcome(&mut self) -> Option<Outcome<T>> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(RequestError::ConnectionClosed)),
        }
    }
}

impl<T> Future for PendingReply<T> {
    type Output = Outcome<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(RequestError::ConnectionClosed)))
    }
}

/// Per-connection request tracker.
#[derive(Debug)]
pub struct PendingRequests {
    login: PendingSlot<()>,
    join: PendingSlot<String>,
}

impl Default for PendingRequests {
    fn default() -> Self {
        Self {
            login: PendingSlot::new(RequestKind::Login),
            join: PendingSlot::new(RequestKind::Join),
        }
    }
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self) -> &mut PendingSlot<()> {
        &mut self.login
    }

    pub fn join(&mut self) -> &mut PendingSlot<String> {
        &mut self.join
    }

    pub fn is_pending(&self, kind: RequestKind) -> bool {
        match kind {
            RequestKind::Login => self.login.is_pending(),
            RequestKind::Join => self.join.is_pending(),
        }
    }

    /// Fail every outstanding request with `reason`.
    ///
    /// Returns the kinds that were actually resolved, in a fixed order
    /// (login before join).
    pub fn fail_all(&mut self, reason: RequestError) -> Vec<RequestKind> {
        let mut failed = Vec::new();
        if self.login.fail(reason.clone()) {
            failed.push(RequestKind::Login);
        }
        if self.join.fail(reason) {
            failed.push(RequestKind::Join);
        }
        failed
    }
}
