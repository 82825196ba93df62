//! Per-connection protocol state.
//!
//! Everything the dispatcher reads or mutates while handling a line lives in
//! [`Session`]: who we logged in as, what the server told us about itself,
//! the pending request tracker, and the in-progress channel list.

use crate::pending::PendingRequests;

/// Names presented to the server at login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub nickname: String,
    pub username: String,
    pub realname: String,
    /// Request user mode +i (hidden from user listings).
    pub hidden: bool,
}

impl Identity {
    pub fn new(
        nickname: impl Into<String>,
        username: impl Into<String>,
        realname: impl Into<String>,
        hidden: bool,
    ) -> Self {
        Self {
            nickname: nickname.into(),
            username: username.into(),
            realname: realname.into(),
            hidden,
        }
    }

    /// Identity using the nickname for all three names, hidden.
    pub fn short(nickname: impl Into<String>) -> Self {
        let nickname = nickname.into();
        Self {
            username: nickname.clone(),
            realname: nickname.clone(),
            nickname,
            hidden: true,
        }
    }
}

/// Most LIST items kept for one reply; later items are counted and dropped.
pub const MAX_LIST_ITEMS: usize = 10_000;

/// Raw LIST item lines collected between list-start and list-end.
#[derive(Debug, Default)]
pub struct ListAccumulator {
    items: Vec<String>,
    dropped: usize,
}

impl ListAccumulator {
    /// Begin a new list, discarding anything collected so far.
    pub fn start(&mut self) {
        self.items.clear();
        self.dropped = 0;
    }

    /// Collect one item, unless [`MAX_LIST_ITEMS`] are already held.
    pub fn push(&mut self, raw: impl Into<String>) {
        if self.items.len() < MAX_LIST_ITEMS {
            self.items.push(raw.into());
        } else {
            self.dropped += 1;
        }
    }

    /// Hand over the collected items and reset.
    pub fn finish(&mut self) -> Vec<String> {
        self.dropped = 0;
        std::mem::take(&mut self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items refused since the list began.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// State the dispatcher works against.
#[derive(Debug, Default)]
pub struct Session {
    /// Identity of the last login attempt.
    pub identity: Option<Identity>,
    /// Network name learned from RPL_ISUPPORT.
    pub network: Option<String>,
    pub pending: PendingRequests,
    pub list: ListAccumulator,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nickname(&self) -> Option<&str> {
        self.identity.as_ref().map(|id| id.nickname.as_str())
    }

    /// Drop transient protocol state after the transport closes.
    ///
    /// The identity is kept so a later login can reuse it.
    pub fn reset(&mut self) {
        self.network = None;
        self.list.start();
    }
}
