//! Test client.
//!
//! Wraps a [`Registry`] with a channel-backed event sink so tests can drive
//! connections and assert on the events they produce.

use slirc_client::event::{self, EventReceiver};
use slirc_client::{Event, Registry};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// A registry plus the receiving end of its events.
pub struct TestClient {
    pub registry: Registry,
    events: EventReceiver,
}

impl TestClient {
    pub fn new() -> Self {
        let (tx, events) = event::channel();
        Self {
            registry: Registry::new(Arc::new(tx)),
            events,
        }
    }

    /// Use a tiny read size so replies arrive split across many reads.
    #[allow(dead_code)]
    pub fn with_read_buffer_size(size: usize) -> Self {
        let (tx, events) = event::channel();
        Self {
            registry: Registry::new(Arc::new(tx)).with_read_buffer_size(size),
            events,
        }
    }

    /// Receive the next event.
    pub async fn next_event(&mut self) -> anyhow::Result<Event> {
        self.next_event_timeout(Duration::from_secs(5)).await
    }

    /// Receive an event with a timeout.
    pub async fn next_event_timeout(&mut self, dur: Duration) -> anyhow::Result<Event> {
        match timeout(dur, self.events.recv()).await? {
            Some((_, event)) => Ok(event),
            None => anyhow::bail!("event channel closed"),
        }
    }

    /// Receive events until `predicate` matches, returning all of them.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Event>>
    where
        F: FnMut(&Event) -> bool,
    {
        let mut events = Vec::new();
        loop {
            let event = self.next_event().await?;
            let done = predicate(&event);
            events.push(event);
            if done {
                return Ok(events);
            }
        }
    }

    /// Assert that no event arrives within `dur`.
    #[allow(dead_code)]
    pub async fn expect_quiet(&mut self, dur: Duration) -> anyhow::Result<()> {
        match timeout(dur, self.events.recv()).await {
            Err(_) => Ok(()),
            Ok(event) => anyhow::bail!("unexpected event: {event:?}"),
        }
    }
}
