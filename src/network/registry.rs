//! Registry of live connections.
//!
//! Owned by the application root and passed by reference to whatever issues
//! connect, join or send calls. Membership lives in a `DashMap` so callers
//! and connection tasks never contend on one global lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::{debug, info};

use super::{Connection, ConnectionId, DEFAULT_READ_BUFFER_SIZE, ServerAddr};
use crate::dispatch::Dispatcher;
use crate::error::ClientError;
use crate::event::EventSink;
use crate::pending::PendingReply;
use crate::session::Identity;

/// The set of connections owned by one client.
pub struct Registry {
    connections: DashMap<ConnectionId, Arc<Connection>>,
    next_id: AtomicU64,
    dispatcher: Arc<Dispatcher>,
    sink: Arc<dyn EventSink>,
    read_buffer_size: usize,
}

impl Registry {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            connections: DashMap::new(),
            next_id: AtomicU64::new(1),
            dispatcher: Arc::new(Dispatcher::new()),
            sink,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    /// Socket read size for connections created from now on.
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Create and register a connection without connecting it.
    pub fn create(&self, addr: ServerAddr) -> Arc<Connection> {
        let id = ConnectionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let conn = Arc::new(
            Connection::new(id, addr, Arc::clone(&self.dispatcher), Arc::clone(&self.sink))
                .with_read_buffer_size(self.read_buffer_size),
        );
        self.connections.insert(id, Arc::clone(&conn));
        debug!(conn = %id, addr = %conn.addr(), "Connection registered");
        conn
    }

    /// Connect to `address` and log in as `identity`.
    ///
    /// The connection is registered before connecting and stays registered
    /// if the connect fails; no login is issued in that case. On success
    /// the returned reply resolves with the login outcome.
    pub async fn connect_and_login(
        &self,
        address: &str,
        identity: Identity,
    ) -> Result<(Arc<Connection>, PendingReply<()>), ClientError> {
        let addr = ServerAddr::parse(address)?;
        let conn = self.create(addr);
        conn.connect().await?;
        let login = conn.login(identity)?;
        Ok((conn, login))
    }

    /// Issue a pending join on a registered connection.
    pub fn join_channel(
        &self,
        id: ConnectionId,
        channel: &str,
    ) -> Result<PendingReply<String>, ClientError> {
        self.require(id)?.join(channel)
    }

    /// Leave a channel; nothing is tracked.
    pub fn leave_channel(&self, id: ConnectionId, channel: &str) -> Result<(), ClientError> {
        self.require(id)?.leave(channel)
    }

    pub fn get(&self, id: ConnectionId) -> Option<Arc<Connection>> {
        self.connections.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    fn require(&self, id: ConnectionId) -> Result<Arc<Connection>, ClientError> {
        self.get(id).ok_or(ClientError::UnknownConnection(id))
    }

    /// Unregister a connection, disconnecting it.
    pub fn remove(&self, id: ConnectionId) -> Option<Arc<Connection>> {
        let (_, conn) = self.connections.remove(&id)?;
        conn.disconnect();
        debug!(conn = %id, "Connection removed");
        Some(conn)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Registered connection ids in ascending order.
    pub fn ids(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self.connections.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Quit and disconnect every connection, emptying the registry.
    pub fn shutdown(&self, quit_message: &str) {
        info!(count = self.len(), "Shutting down connections");
        for id in self.ids() {
            if let Some((_, conn)) = self.connections.remove(&id) {
                conn.quit(quit_message);
            }
        }
    }
}
