//! Connection - one client session with one server.
//!
//! Each connected Connection runs two Tokio tasks:
//!
//! ```text
//!   read task                                  write task
//!   ─────────                                  ──────────
//!   select! { shutdown | read_buf }            outgoing.recv()
//!        │ chunk                                    │ line
//!        ▼                                          ▼
//!   [lock] LineFramer → ParsedLine             FramedWrite<LineCodec>
//!          → Dispatcher → actions ──Send──▶ outgoing queue
//!                              └─Emit──▶ EventSink (after unlock)
//! ```
//!
//! All protocol state sits behind one mutex shared by the read task and the
//! caller-facing methods, so a reply is always matched against the pending
//! requests as they stood when its line arrived.

use std::fmt;
use std::sync::Arc;

use bytes::BytesMut;
use futures_util::SinkExt;
use parking_lot::{Mutex, MutexGuard, ReentrantMutex};
use slirc_proto::{Command, LineCodec, LineFramer, ServerQuery};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio_util::codec::FramedWrite;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, trace, warn};

use super::{ConnectionId, ServerAddr};
use crate::dispatch::{Action, Dispatcher};
use crate::error::{ClientError, RequestError};
use crate::event::{Event, EventSink};
use crate::pending::{PendingReply, RequestKind};
use crate::session::{Identity, Session};
use crate::telemetry::spans;

/// Size of each socket read.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 256;

/// Lifecycle of a connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        })
    }
}

/// Mutable state shared by the read task and callers.
struct Inner {
    state: ConnectionState,
    session: Session,
    framer: LineFramer,
    /// Queue feeding the write task; `None` unless connected.
    writer: Option<mpsc::UnboundedSender<String>>,
    /// Cancels the in-flight connect or read.
    shutdown: Option<CancellationToken>,
    /// Bumped on every teardown so tasks from an earlier transport can tell
    /// they are stale.
    epoch: u64,
}

/// A connection to one IRC server.
pub struct Connection {
    id: ConnectionId,
    addr: ServerAddr,
    read_buffer_size: usize,
    dispatcher: Arc<Dispatcher>,
    sink: Arc<dyn EventSink>,
    inner: Mutex<Inner>,
    /// Held from the end of a state change until its events are out, so
    /// events leave in the order the transitions happened.
    emit_order: ReentrantMutex<()>,
}

impl Connection {
    pub fn new(
        id: ConnectionId,
        addr: ServerAddr,
        dispatcher: Arc<Dispatcher>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            id,
            addr,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            dispatcher,
            sink,
            inner: Mutex::new(Inner {
                state: ConnectionState::Disconnected,
                session: Session::new(),
                framer: LineFramer::new(),
                writer: None,
                shutdown: None,
                epoch: 0,
            }),
            emit_order: ReentrantMutex::new(()),
        }
    }

    /// Set the socket read size (at least one byte).
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn addr(&self) -> &ServerAddr {
        &self.addr
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.lock().state
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Nickname of the last login attempt.
    pub fn nickname(&self) -> Option<String> {
        self.inner.lock().session.nickname().map(str::to_string)
    }

    /// Network name announced by the server, once known.
    pub fn network_name(&self) -> Option<String> {
        self.inner.lock().session.network.clone()
    }

    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.inner.lock().session.pending.is_pending(kind)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Open the transport and start the read and write tasks.
    ///
    /// Emits [`Event::Connected`] on success and [`Event::ConnectFailed`] on
    /// a transport error. A [`disconnect`](Self::disconnect) while the
    /// connect is in flight aborts it with
    /// [`RequestError::ConnectionClosed`].
    pub async fn connect(self: &Arc<Self>) -> Result<(), ClientError> {
        let (epoch, shutdown) = {
            let mut inner = self.inner.lock();
            if inner.state != ConnectionState::Disconnected {
                return Err(ClientError::AlreadyActive(inner.state));
            }
            inner.state = ConnectionState::Connecting;
            inner.framer.clear();
            let token = CancellationToken::new();
            inner.shutdown = Some(token.clone());
            (inner.epoch, token)
        };

        info!(conn = %self.id, addr = %self.addr, "Connecting");
        let attempt = tokio::select! {
            _ = shutdown.cancelled() => None,
            result = TcpStream::connect((self.addr.host(), self.addr.port())) => Some(result),
        };

        match attempt {
            None => Err(RequestError::ConnectionClosed.into()),
            Some(Err(err)) => {
                let mut inner = self.inner.lock();
                if inner.epoch != epoch {
                    // Torn down while the connect was failing.
                    return Err(RequestError::ConnectionClosed.into());
                }
                inner.state = ConnectionState::Disconnected;
                inner.shutdown = None;
                inner.epoch += 1;
                warn!(conn = %self.id, addr = %self.addr, error = %err, "Connect failed");
                let reason = err.to_string();
                self.release_and_emit(inner, vec![Event::ConnectFailed { reason }]);
                Err(ClientError::Transport(err))
            }
            Some(Ok(stream)) => self.start(stream, epoch, shutdown),
        }
    }

    fn start(
        self: &Arc<Self>,
        stream: TcpStream,
        epoch: u64,
        shutdown: CancellationToken,
    ) -> Result<(), ClientError> {
        if let Err(err) = stream.set_nodelay(true) {
            debug!(conn = %self.id, error = %err, "Failed to set TCP_NODELAY");
        }
        let (reader, writer) = stream.into_split();
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();

        let mut inner = self.inner.lock();
        if inner.epoch != epoch || inner.state != ConnectionState::Connecting {
            return Err(RequestError::ConnectionClosed.into());
        }
        inner.state = ConnectionState::Connected;
        inner.writer = Some(outgoing_tx);
        info!(conn = %self.id, addr = %self.addr, "Connected");
        self.release_and_emit(inner, vec![Event::Connected]);

        // Spawned after the Connected event so nothing read off the socket
        // can overtake it. A teardown in between leaves both tasks with a
        // stale epoch, a closed queue and a cancelled token.
        let span = spans::connection(self.id, &self.addr);
        tokio::spawn(
            Arc::clone(self)
                .write_loop(writer, outgoing_rx, epoch)
                .instrument(span.clone()),
        );
        tokio::spawn(
            Arc::clone(self)
                .read_loop(reader, epoch, shutdown)
                .instrument(span),
        );
        Ok(())
    }

    /// Tear the connection down.
    ///
    /// Clears buffered input, fails every pending request with
    /// [`RequestError::ConnectionClosed`], closes the transport and emits
    /// [`Event::Disconnected`]. Does nothing when already disconnected.
    pub fn disconnect(&self) {
        self.teardown("Disconnected by client");
    }

    /// Send `QUIT :<reason>` and disconnect.
    ///
    /// The QUIT line is still flushed by the write task after teardown.
    pub fn quit(&self, reason: &str) {
        let mut inner = self.inner.lock();
        if let Err(err) = self.write_locked(&inner, Command::QUIT(reason.to_string()).into()) {
            debug!(conn = %self.id, error = %err, "QUIT not sent");
        }
        let events = self.shutdown_locked(&mut inner, "Quit");
        self.release_and_emit(inner, events);
    }

    fn teardown(&self, reason: &str) {
        let mut inner = self.inner.lock();
        let events = self.shutdown_locked(&mut inner, reason);
        self.release_and_emit(inner, events);
    }

    /// Transport failure on the transport generation `epoch`.
    fn fail(&self, epoch: u64, reason: String) {
        let mut inner = self.inner.lock();
        if inner.epoch != epoch {
            return;
        }
        let mut events = vec![Event::Display(format!(
            "Connection to {} lost: {reason}",
            self.addr
        ))];
        events.extend(self.shutdown_locked(&mut inner, &reason));
        self.release_and_emit(inner, events);
    }

    fn shutdown_locked(&self, inner: &mut Inner, reason: &str) -> Vec<Event> {
        if inner.state == ConnectionState::Disconnected {
            return Vec::new();
        }

        inner.framer.clear();
        let mut events: Vec<Event> = inner
            .session
            .pending
            .fail_all(RequestError::ConnectionClosed)
            .into_iter()
            .map(|kind| match kind {
                RequestKind::Login => Event::Login(Err(RequestError::ConnectionClosed)),
                RequestKind::Join => Event::Join(Err(RequestError::ConnectionClosed)),
            })
            .collect();
        inner.session.reset();

        if let Some(token) = inner.shutdown.take() {
            token.cancel();
        }
        // Dropping the queue lets the write task flush what is left and
        // close its half of the socket.
        inner.writer = None;
        inner.state = ConnectionState::Disconnected;
        inner.epoch += 1;

        info!(conn = %self.id, reason = %reason, "Disconnected");
        events.push(Event::Disconnected {
            reason: reason.to_string(),
        });
        events
    }

    // ========================================================================
    // Outbound
    // ========================================================================

    /// Queue one line for the server. The codec appends the terminator.
    pub fn send(&self, line: impl Into<String>) -> Result<(), ClientError> {
        let inner = self.inner.lock();
        self.write_locked(&inner, line.into())
    }

    fn write_locked(&self, inner: &Inner, line: String) -> Result<(), ClientError> {
        match (inner.state, &inner.writer) {
            (ConnectionState::Connected, Some(writer)) => {
                trace!(conn = %self.id, line = %line, ">>");
                writer.send(line).map_err(|_| ClientError::NotConnected)
            }
            _ => Err(ClientError::NotConnected),
        }
    }

    /// Register with the server.
    ///
    /// Issues the pending login, then sends `NICK` and `USER`. The reply
    /// resolves on 001, 432, 433 or disconnect.
    pub fn login(&self, identity: Identity) -> Result<PendingReply<()>, ClientError> {
        let mut inner = self.inner.lock();
        if inner.state != ConnectionState::Connected {
            return Err(ClientError::NotConnected);
        }
        let reply = inner.session.pending.login().issue()?;

        info!(conn = %self.id, nick = %identity.nickname, "Logging in");
        let sent = self
            .write_locked(&inner, Command::NICK(identity.nickname.clone()).into())
            .and_then(|()| {
                self.write_locked(
                    &inner,
                    Command::user(&identity.username, &identity.realname, identity.hidden).into(),
                )
            });
        if let Err(err) = sent {
            // Nothing will answer a request that never went out.
            inner.session.pending.login().fail(RequestError::ConnectionClosed);
            return Err(err);
        }
        inner.session.identity = Some(identity);
        Ok(reply)
    }

    /// Join a channel.
    ///
    /// Fails with [`RequestError::Conflict`] (and sends nothing) while
    /// another join is pending.
    pub fn join(&self, channel: &str) -> Result<PendingReply<String>, ClientError> {
        let mut inner = self.inner.lock();
        if inner.state != ConnectionState::Connected {
            return Err(ClientError::NotConnected);
        }
        let reply = inner.session.pending.join().issue()?;
        debug!(conn = %self.id, channel = %channel, "Joining");
        if let Err(err) = self.write_locked(&inner, Command::JOIN(channel.to_string()).into()) {
            inner.session.pending.join().fail(RequestError::ConnectionClosed);
            return Err(err);
        }
        Ok(reply)
    }

    /// Leave a channel. Not tracked; the server's acknowledgment is ignored.
    pub fn leave(&self, channel: &str) -> Result<(), ClientError> {
        self.send(Command::PART(channel.to_string()))
    }

    pub fn privmsg(&self, dest: &str, text: &str) -> Result<(), ClientError> {
        self.send(Command::PRIVMSG(dest.to_string(), text.to_string()))
    }

    pub fn query(&self, query: ServerQuery) -> Result<(), ClientError> {
        self.send(Command::Query(query))
    }

    /// Send a line as typed, minus anything after an embedded line break.
    pub fn send_raw(&self, line: &str) -> Result<(), ClientError> {
        self.send(Command::Raw(line.to_string()))
    }

    // ========================================================================
    // Tasks
    // ========================================================================

    async fn read_loop(
        self: Arc<Self>,
        mut reader: OwnedReadHalf,
        epoch: u64,
        shutdown: CancellationToken,
    ) {
        let mut buf = BytesMut::with_capacity(self.read_buffer_size);
        loop {
            buf.clear();
            let read = tokio::select! {
                _ = shutdown.cancelled() => break,
                read = reader.read_buf(&mut buf) => read,
            };
            match read {
                Ok(0) => {
                    self.fail(epoch, "connection closed by server".to_string());
                    break;
                }
                Ok(n) => {
                    trace!(bytes = n, "Read");
                    if !self.process_chunk(epoch, &buf) {
                        break;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "Read failed");
                    self.fail(epoch, err.to_string());
                    break;
                }
            }
        }
        debug!("Read loop finished");
    }

    async fn write_loop(
        self: Arc<Self>,
        writer: OwnedWriteHalf,
        mut outgoing: mpsc::UnboundedReceiver<String>,
        epoch: u64,
    ) {
        let mut framed = FramedWrite::new(writer, LineCodec::new());
        while let Some(line) = outgoing.recv().await {
            if let Err(err) = framed.send(line).await {
                warn!(error = %err, "Write failed");
                self.fail(epoch, err.to_string());
                return;
            }
        }
        if let Err(err) = framed.close().await {
            debug!(error = %err, "Failed to close write half");
        }
        debug!("Write loop finished");
    }

    /// Frame and dispatch one chunk read on transport `epoch`.
    ///
    /// Returns `false` once the connection is no longer reading.
    fn process_chunk(&self, epoch: u64, chunk: &[u8]) -> bool {
        let mut inner = self.inner.lock();
        if inner.epoch != epoch || inner.state != ConnectionState::Connected {
            return false;
        }
        inner.framer.push(chunk);
        let mut events = Vec::new();
        let keep_reading = self.drain_lines(&mut inner, &mut events);
        self.release_and_emit(inner, events);
        keep_reading
    }

    fn drain_lines(&self, inner: &mut Inner, events: &mut Vec<Event>) -> bool {
        while let Some(raw) = inner.framer.next_line() {
            trace!(conn = %self.id, line = %raw, "<<");
            for action in self.dispatcher.run(&mut inner.session, &raw) {
                match action {
                    Action::Send(line) => {
                        if let Err(err) = self.write_locked(inner, line) {
                            debug!(conn = %self.id, error = %err, "Reply not sent");
                        }
                    }
                    Action::Emit(event) => events.push(event),
                    Action::Disconnect(reason) => {
                        events.extend(self.shutdown_locked(inner, &reason));
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Unlock the state, then hand `events` to the sink.
    ///
    /// The order lock is taken before the state lock is released, so a
    /// transition on another thread cannot get its events out first.
    fn release_and_emit(&self, inner: MutexGuard<'_, Inner>, events: Vec<Event>) {
        if events.is_empty() {
            return;
        }
        let _order = self.emit_order.lock();
        drop(inner);
        for event in events {
            self.sink.emit(self.id, event);
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("addr", &self.addr)
            .field("state", &self.state())
            .finish()
    }
}
