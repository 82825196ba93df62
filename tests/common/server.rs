//! Scripted fake IRC server.
//!
//! The test drives both sides: it accepts the client's connection, asserts
//! on what the client wrote and writes server lines back byte for byte.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

/// A listening fake server on an ephemeral local port.
pub struct TestServer {
    listener: TcpListener,
}

impl TestServer {
    /// Bind to `127.0.0.1:0`.
    pub async fn spawn() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener })
    }

    /// `host:port` the server listens on.
    pub fn address(&self) -> String {
        self.listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_default()
    }

    /// Accept the next client.
    pub async fn accept(&self) -> anyhow::Result<ServerPeer> {
        let (stream, _) = timeout(Duration::from_secs(5), self.listener.accept()).await??;
        Ok(ServerPeer::new(stream))
    }
}

/// The server's end of one client connection.
pub struct ServerPeer {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl ServerPeer {
    fn new(stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        }
    }

    /// Write bytes exactly as given; no terminator is added.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Write one CRLF-terminated line.
    pub async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.send_bytes(format!("{line}\r\n").as_bytes()).await
    }

    /// Read the next line the client wrote, without its terminator.
    pub async fn recv_line(&mut self) -> anyhow::Result<String> {
        self.recv_line_timeout(Duration::from_secs(5)).await
    }

    /// Read a line with a timeout. A closed connection is an error.
    pub async fn recv_line_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("client closed the connection");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Expect the client's NICK and USER lines, returning them.
    pub async fn expect_login(&mut self) -> anyhow::Result<(String, String)> {
        let nick = self.recv_line().await?;
        let user = self.recv_line().await?;
        anyhow::ensure!(nick.starts_with("NICK "), "expected NICK, got {nick:?}");
        anyhow::ensure!(user.starts_with("USER "), "expected USER, got {user:?}");
        Ok((nick, user))
    }

    /// Wait until the client closes its side.
    #[allow(dead_code)]
    pub async fn expect_closed(&mut self) -> anyhow::Result<()> {
        loop {
            let mut line = String::new();
            let n = timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await??;
            if n == 0 {
                return Ok(());
            }
        }
    }

    /// Close both halves, as a server dropping the client would.
    #[allow(dead_code)]
    pub async fn close(mut self) -> anyhow::Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
