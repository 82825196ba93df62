//! Line-oriented console front-end.
//!
//! Reads commands from stdin, drives one connection, and prints every engine
//! event as a timestamped line on stdout.

mod input;
mod render;

pub use input::{InputError, UserCommand};
pub use render::render;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context as _;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::event::{self, Event, EventReceiver};
use crate::network::{Connection, Registry};
use crate::pending::PendingReply;

/// What the input loop does after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Console state for one connection.
struct Console<W> {
    conn: Arc<Connection>,
    /// Destination of plain text.
    target: Option<String>,
    quit_message: String,
    out: W,
}

impl<W: Write> Console<W> {
    fn print(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    fn show(&mut self, event: &Event) -> io::Result<()> {
        if let Event::Join(Ok(channel)) = event {
            self.target = Some(channel.clone());
        }
        let now = chrono::Local::now();
        for line in render(event, &now) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }

    fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let command = match UserCommand::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(err) => {
                self.print(&format!("*** {err}"))?;
                return Ok(Flow::Continue);
            }
        };

        let result = match command {
            UserCommand::Join(channel) => self.conn.join(&channel).map(drop_reply),
            UserCommand::Part(channel) => match channel.or_else(|| self.target.clone()) {
                Some(channel) => {
                    if self.target.as_deref() == Some(channel.as_str()) {
                        self.target = None;
                    }
                    self.conn.leave(&channel)
                }
                None => return self.print("*** Not in a channel").map(|_| Flow::Continue),
            },
            UserCommand::Msg { dest, text } => self.conn.privmsg(&dest, &text),
            UserCommand::Target(dest) => {
                self.print(&format!("*** Talking to {dest}"))?;
                self.target = Some(dest);
                Ok(())
            }
            UserCommand::Server(query) => self.conn.query(query),
            UserCommand::Raw(line) => self.conn.send_raw(&line),
            UserCommand::Quit(reason) => {
                let reason = reason.unwrap_or_else(|| self.quit_message.clone());
                self.conn.quit(&reason);
                return Ok(Flow::Exit);
            }
            UserCommand::Say(text) => match self.target.clone() {
                Some(target) => self.conn.privmsg(&target, &text),
                None => return self.print("*** No target; use /join or /query").map(|_| Flow::Continue),
            },
        };

        if let Err(err) = result {
            debug!(code = err.error_code(), error = %err, "Command failed");
            self.print(&format!("*** {err}"))?;
        }
        Ok(Flow::Continue)
    }

    /// Print whatever events are already queued.
    fn drain(&mut self, events: &mut EventReceiver) -> io::Result<()> {
        while let Ok((_, event)) = events.try_recv() {
            self.show(&event)?;
        }
        Ok(())
    }
}

fn drop_reply<T>(_reply: PendingReply<T>) {}

/// Run the console until the connection ends or input is closed.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let (tx, mut events) = event::channel();
    let registry =
        Registry::new(Arc::new(tx)).with_read_buffer_size(config.client.read_buffer_size);
    let quit_message = config.client.quit_message.clone();

    let connected = registry
        .connect_and_login(&config.server.address, config.identity.to_identity())
        .await;
    let (conn, login) = match connected {
        Ok(pair) => pair,
        Err(err) => {
            warn!(code = err.error_code(), error = %err, "Connect failed");
            let mut out = io::stdout();
            while let Ok((_, event)) = events.try_recv() {
                for line in render(&event, &chrono::Local::now()) {
                    writeln!(out, "{line}")?;
                }
            }
            return Err(err).with_context(|| format!("cannot reach {}", config.server.address));
        }
    };

    spawn_autojoin(Arc::clone(&conn), login, config.client.autojoin.clone());

    let mut console = Console {
        conn: Arc::clone(&conn),
        target: None,
        quit_message: quit_message.clone(),
        out: io::stdout(),
    };
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            received = events.recv() => {
                let Some((_, event)) = received else { break };
                console.show(&event)?;
                if matches!(event, Event::Disconnected { .. }) {
                    break;
                }
            }
            line = stdin.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        if console.handle_line(&line)? == Flow::Exit {
                            break;
                        }
                    }
                    None => {
                        info!("Input closed");
                        stdin_open = false;
                        if !conn.is_connected() {
                            break;
                        }
                        conn.quit(&quit_message);
                    }
                }
            }
        }
    }

    registry.shutdown(&quit_message);
    console.drain(&mut events)?;
    Ok(())
}

/// Join the configured channels one at a time once the login succeeds.
///
/// A channel the server refuses is skipped; any other failure stops autojoin.
fn spawn_autojoin(conn: Arc<Connection>, login: PendingReply<()>, channels: Vec<String>) {
    if channels.is_empty() {
        return;
    }
    tokio::spawn(async move {
        if login.await.is_err() {
            return;
        }
        for channel in channels {
            match conn.join(&channel) {
                Ok(reply) => match reply.await {
                    Ok(_) => {}
                    Err(err) if err.is_rejection() => {
                        warn!(channel = %channel, error = %err, "Autojoin refused");
                    }
                    Err(err) => {
                        warn!(channel = %channel, error = %err, "Autojoin stopped");
                        return;
                    }
                },
                Err(err) => {
                    warn!(channel = %channel, code = err.error_code(), error = %err, "Autojoin stopped");
                    return;
                }
            }
        }
    });
}
