//! Turning engine events into console lines.

use chrono::{DateTime, TimeZone};
use slirc_proto::ListEntry;

use crate::event::Event;

/// Format of the timestamp prefix.
const TIME_FORMAT: &str = "%H:%M:%S";

/// Lines shown for `event`, each prefixed with `now`.
pub fn render<Tz>(event: &Event, now: &DateTime<Tz>) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stamp = now.format(TIME_FORMAT).to_string();
    body(event)
        .into_iter()
        .map(|line| format!("[{stamp}] {line}"))
        .collect()
}

fn body(event: &Event) -> Vec<String> {
    match event {
        Event::Connected => vec!["*** Connected".to_string()],
        Event::ConnectFailed { reason } => vec![format!("*** Could not connect: {reason}")],
        Event::Disconnected { reason } => vec![format!("*** Disconnected ({reason})")],
        Event::Login(Ok(())) => vec!["*** Logged in".to_string()],
        Event::Login(Err(err)) => vec![format!("*** Login failed: {err}")],
        Event::Join(Ok(channel)) => vec![format!("*** Now talking in {channel}")],
        Event::Join(Err(err)) => vec![format!("*** Join failed: {err}")],
        Event::Chat(msg) => {
            if msg.conversation() == msg.nick {
                vec![format!("*{}* {}", msg.nick, msg.text)]
            } else {
                vec![format!("[{}] <{}> {}", msg.dest, msg.nick, msg.text)]
            }
        }
        Event::NetworkName(name) => vec![format!("*** Network: {name}")],
        Event::List(items) => {
            let entries: Vec<ListEntry> = items.iter().filter_map(|raw| ListEntry::parse(raw)).collect();
            let mut lines = Vec::with_capacity(entries.len() + 1);
            lines.push(format!("*** {} channel(s)", entries.len()));
            lines.extend(entries.iter().map(ToString::to_string));
            lines
        }
        Event::Display(text) => vec![text.clone()],
    }
}
