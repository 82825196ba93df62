//! Channel list items (RPL_LIST / 322).

use std::fmt;

use crate::message::ParsedLine;

/// One channel from a LIST reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListEntry {
    /// Channel name.
    pub channel: String,
    /// Visible member count.
    pub users: u32,
    /// Channel topic, empty when none was sent.
    pub topic: String,
}

impl ListEntry {
    /// Parse a raw `322` line.
    ///
    /// Layout is `[:server] 322 <target> <channel> <count> [:<topic>]`.
    /// Returns `None` when the channel or a numeric count is missing.
    pub fn parse(raw: &str) -> Option<ListEntry> {
        Self::from_line(&ParsedLine::parse(raw))
    }

    /// Build an entry from an already parsed `322` line.
    pub fn from_line(line: &ParsedLine) -> Option<ListEntry> {
        let mut args = line.params.iter().skip(1);
        let channel = args.next()?.clone();
        let users = args.next()?.parse().ok()?;

        // Some servers send the topic unprefixed; fold leftovers back in.
        let mut topic: Vec<&str> = args.map(String::as_str).collect();
        if let Some(trailing) = line.trailing.as_deref() {
            topic.push(trailing);
        }

        Some(ListEntry {
            channel,
            users,
            topic: topic.join(" "),
        })
    }
}

impl fmt::Display for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<20} {:>5}  {}", self.channel, self.users, self.topic)
    }
}
