//! Parsing of lines typed at the console.

use slirc_proto::ServerQuery;
use thiserror::Error;

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// `/join <channel>`
    Join(String),
    /// `/part [channel]`; without a channel, the current target is left.
    Part(Option<String>),
    /// `/msg <dest> <text>`
    Msg { dest: String, text: String },
    /// `/query <dest>`: make `dest` the target of plain text.
    Target(String),
    /// `/help`, `/info`, `/motd`, `/users`, `/list`
    Server(ServerQuery),
    /// `/raw <line>`
    Raw(String),
    /// `/quit [reason]`
    Quit(Option<String>),
    /// Plain text for the current target. A leading `//` sends a literal `/`.
    Say(String),
}

/// Console input that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("unknown command: /{0}")]
    Unknown(String),
}

impl UserCommand {
    /// Parse one console line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<UserCommand>, InputError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(None);
        }

        let Some(body) = line.strip_prefix('/') else {
            return Ok(Some(UserCommand::Say(line.to_string())));
        };
        if body.starts_with('/') {
            return Ok(Some(UserCommand::Say(body.to_string())));
        }

        let (name, rest) = match body.split_once(' ') {
            Some((name, rest)) => (name, rest.trim()),
            None => (body, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        let command = match name.to_ascii_lowercase().as_str() {
            "join" | "j" => {
                let channel = first_word(rest).ok_or(InputError::Usage("/join <#channel>"))?;
                UserCommand::Join(channel.to_string())
            }
            "part" | "leave" => UserCommand::Part(first_word(rest).map(str::to_string)),
            "msg" => {
                let (dest, text) = rest
                    .split_once(' ')
                    .map(|(dest, text)| (dest, text.trim_start()))
                    .filter(|(_, text)| !text.is_empty())
                    .ok_or(InputError::Usage("/msg <target> <text>"))?;
                UserCommand::Msg {
                    dest: dest.to_string(),
                    text: text.to_string(),
                }
            }
            "query" => {
                let dest = first_word(rest).ok_or(InputError::Usage("/query <target>"))?;
                UserCommand::Target(dest.to_string())
            }
            "help" => UserCommand::Server(ServerQuery::Help),
            "info" => UserCommand::Server(ServerQuery::Info),
            "motd" => UserCommand::Server(ServerQuery::Motd),
            "users" => UserCommand::Server(ServerQuery::Users),
            "list" => UserCommand::Server(ServerQuery::List),
            "raw" | "quote" => UserCommand::Raw(arg.ok_or(InputError::Usage("/raw <line>"))?),
            "quit" | "exit" => UserCommand::Quit(arg),
            other => return Err(InputError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn first_word(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}
