use std::fmt::{self, Display, Formatter};

use crate::response::Response;

/// The command token of a line: a numeric reply code or a named command.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandToken {
    /// Three-digit server reply code (e.g. `001`).
    Numeric(u16),
    /// Named command, normalized to upper case (e.g. `PRIVMSG`).
    Named(String),
}

impl CommandToken {
    /// Classify a raw command token.
    ///
    /// A non-empty token made only of ASCII digits is a reply code; anything
    /// else is a named command, compared case-insensitively.
    pub fn from_token(token: &str) -> Self {
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(code) = token.parse::<u16>() {
                return CommandToken::Numeric(code);
            }
        }
        CommandToken::Named(token.to_ascii_uppercase())
    }

    /// The reply code, if this is a numeric reply.
    pub fn code(&self) -> Option<u16> {
        match self {
            CommandToken::Numeric(code) => Some(*code),
            CommandToken::Named(_) => None,
        }
    }

    /// The known reply this code maps to, if any.
    pub fn response(&self) -> Option<Response> {
        self.code().and_then(Response::from_code)
    }

    /// The command name, if this is a named command.
    pub fn name(&self) -> Option<&str> {
        match self {
            CommandToken::Named(name) => Some(name),
            CommandToken::Numeric(_) => None,
        }
    }
}

impl Display for CommandToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CommandToken::Numeric(code) => write!(f, "{code:03}"),
            CommandToken::Named(name) => f.write_str(name),
        }
    }
}

/// One inbound protocol line, split into its parts.
///
/// Constructed per line by [`ParsedLine::parse`] and consumed by the
/// dispatcher; the raw text is kept for display and list accumulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedLine {
    /// The line exactly as received, without terminator.
    pub raw: String,
    /// Origin of the line (`nick!user@host` or a server name), without the
    /// leading `:`.
    pub prefix: Option<String>,
    /// Reply code or command name.
    pub command: CommandToken,
    /// Space-separated middle parameters.
    pub params: Vec<String>,
    /// Final parameter introduced by `:`, spaces included.
    pub trailing: Option<String>,
}

impl ParsedLine {
    /// Nickname of the sender: the prefix up to the first `!`.
    ///
    /// A server prefix has no `!` and is returned whole.
    pub fn source_nick(&self) -> Option<&str> {
        self.prefix
            .as_deref()
            .map(|prefix| prefix.split_once('!').map_or(prefix, |(nick, _)| nick))
    }

    /// Parameter `index` counting the trailing parameter last.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args().nth(index)
    }

    /// All parameters in order, trailing last.
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .map(String::as_str)
            .chain(self.trailing.as_deref())
    }

    /// The trailing parameter, or an empty string when the line had none.
    pub fn text(&self) -> &str {
        self.trailing.as_deref().unwrap_or("")
    }

    /// Whether this line is a numeric reply.
    pub fn is_numeric(&self) -> bool {
        matches!(self.command, CommandToken::Numeric(_))
    }

    /// Human-readable portion of the line.
    ///
    /// The prefix is dropped. For numeric replies the code and the target
    /// parameter are dropped too, along with one leading `:`.
    pub fn display_text(&self) -> &str {
        if !self.is_numeric() {
            return strip_prefix(&self.raw);
        }
        let after_target = self
            .rest()
            .split_once(' ')
            .map_or("", |(_, rest)| rest.trim_start_matches(' '));
        after_target.strip_prefix(':').unwrap_or(after_target)
    }

    /// Everything after the command token, exactly as received apart from
    /// the separating spaces.
    ///
    /// `PING :abc123` gives `:abc123`.
    pub fn rest(&self) -> &str {
        strip_prefix(&self.raw)
            .split_once(' ')
            .map_or("", |(_, rest)| rest.trim_start_matches(' '))
    }
}

/// Drop a leading `:prefix ` from a raw line, along with the spaces that
/// separate it from the command.
pub(crate) fn strip_prefix(raw: &str) -> &str {
    let rest = if raw.starts_with(':') {
        raw.split_once(' ').map_or("", |(_, rest)| rest)
    } else {
        raw
    };
    rest.trim_start_matches(' ')
}
