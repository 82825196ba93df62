//! Outbound commands.
//!
//! [`Command`] builds the lines the client sends. Its `Display`
//! implementation produces the wire text without the terminator; the
//! [`LineCodec`](crate::LineCodec) adds that on write.

mod serialize;

/// Simple server queries sent as a bare command token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ServerQuery {
    /// `HELP`
    Help,
    /// `INFO`
    Info,
    /// `MOTD`
    Motd,
    /// `USERS`
    Users,
    /// `LIST`
    List,
}

impl ServerQuery {
    /// The command token for this query.
    pub fn token(self) -> &'static str {
        match self {
            ServerQuery::Help => "HELP",
            ServerQuery::Info => "INFO",
            ServerQuery::Motd => "MOTD",
            ServerQuery::Users => "USERS",
            ServerQuery::List => "LIST",
        }
    }
}

/// A line the client can send to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `NICK <nickname>`
    NICK(String),
    /// `USER <username> <mode> * :<realname>`
    USER {
        /// Username (ident).
        username: String,
        /// Numeric user mode bitmask (8 requests +i).
        mode: u8,
        /// Real name.
        realname: String,
    },
    /// `JOIN <channel>`
    JOIN(String),
    /// `PART <channel>`
    PART(String),
    /// `PRIVMSG <target> :<text>`
    PRIVMSG(String, String),
    /// `PONG <token>`, token echoed exactly as the PING carried it
    PONG(String),
    /// `QUIT :<reason>`
    QUIT(String),
    /// `<QUERY> ` (bare token followed by a space)
    Query(ServerQuery),
    /// A line passed through untouched.
    Raw(String),
}

impl Command {
    /// User mode bitmask requesting invisibility (+i).
    pub const MODE_INVISIBLE: u8 = 8;

    /// Build the `USER` line for an identity.
    pub fn user(username: impl Into<String>, realname: impl Into<String>, hidden: bool) -> Self {
        Command::USER {
            username: username.into(),
            mode: if hidden { Self::MODE_INVISIBLE } else { 0 },
            realname: realname.into(),
        }
    }
}
