//! Wire serialization for [`Command`].

use std::fmt::{self, Display, Formatter};

use super::Command;

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Command::NICK(nick) => write!(f, "NICK {nick}"),
            Command::USER {
                username,
                mode,
                realname,
            } => write!(f, "USER {username} {mode} * :{realname}"),
            Command::JOIN(channel) => write!(f, "JOIN {channel}"),
            Command::PART(channel) => write!(f, "PART {channel}"),
            Command::PRIVMSG(target, text) => write!(f, "PRIVMSG {target} :{text}"),
            Command::PONG(token) => write!(f, "PONG {token}"),
            Command::QUIT(reason) => write!(f, "QUIT :{reason}"),
            Command::Query(query) => write!(f, "{} ", query.token()),
            Command::Raw(line) => f.write_str(line),
        }
    }
}

impl From<Command> for String {
    fn from(cmd: Command) -> String {
        cmd.to_string()
    }
}
