//! IRC numeric reply codes the client reacts to.
//!
//! Response codes are three-digit numbers sent by servers in place of a
//! named command. Only the codes the dispatcher handles specially are
//! listed; every other code still parses (as
//! [`CommandToken::Numeric`](crate::CommandToken::Numeric)) and is shown as
//! a plain display line.
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol
//! - Modern IRC documentation: <https://modern.ircdocs.horse/>

#![allow(non_camel_case_types)]

/// IRC server response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    /// 001 - Welcome to the IRC network; registration succeeded
    RPL_WELCOME = 1,
    /// 005 - Server supported features, carries `NETWORK=<name>`
    ///
    /// Historically numbered as the bounce reply, which is why older client
    /// code calls it that.
    RPL_ISUPPORT = 5,
    /// 321 - Start of a LIST reply
    RPL_LISTSTART = 321,
    /// 322 - One channel of a LIST reply
    RPL_LIST = 322,
    /// 323 - End of a LIST reply
    RPL_LISTEND = 323,
    /// 353 - NAMES reply
    RPL_NAMREPLY = 353,
    /// 366 - End of NAMES
    RPL_ENDOFNAMES = 366,
    /// 432 - Erroneous nickname
    ERR_ERRONEUSNICKNAME = 432,
    /// 433 - Nickname is already in use
    ERR_NICKNAMEINUSE = 433,
    /// 471 - Cannot join channel (+l)
    ERR_CHANNELISFULL = 471,
    /// 479 - Illegal channel name
    ///
    /// Not part of RFC 2812. Some servers send it for a JOIN with a badly
    /// formed channel name; treat it as a server-specific extension.
    ERR_BADCHANNAME = 479,
}

impl Response {
    const ALL: [Response; 11] = [
        Response::RPL_WELCOME,
        Response::RPL_ISUPPORT,
        Response::RPL_LISTSTART,
        Response::RPL_LIST,
        Response::RPL_LISTEND,
        Response::RPL_NAMREPLY,
        Response::RPL_ENDOFNAMES,
        Response::ERR_ERRONEUSNICKNAME,
        Response::ERR_NICKNAMEINUSE,
        Response::ERR_CHANNELISFULL,
        Response::ERR_BADCHANNAME,
    ];

    /// Numeric value of this reply.
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Look up a known reply by its numeric value.
    pub fn from_code(code: u16) -> Option<Response> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }
}
