//! Lenient line parser.
//!
//! Grammar: `[':' prefix ' '] command {' ' middle} [' :' trailing]`.
//! Anything that does not fit degrades to a partial parse; one bad line must
//! never stop the read loop, so there is no error path here.

use std::str::FromStr;

use super::types::{CommandToken, ParsedLine};

impl ParsedLine {
    /// Parse one line (terminator already removed).
    pub fn parse(line: &str) -> ParsedLine {
        let mut rest = line;

        let prefix = match rest.strip_prefix(':') {
            Some(after_marker) => match after_marker.split_once(' ') {
                Some((prefix, after)) => {
                    rest = after;
                    Some(prefix.to_owned())
                }
                None => {
                    rest = "";
                    Some(after_marker.to_owned())
                }
            },
            None => None,
        };

        let rest = rest.trim_start_matches(' ');
        let (token, mut rest) = rest.split_once(' ').unwrap_or((rest, ""));
        let command = CommandToken::from_token(token);

        let mut params = Vec::new();
        let mut trailing = None;
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }
            if let Some(text) = rest.strip_prefix(':') {
                trailing = Some(text.to_owned());
                break;
            }
            let (param, after) = rest.split_once(' ').unwrap_or((rest, ""));
            params.push(param.to_owned());
            rest = after;
        }

        ParsedLine {
            raw: line.to_owned(),
            prefix,
            command,
            params,
            trailing,
        }
    }
}

impl FromStr for ParsedLine {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ParsedLine::parse(s))
    }
}

impl From<&str> for ParsedLine {
    fn from(s: &str) -> Self {
        ParsedLine::parse(s)
    }
}
