//! Inbound message parsing.

mod parse;
mod types;

pub use self::types::{CommandToken, ParsedLine};
