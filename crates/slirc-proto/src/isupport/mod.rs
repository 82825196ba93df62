//! ISUPPORT (RPL_ISUPPORT / 005) token lookup.
//!
//! The only token the client cares about is `NETWORK=<name>`, which names
//! the network the server belongs to.

/// Key of the network name token.
pub const NETWORK_KEY: &str = "NETWORK=";

/// Extract the value of the `NETWORK=` token from a reply.
///
/// The value runs to the next space or the end of the text. Returns `None`
/// when the token is absent or empty.
pub fn network_name(text: &str) -> Option<&str> {
    let start = text.find(NETWORK_KEY)? + NETWORK_KEY.len();
    let value = text[start..].split(' ').next().unwrap_or("");
    (!value.is_empty()).then_some(value)
}
