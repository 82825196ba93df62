//! Default value functions for configuration.

use crate::network::DEFAULT_READ_BUFFER_SIZE;

pub fn default_read_buffer_size() -> usize {
    DEFAULT_READ_BUFFER_SIZE
}

pub fn default_quit_message() -> String {
    "Chat client closed.".to_string()
}
