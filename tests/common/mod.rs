//! Integration test common infrastructure.
//!
//! Provides a scripted fake IRC server that accepts one client at a time,
//! and a test client that wraps a [`Registry`](slirc_client::Registry) and
//! collects the events it emits.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::{ServerPeer, TestServer};
