//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One thread per connection, bounded by `max_connections`
//! - Commands routed through Engine
//! - Retention sweeper runs alongside for the server's lifetime

mod server;
mod connection;

pub use server::Server;
pub use connection::Connection;
