//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - Worker thread pool fed through a bounded crossbeam channel
//! - One request per connection, routed through the Dispatcher

mod server;
mod connection;

pub use server::Server;
pub use connection::Connection;
