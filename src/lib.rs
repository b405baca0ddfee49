//! # tablewire
//!
//! Binary message protocol and dispatch layer for a table-based data server:
//! - MessagePack-compatible maps on the wire
//! - Immutable handler registry keyed by message type
//! - Per-table exclusion for destructive operations
//! - One request per TCP connection
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │               (acceptor + worker pool)                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  input / output streams
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Dispatcher                               │
//! │        header ──► HandlerRegistry ──► handler                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌──────────────┐         ┌──────────────┐
//!   │TableRegistry │         │  Filesystem  │
//!   │ (name leases)│         │ (remove -r)  │
//!   └──────────────┘         └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod table;
pub mod fs;
pub mod context;
pub mod handler;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, Result, TableWireError};
pub use config::Config;
pub use context::ServerContext;
pub use handler::{Dispatcher, HandlerRegistry};
pub use client::Client;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of tablewire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
