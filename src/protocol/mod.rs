//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Request Format
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────┐
//! │ Header map                   │ Body map                     │
//! │ {version, type, table}       │ fields of `type`             │
//! └──────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! Both maps use the MessagePack encoding implemented in [`codec`]. There is
//! no outer length prefix: the header is read first, then the handler named
//! by `type` reads exactly its own body.
//!
//! ## Response Format
//! A single map written by the handler on success, e.g. `{"status": "ok"}`.
//! On failure nothing is written and the connection is closed.
//!
//! ## Message Types
//! - `delete_table` - `{"name": str}`
//! - `create_table` - `{"name": str}`
//! - `get_tables`   - `{}`
//! - `get_table`    - `{}` (table taken from the header)
//! - `ping`         - `{}`

pub mod codec;
mod header;
mod message;
mod request;
mod response;

pub use header::{MessageHeader, PROTOCOL_VERSION};
pub use message::{Message, RequestMessage};
pub use request::{
    CreateTableMessage, DeleteTableMessage, GetTableMessage, GetTablesMessage, PingMessage,
};
pub use response::{StatusResponse, TableInfo, TableList};
