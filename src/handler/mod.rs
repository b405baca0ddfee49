//! Handler Module
//!
//! Request dispatch and the per-message handlers.
//!
//! ## Flow
//! ```text
//! input ──► Dispatcher ──► HandlerRegistry::lookup(header.type)
//!                │
//!                ├── Scope::Server ──► handler resolves tables itself
//!                └── Scope::Table  ──► TableRegistry::get_table(header.table)
//!                                          │
//!                                          ▼
//!                              handler: unpack ► process ► pack ──► output
//! ```
//!
//! Handlers own both streams for the whole request and drop them on return,
//! so every exit path closes them exactly once.

mod create_table;
mod delete_table;
mod dispatcher;
mod get_table;
mod get_tables;
mod ping;
mod registry;

pub use dispatcher::Dispatcher;
pub use registry::{HandlerDescriptor, HandlerRegistry, MessageKind, Scope};
