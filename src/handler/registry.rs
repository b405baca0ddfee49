//! Handler registry
//!
//! Maps message type names to handler descriptors. Built once at startup and
//! shared read-only by every worker; there is no runtime registration.

use std::collections::HashMap;
use std::io::{Read, Write};

use crate::context::ServerContext;
use crate::error::{Result, TableWireError};
use crate::protocol::MessageHeader;
use crate::table::Table;

use super::{create_table, delete_table, get_table, get_tables, ping};

/// Where a handler runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Whole-server; the handler resolves any tables it needs itself
    Server,
    /// Against the table named in the header, resolved by the dispatcher
    Table,
}

/// The closed set of message types this server handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    DeleteTable,
    CreateTable,
    GetTables,
    GetTable,
    Ping,
}

impl MessageKind {
    /// Run the handler for this kind
    ///
    /// Both streams are moved into the handler and dropped when it returns.
    pub fn process<R: Read, W: Write>(
        self,
        ctx: &ServerContext,
        header: &MessageHeader,
        table: Option<&Table>,
        input: R,
        output: W,
    ) -> Result<()> {
        match self {
            MessageKind::DeleteTable => delete_table::process(ctx, header, input, output),
            MessageKind::CreateTable => create_table::process(ctx, header, input, output),
            MessageKind::GetTables => get_tables::process(ctx, header, input, output),
            MessageKind::Ping => ping::process(ctx, header, input, output),
            MessageKind::GetTable => {
                let table = table.ok_or_else(|| {
                    TableWireError::Protocol(format!(
                        "{} requires a resolved table",
                        header.message_type
                    ))
                })?;
                get_table::process(ctx, header, table, input, output)
            }
        }
    }
}

/// Scope, wire name and handler of one message type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerDescriptor {
    pub scope: Scope,
    pub name: &'static str,
    pub kind: MessageKind,
}

impl HandlerDescriptor {
    pub const fn new(scope: Scope, name: &'static str, kind: MessageKind) -> Self {
        Self { scope, name, kind }
    }
}

/// Immutable name → descriptor map
#[derive(Debug)]
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, HandlerDescriptor>,
}

impl HandlerRegistry {
    /// Build a registry from descriptors; names must be unique
    pub fn new(descriptors: impl IntoIterator<Item = HandlerDescriptor>) -> Result<Self> {
        let mut handlers = HashMap::new();
        for descriptor in descriptors {
            if handlers.insert(descriptor.name, descriptor).is_some() {
                return Err(TableWireError::Config(format!(
                    "Duplicate handler for message type {}",
                    descriptor.name
                )));
            }
        }
        Ok(Self { handlers })
    }

    /// Registry with every message type this server supports
    ///
    /// Built through [`HandlerRegistry::new`], so a clashing name fails startup.
    pub fn standard() -> Result<Self> {
        Self::new(standard_descriptors())
    }

    /// Find the descriptor for a message type name
    pub fn lookup(&self, name: &str) -> Result<&HandlerDescriptor> {
        self.handlers
            .get(name)
            .ok_or_else(|| TableWireError::UnknownMessageType(name.to_string()))
    }

    /// Registered message type names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// Descriptors of every handler shipped with the server
fn standard_descriptors() -> [HandlerDescriptor; 5] {
    [
        delete_table::descriptor(),
        create_table::descriptor(),
        get_tables::descriptor(),
        get_table::descriptor(),
        ping::descriptor(),
    ]
}
