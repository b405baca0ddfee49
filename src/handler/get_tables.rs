//! `get_tables` handler

use std::io::{Read, Write};

use crate::context::ServerContext;
use crate::error::Result;
use crate::protocol::{GetTablesMessage, Message, MessageHeader, RequestMessage, TableList};

use super::registry::{HandlerDescriptor, MessageKind, Scope};

pub fn descriptor() -> HandlerDescriptor {
    HandlerDescriptor::new(Scope::Server, GetTablesMessage::TYPE_NAME, MessageKind::GetTables)
}

/// Respond with every registered table name, sorted
pub fn process<R: Read, W: Write>(
    ctx: &ServerContext,
    _header: &MessageHeader,
    mut input: R,
    mut output: W,
) -> Result<()> {
    GetTablesMessage::unpack(&mut input)?;

    let list = TableList {
        tables: ctx.tables().table_names(),
    };
    list.pack(&mut output)?;
    output.flush()?;
    Ok(())
}
