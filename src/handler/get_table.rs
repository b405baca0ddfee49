//! `get_table` handler
//!
//! Table-scoped: the dispatcher resolves the table named in the header and
//! holds its lease while this runs.

use std::io::{Read, Write};

use crate::context::ServerContext;
use crate::error::Result;
use crate::protocol::{GetTableMessage, Message, MessageHeader, RequestMessage, TableInfo};
use crate::table::Table;

use super::registry::{HandlerDescriptor, MessageKind, Scope};

pub fn descriptor() -> HandlerDescriptor {
    HandlerDescriptor::new(Scope::Table, GetTableMessage::TYPE_NAME, MessageKind::GetTable)
}

pub fn process<R: Read, W: Write>(
    _ctx: &ServerContext,
    _header: &MessageHeader,
    table: &Table,
    mut input: R,
    mut output: W,
) -> Result<()> {
    GetTableMessage::unpack(&mut input)?;

    let info = TableInfo {
        name: table.name().to_string(),
        path: table.path().display().to_string(),
    };
    info.pack(&mut output)?;
    output.flush()?;
    Ok(())
}
