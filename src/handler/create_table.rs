//! `create_table` handler
//!
//! Creates `{data_dir}/{name}/`, writes its metadata and registers it.

use std::io::{Read, Write};

use crate::context::ServerContext;
use crate::error::Result;
use crate::protocol::{CreateTableMessage, Message, MessageHeader, RequestMessage, StatusResponse};

use super::registry::{HandlerDescriptor, MessageKind, Scope};

pub fn descriptor() -> HandlerDescriptor {
    HandlerDescriptor::new(
        Scope::Server,
        CreateTableMessage::TYPE_NAME,
        MessageKind::CreateTable,
    )
}

pub fn process<R: Read, W: Write>(
    ctx: &ServerContext,
    _header: &MessageHeader,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let message = CreateTableMessage::unpack(&mut input)?;

    // Name validation happens in the registry
    let _lease = ctx.tables().create_table(&message.name)?;

    StatusResponse::ok().pack(&mut output)?;
    output.flush()?;
    Ok(())
}
