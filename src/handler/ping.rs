//! `ping` handler

use std::io::{Read, Write};

use crate::context::ServerContext;
use crate::error::Result;
use crate::protocol::{Message, MessageHeader, PingMessage, RequestMessage, StatusResponse};

use super::registry::{HandlerDescriptor, MessageKind, Scope};

pub fn descriptor() -> HandlerDescriptor {
    HandlerDescriptor::new(Scope::Server, PingMessage::TYPE_NAME, MessageKind::Ping)
}

pub fn process<R: Read, W: Write>(
    _ctx: &ServerContext,
    _header: &MessageHeader,
    mut input: R,
    mut output: W,
) -> Result<()> {
    PingMessage::unpack(&mut input)?;

    StatusResponse::ok().pack(&mut output)?;
    output.flush()?;
    Ok(())
}
