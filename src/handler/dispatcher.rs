//! Dispatcher
//!
//! Reads the header of one request, picks the handler and hands it the
//! streams. Table-scoped handlers get their table resolved here, under the
//! registry's lease for that name.

use std::io::{Read, Write};
use std::sync::Arc;

use crate::context::ServerContext;
use crate::error::{Result, TableWireError};
use crate::protocol::{Message, MessageHeader};

use super::registry::{HandlerRegistry, Scope};

/// Routes requests to handlers
pub struct Dispatcher {
    handlers: Arc<HandlerRegistry>,
    context: Arc<ServerContext>,
}

impl Dispatcher {
    pub fn new(handlers: Arc<HandlerRegistry>, context: Arc<ServerContext>) -> Self {
        Self { handlers, context }
    }

    /// Process one request from `input`, writing any response to `output`
    ///
    /// Consumes both streams; they are closed when this returns, whichever
    /// step failed. Nothing is written to `output` unless the handler succeeds.
    pub fn dispatch<R: Read, W: Write>(&self, mut input: R, output: W) -> Result<()> {
        let header = MessageHeader::unpack(&mut input)?;
        let descriptor = self.handlers.lookup(&header.message_type)?;
        tracing::debug!(
            "Dispatching {} ({:?} scope) table={:?}",
            descriptor.name,
            descriptor.scope,
            header.table
        );

        match descriptor.scope {
            Scope::Server => descriptor
                .kind
                .process(&self.context, &header, None, input, output),
            Scope::Table => {
                if header.table.is_empty() {
                    return Err(TableWireError::Protocol(format!(
                        "{} requires a table in the message header",
                        descriptor.name
                    )));
                }
                let lease = self.context.tables().get_table(&header.table)?;
                descriptor
                    .kind
                    .process(&self.context, &header, Some(lease.table()), input, output)
            }
        }
    }

    pub fn context(&self) -> &ServerContext {
        &self.context
    }
}
