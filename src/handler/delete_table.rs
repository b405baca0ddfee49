//! `delete_table` handler
//!
//! Removes a table from the registry and deletes its directory.
//!
//! ## Steps
//! 1. Unpack `{"name": str}`; empty name is a validation error
//! 2. Resolve the table (lease held from here to the end)
//! 3. Copy its path, then close it
//! 4. Remove the directory if it still exists
//! 5. Respond `{"status": "ok"}`
//!
//! Deletion is not rolled back or retried. If removing the directory fails
//! part way the table is already gone from the registry and the leftover
//! files are reported through the error.

use std::io::{Read, Write};

use crate::context::ServerContext;
use crate::error::{Result, TableWireError};
use crate::protocol::{DeleteTableMessage, Message, MessageHeader, RequestMessage, StatusResponse};

use super::registry::{HandlerDescriptor, MessageKind, Scope};

pub fn descriptor() -> HandlerDescriptor {
    HandlerDescriptor::new(
        Scope::Server,
        DeleteTableMessage::TYPE_NAME,
        MessageKind::DeleteTable,
    )
}

/// Runs synchronously on the calling worker
pub fn process<R: Read, W: Write>(
    ctx: &ServerContext,
    _header: &MessageHeader,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let message = DeleteTableMessage::unpack(&mut input)?;
    if message.name.is_empty() {
        return Err(TableWireError::Validation("Table name required".to_string()));
    }

    let tables = ctx.tables();
    let lease = tables.get_table(&message.name)?;

    // Closing releases the table, so take the path first
    let path = lease.table().path().to_path_buf();
    let detached = tables.close_table(lease)?;

    let filesystem = ctx.filesystem();
    if filesystem.exists(&path) {
        filesystem
            .remove_recursive(&path)
            .map_err(|source| TableWireError::Delete {
                path: path.clone(),
                source,
            })?;
    }

    StatusResponse::ok().pack(&mut output)?;
    output.flush()?;

    tracing::info!("Deleted table {} at {}", detached.name(), path.display());
    Ok(())
}
