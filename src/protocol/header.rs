//! Message header
//!
//! Precedes every request body and names the handler that should run.

use std::io::{Read, Write};

use crate::error::{Result, TableWireError};

use super::codec;
use super::message::{read_fields, write_string_field, Message};

/// The only protocol version this server speaks
pub const PROTOCOL_VERSION: u32 = 1;

/// Request header: `{"version": uint, "type": str, "table": str}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHeader {
    pub version: u32,
    pub message_type: String,
    /// Target table for table-scoped messages, empty otherwise
    pub table: String,
}

impl MessageHeader {
    /// Header for a server-scoped message
    pub fn new(message_type: impl Into<String>) -> Self {
        Self {
            message_type: message_type.into(),
            ..Self::default()
        }
    }

    /// Header for a table-scoped message
    pub fn for_table(message_type: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            message_type: message_type.into(),
            table: table.into(),
            ..Self::default()
        }
    }
}

impl Default for MessageHeader {
    fn default() -> Self {
        Self {
            version: PROTOCOL_VERSION,
            message_type: String::new(),
            table: String::new(),
        }
    }
}

impl Message for MessageHeader {
    fn pack<W: Write>(&self, writer: &mut W) -> Result<usize> {
        let mut written = codec::write_map(writer, 3)?;
        written += codec::write_string(writer, "version")?;
        written += codec::write_uint(writer, self.version as u64)?;
        written += write_string_field(writer, "type", &self.message_type)?;
        written += write_string_field(writer, "table", &self.table)?;
        Ok(written)
    }

    fn unpack<R: Read>(reader: &mut R) -> Result<Self> {
        let mut header = Self::default();
        read_fields(reader, |key, reader| {
            match key {
                "version" => {
                    let version = codec::read_uint(reader)?;
                    header.version = u32::try_from(version).map_err(|_| {
                        TableWireError::Protocol(format!("Invalid header version: {}", version))
                    })?;
                }
                "type" => header.message_type = codec::read_string(reader)?,
                "table" => header.table = codec::read_string(reader)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;

        if header.version != PROTOCOL_VERSION {
            return Err(TableWireError::Protocol(format!(
                "Unsupported protocol version {} (expected {})",
                header.version, PROTOCOL_VERSION
            )));
        }

        Ok(header)
    }
}
