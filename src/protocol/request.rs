//! Request bodies
//!
//! One struct per message type. The header names the type; the body carries
//! the type's fields.

use std::io::{Read, Write};

use crate::error::Result;

use super::codec;
use super::message::{read_fields, write_string_field, Message, RequestMessage};

/// Delete a table and its files: `{"name": str}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteTableMessage {
    pub name: String,
}

impl DeleteTableMessage {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl RequestMessage for DeleteTableMessage {
    const TYPE_NAME: &'static str = "delete_table";
}

impl Message for DeleteTableMessage {
    fn pack<W: Write>(&self, writer: &mut W) -> Result<usize> {
        Ok(codec::write_map(writer, 1)? + write_string_field(writer, "name", &self.name)?)
    }

    fn unpack<R: Read>(reader: &mut R) -> Result<Self> {
        let mut message = Self::default();
        read_fields(reader, |key, reader| match key {
            "name" => {
                message.name = codec::read_string(reader)?;
                Ok(true)
            }
            _ => Ok(false),
        })?;
        Ok(message)
    }
}

/// Create an empty table: `{"name": str}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTableMessage {
    pub name: String,
}

impl CreateTableMessage {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl RequestMessage for CreateTableMessage {
    const TYPE_NAME: &'static str = "create_table";
}

impl Message for CreateTableMessage {
    fn pack<W: Write>(&self, writer: &mut W) -> Result<usize> {
        Ok(codec::write_map(writer, 1)? + write_string_field(writer, "name", &self.name)?)
    }

    fn unpack<R: Read>(reader: &mut R) -> Result<Self> {
        let mut message = Self::default();
        read_fields(reader, |key, reader| match key {
            "name" => {
                message.name = codec::read_string(reader)?;
                Ok(true)
            }
            _ => Ok(false),
        })?;
        Ok(message)
    }
}

/// Messages without fields share one shape: an empty map
macro_rules! empty_request {
    ($(#[$doc:meta])* $name:ident, $type_name:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl RequestMessage for $name {
            const TYPE_NAME: &'static str = $type_name;
        }

        impl Message for $name {
            fn pack<W: Write>(&self, writer: &mut W) -> Result<usize> {
                codec::write_map(writer, 0)
            }

            fn unpack<R: Read>(reader: &mut R) -> Result<Self> {
                read_fields(reader, |_, _| Ok(false))?;
                Ok($name)
            }
        }
    };
}

empty_request!(
    /// List all tables: `{}`
    GetTablesMessage,
    "get_tables"
);

empty_request!(
    /// Describe the table named in the header: `{}`
    GetTableMessage,
    "get_table"
);

empty_request!(
    /// Health check: `{}`
    PingMessage,
    "ping"
);
