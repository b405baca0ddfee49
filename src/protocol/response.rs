//! Response bodies
//!
//! Written by handlers on success only. A failed request gets no body.

use std::io::{Read, Write};

use crate::error::{Result, TableWireError};

use super::codec;
use super::message::{read_fields, write_string_field, Message};

/// `{"status": str}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub const OK: &'static str = "ok";

    /// `{"status": "ok"}`
    pub fn ok() -> Self {
        Self {
            status: Self::OK.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Self::OK
    }
}

impl Message for StatusResponse {
    fn pack<W: Write>(&self, writer: &mut W) -> Result<usize> {
        Ok(codec::write_map(writer, 1)? + write_string_field(writer, "status", &self.status)?)
    }

    fn unpack<R: Read>(reader: &mut R) -> Result<Self> {
        let mut response = Self::default();
        read_fields(reader, |key, reader| match key {
            "status" => {
                response.status = codec::read_string(reader)?;
                Ok(true)
            }
            _ => Ok(false),
        })?;
        Ok(response)
    }
}

/// `{"name": str, "path": str}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub path: String,
}

impl Message for TableInfo {
    fn pack<W: Write>(&self, writer: &mut W) -> Result<usize> {
        let mut written = codec::write_map(writer, 2)?;
        written += write_string_field(writer, "name", &self.name)?;
        written += write_string_field(writer, "path", &self.path)?;
        Ok(written)
    }

    fn unpack<R: Read>(reader: &mut R) -> Result<Self> {
        let mut info = Self::default();
        read_fields(reader, |key, reader| {
            match key {
                "name" => info.name = codec::read_string(reader)?,
                "path" => info.path = codec::read_string(reader)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(info)
    }
}

/// `{"tables": [{"name": str}, ...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableList {
    pub tables: Vec<String>,
}

impl Message for TableList {
    fn pack<W: Write>(&self, writer: &mut W) -> Result<usize> {
        let len = u32::try_from(self.tables.len()).map_err(|_| {
            TableWireError::Protocol(format!("Too many tables: {}", self.tables.len()))
        })?;

        let mut written = codec::write_map(writer, 1)?;
        written += codec::write_string(writer, "tables")?;
        written += codec::write_array(writer, len)?;
        for name in &self.tables {
            written += codec::write_map(writer, 1)?;
            written += write_string_field(writer, "name", name)?;
        }
        Ok(written)
    }

    fn unpack<R: Read>(reader: &mut R) -> Result<Self> {
        let mut list = Self::default();
        read_fields(reader, |key, reader| {
            if key != "tables" {
                return Ok(false);
            }
            let (len, _) = codec::read_array(reader)?;
            for _ in 0..len {
                let mut name = String::new();
                read_fields(reader, |key, reader| match key {
                    "name" => {
                        name = codec::read_string(reader)?;
                        Ok(true)
                    }
                    _ => Ok(false),
                })?;
                list.tables.push(name);
            }
            Ok(true)
        })?;
        Ok(list)
    }
}
