//! Table metadata file
//!
//! ## File Format
//! ```text
//! ┌──────────┬──────────┬──────────────────────────┐
//! │ CRC (4)  │ Len (4)  │ bincode(TableMeta)       │
//! └──────────┴──────────┴──────────────────────────┘
//! ```
//! CRC32 covers the bincode payload only. Integers are big-endian.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableWireError};

/// Name of the metadata file inside a table directory
pub const META_FILENAME: &str = "meta";

/// Current on-disk metadata version
pub const FORMAT_VERSION: u16 = 1;

/// Header size: crc (4) + payload length (4)
pub const META_HEADER_SIZE: usize = 8;

/// Persistent description of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    /// Table name, identical to the directory name
    pub name: String,

    /// On-disk format version
    pub format_version: u16,

    /// Creation time (unix millis)
    pub created_at: u64,
}

impl TableMeta {
    pub fn new(name: impl Into<String>) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            name: name.into(),
            format_version: FORMAT_VERSION,
            created_at,
        }
    }

    /// Serialize with checksum header
    pub fn encode(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(self)
            .map_err(|e| TableWireError::Storage(format!("Unable to encode table meta: {}", e)))?;
        let crc = crc32fast::hash(&payload);

        let mut bytes = Vec::with_capacity(META_HEADER_SIZE + payload.len());
        bytes.extend_from_slice(&crc.to_be_bytes());
        bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Parse and verify bytes produced by [`TableMeta::encode`]
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < META_HEADER_SIZE {
            return Err(TableWireError::Storage(format!(
                "Table meta truncated: expected at least {} bytes, got {}",
                META_HEADER_SIZE,
                bytes.len()
            )));
        }

        let crc = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let len = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;

        let payload = bytes
            .get(META_HEADER_SIZE..META_HEADER_SIZE + len)
            .ok_or_else(|| {
                TableWireError::Storage(format!(
                    "Table meta truncated: expected {} payload bytes, got {}",
                    len,
                    bytes.len() - META_HEADER_SIZE
                ))
            })?;

        if crc32fast::hash(payload) != crc {
            return Err(TableWireError::Storage(
                "Table meta checksum mismatch".to_string(),
            ));
        }

        let meta: TableMeta = bincode::deserialize(payload)
            .map_err(|e| TableWireError::Storage(format!("Unable to decode table meta: {}", e)))?;

        if meta.format_version != FORMAT_VERSION {
            return Err(TableWireError::Storage(format!(
                "Unsupported table format version {}",
                meta.format_version
            )));
        }

        Ok(meta)
    }

    /// Write the metadata file into `dir` and sync it
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let bytes = self.encode()?;
        let mut file = File::create(dir.join(META_FILENAME))?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        Ok(())
    }

    /// Read the metadata file from `dir`
    pub fn read_from(dir: &Path) -> Result<Self> {
        let bytes = fs::read(dir.join(META_FILENAME))?;
        Self::decode(&bytes)
    }
}
