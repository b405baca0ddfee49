//! Binary codec
//!
//! Stream read/write primitives for the MessagePack subset the protocol
//! speaks, on top of `rmp`. Writers always choose the smallest encoding;
//! readers accept every width.
//!
//! What this layer adds over `rmp`:
//! - byte counts for every write and for container headers read
//! - `MAX_STRING_LEN` checked before a string body is allocated
//! - `skip_value` for any value, bounded by `MAX_DEPTH`
//! - every decode failure reported as [`TableWireError::Protocol`]
//!
//! A read that hits end of stream part way through a value is a protocol
//! error; nothing is retried.

use std::io::{self, Read, Write};

use rmp::decode::{self, NumValueReadError, ValueReadError};
use rmp::encode::{self, ValueWriteError};
use rmp::Marker;

use crate::error::{Result, TableWireError};

/// Maximum accepted string length (16 MB)
pub const MAX_STRING_LEN: usize = 16 * 1024 * 1024;

/// Maximum nesting accepted when skipping unknown values
pub const MAX_DEPTH: usize = 32;

// =============================================================================
// Writing
// =============================================================================

/// Write a map header announcing `pair_count` key/value pairs
///
/// Returns the number of bytes written.
pub fn write_map<W: Write>(writer: &mut W, pair_count: u32) -> Result<usize> {
    let mut counted = Counted::new(writer);
    encode::write_map_len(&mut counted, pair_count).map_err(write_failure)?;
    Ok(counted.count)
}

/// Write an array header announcing `len` elements
pub fn write_array<W: Write>(writer: &mut W, len: u32) -> Result<usize> {
    let mut counted = Counted::new(writer);
    encode::write_array_len(&mut counted, len).map_err(write_failure)?;
    Ok(counted.count)
}

/// Write a UTF-8 string
pub fn write_string<W: Write>(writer: &mut W, value: &str) -> Result<usize> {
    if u32::try_from(value.len()).is_err() {
        return Err(TableWireError::Protocol(format!(
            "String too long to encode: {} bytes",
            value.len()
        )));
    }

    let mut counted = Counted::new(writer);
    encode::write_str(&mut counted, value).map_err(write_failure)?;
    Ok(counted.count)
}

/// Write an unsigned integer
pub fn write_uint<W: Write>(writer: &mut W, value: u64) -> Result<usize> {
    let mut counted = Counted::new(writer);
    encode::write_uint(&mut counted, value).map_err(write_failure)?;
    Ok(counted.count)
}

/// Write a boolean
pub fn write_bool<W: Write>(writer: &mut W, value: bool) -> Result<usize> {
    encode::write_bool(writer, value)?;
    Ok(1)
}

/// Write nil
pub fn write_nil<W: Write>(writer: &mut W) -> Result<usize> {
    encode::write_nil(writer)?;
    Ok(1)
}

// =============================================================================
// Reading
// =============================================================================

/// Read a map header
///
/// Returns the declared pair count and the number of header bytes consumed.
/// The pairs themselves are left on the stream for the caller.
pub fn read_map<R: Read>(reader: &mut R) -> Result<(u32, usize)> {
    let mut counted = Counted::new(reader);
    let len = decode::read_map_len(&mut counted).map_err(|e| value_failure("map", e))?;
    Ok((len, counted.count))
}

/// Read an array header
///
/// Returns the declared element count and the number of header bytes consumed.
pub fn read_array<R: Read>(reader: &mut R) -> Result<(u32, usize)> {
    let mut counted = Counted::new(reader);
    let len = decode::read_array_len(&mut counted).map_err(|e| value_failure("array", e))?;
    Ok((len, counted.count))
}

/// Read a UTF-8 string
pub fn read_string<R: Read>(reader: &mut R) -> Result<String> {
    let len = decode::read_str_len(reader).map_err(|e| value_failure("string", e))? as usize;
    if len > MAX_STRING_LEN {
        return Err(TableWireError::Protocol(format!(
            "String too large: {} bytes (max {})",
            len, MAX_STRING_LEN
        )));
    }

    let mut buf = vec![0u8; len];
    reader
        .read_exact(&mut buf)
        .map_err(|e| read_failure("string body", e))?;

    String::from_utf8(buf)
        .map_err(|_| TableWireError::Protocol("String is not valid UTF-8".to_string()))
}

/// Read an unsigned integer (non-negative signed encodings are accepted)
pub fn read_uint<R: Read>(reader: &mut R) -> Result<u64> {
    decode::read_int(reader).map_err(|e| match e {
        NumValueReadError::InvalidMarkerRead(e) | NumValueReadError::InvalidDataRead(e) => {
            read_failure("integer", e)
        }
        NumValueReadError::TypeMismatch(marker) => unexpected_marker("integer", marker),
        NumValueReadError::OutOfRange => {
            TableWireError::Protocol("Expected unsigned integer".to_string())
        }
    })
}

/// Consume and discard one value of any type, including nested containers
pub fn skip_value<R: Read>(reader: &mut R) -> Result<()> {
    skip_value_at(reader, 0)
}

fn skip_value_at<R: Read>(reader: &mut R, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(TableWireError::Protocol(format!(
            "Value nested deeper than {} levels",
            MAX_DEPTH
        )));
    }

    let marker = decode::read_marker(reader).map_err(|e| read_failure("value", e.0))?;
    match marker {
        Marker::FixPos(_) | Marker::FixNeg(_) | Marker::Null | Marker::True | Marker::False => {
            Ok(())
        }
        Marker::U8 | Marker::I8 => discard(reader, 1),
        Marker::U16 | Marker::I16 => discard(reader, 2),
        Marker::U32 | Marker::I32 | Marker::F32 => discard(reader, 4),
        Marker::U64 | Marker::I64 | Marker::F64 => discard(reader, 8),
        Marker::FixStr(len) => discard(reader, len as u64),
        Marker::Str8 | Marker::Bin8 => {
            let len = read_len(reader, 1)?;
            discard(reader, len)
        }
        Marker::Str16 | Marker::Bin16 => {
            let len = read_len(reader, 2)?;
            discard(reader, len)
        }
        Marker::Str32 | Marker::Bin32 => {
            let len = read_len(reader, 4)?;
            discard(reader, len)
        }
        // ext payloads carry a one byte type tag before the data
        Marker::FixExt1 => discard(reader, 2),
        Marker::FixExt2 => discard(reader, 3),
        Marker::FixExt4 => discard(reader, 5),
        Marker::FixExt8 => discard(reader, 9),
        Marker::FixExt16 => discard(reader, 17),
        Marker::Ext8 => {
            let len = read_len(reader, 1)?;
            discard(reader, len + 1)
        }
        Marker::Ext16 => {
            let len = read_len(reader, 2)?;
            discard(reader, len + 1)
        }
        Marker::Ext32 => {
            let len = read_len(reader, 4)?;
            discard(reader, len + 1)
        }
        Marker::FixArray(len) => skip_entries(reader, len as u64, depth),
        Marker::Array16 => {
            let len = read_len(reader, 2)?;
            skip_entries(reader, len, depth)
        }
        Marker::Array32 => {
            let len = read_len(reader, 4)?;
            skip_entries(reader, len, depth)
        }
        Marker::FixMap(len) => skip_entries(reader, len as u64 * 2, depth),
        Marker::Map16 => {
            let len = read_len(reader, 2)?;
            skip_entries(reader, len * 2, depth)
        }
        Marker::Map32 => {
            let len = read_len(reader, 4)?;
            skip_entries(reader, len * 2, depth)
        }
        Marker::Reserved => Err(unexpected_marker("value", marker)),
    }
}

fn skip_entries<R: Read>(reader: &mut R, count: u64, depth: usize) -> Result<()> {
    for _ in 0..count {
        skip_value_at(reader, depth + 1)?;
    }
    Ok(())
}

/// Big-endian length of `width` bytes following a marker
fn read_len<R: Read>(reader: &mut R, width: usize) -> Result<u64> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf[4 - width..])
        .map_err(|e| read_failure("value length", e))?;
    Ok(u32::from_be_bytes(buf) as u64)
}

fn discard<R: Read>(reader: &mut R, len: u64) -> Result<()> {
    let copied = io::copy(&mut reader.by_ref().take(len), &mut io::sink())
        .map_err(|e| read_failure("value body", e))?;
    if copied < len {
        return Err(TableWireError::Protocol(format!(
            "Unexpected end of stream while skipping value: expected {} bytes, got {}",
            len, copied
        )));
    }
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

/// Passes reads or writes through while counting the bytes moved
struct Counted<'a, S> {
    inner: &'a mut S,
    count: usize,
}

impl<'a, S> Counted<'a, S> {
    fn new(inner: &'a mut S) -> Self {
        Self { inner, count: 0 }
    }
}

impl<S: Read> Read for Counted<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n;
        Ok(n)
    }
}

impl<S: Write> Write for Counted<'_, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn write_failure(err: ValueWriteError<io::Error>) -> TableWireError {
    match err {
        ValueWriteError::InvalidMarkerWrite(e) | ValueWriteError::InvalidDataWrite(e) => {
            TableWireError::Io(e)
        }
    }
}

fn value_failure(expected: &str, err: ValueReadError<io::Error>) -> TableWireError {
    match err {
        ValueReadError::InvalidMarkerRead(e) => read_failure(&format!("{} header", expected), e),
        ValueReadError::InvalidDataRead(e) => read_failure(&format!("{} length", expected), e),
        ValueReadError::TypeMismatch(marker) => unexpected_marker(expected, marker),
    }
}

fn read_failure(what: &str, err: io::Error) -> TableWireError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        TableWireError::Protocol(format!("Unexpected end of stream while reading {}", what))
    } else {
        TableWireError::Protocol(format!("Unable to read {}: {}", what, err))
    }
}

fn unexpected_marker(expected: &str, marker: Marker) -> TableWireError {
    TableWireError::Protocol(format!(
        "Expected {}, found marker 0x{:02x}",
        expected,
        marker.to_u8()
    ))
}
