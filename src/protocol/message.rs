//! Message trait
//!
//! Every payload on the wire is a single map keyed by UTF-8 strings.
//! Implementors write their fields in a fixed order and read them back by key;
//! keys they do not know are skipped so older servers accept newer clients.

use std::io::{Read, Write};

use crate::error::Result;

use super::codec;

/// A payload that can be packed to and unpacked from a byte stream
pub trait Message: Sized + Default {
    /// Write this message as one map
    ///
    /// Returns the number of bytes written.
    fn pack<W: Write>(&self, writer: &mut W) -> Result<usize>;

    /// Read one map into a new message
    ///
    /// Fields missing from the map keep their default value.
    fn unpack<R: Read>(reader: &mut R) -> Result<Self>;
}

/// A request message, addressed by its type name in the header
pub trait RequestMessage: Message {
    /// Wire name used in `MessageHeader::message_type`
    const TYPE_NAME: &'static str;
}

/// Read a map, handing each key to `assign`
///
/// `assign` returns `false` for keys it does not recognise; their values are
/// skipped. A declared pair count larger than the stream content surfaces as
/// a protocol error from the first read past the end.
pub(crate) fn read_fields<R, F>(reader: &mut R, mut assign: F) -> Result<()>
where
    R: Read,
    F: FnMut(&str, &mut R) -> Result<bool>,
{
    let (pair_count, _) = codec::read_map(reader)?;
    for _ in 0..pair_count {
        let key = codec::read_string(reader)?;
        if !assign(&key, reader)? {
            tracing::trace!("Skipping unknown key {:?}", key);
            codec::skip_value(reader)?;
        }
    }
    Ok(())
}

/// Write a `key: string` pair
pub(crate) fn write_string_field<W: Write>(writer: &mut W, key: &str, value: &str) -> Result<usize> {
    Ok(codec::write_string(writer, key)? + codec::write_string(writer, value)?)
}
