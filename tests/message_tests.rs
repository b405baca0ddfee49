//! Message Tests
//!
//! These tests verify:
//! - pack/unpack of request and response bodies
//! - unknown keys are skipped, missing keys keep defaults
//! - truncated or malformed maps are protocol errors

use std::io::Cursor;

use tablewire::protocol::codec;
use tablewire::protocol::{
    DeleteTableMessage, GetTablesMessage, Message, MessageHeader, PingMessage, StatusResponse,
    TableInfo, TableList,
};
use tablewire::{ErrorKind, TableWireError};

// =============================================================================
// Helper Functions
// =============================================================================

fn packed<M: Message>(message: &M) -> Vec<u8> {
    let mut buf = Vec::new();
    message.pack(&mut buf).unwrap();
    buf
}

fn map_of_strings(pairs: &[(&str, &str)]) -> Vec<u8> {
    let mut buf = Vec::new();
    codec::write_map(&mut buf, pairs.len() as u32).unwrap();
    for (key, value) in pairs {
        codec::write_string(&mut buf, key).unwrap();
        codec::write_string(&mut buf, value).unwrap();
    }
    buf
}

// =============================================================================
// DeleteTableMessage
// =============================================================================

#[test]
fn test_delete_table_round_trip() {
    let long = "x".repeat(300);
    for name in ["t", "events", "a table with spaces", long.as_str()] {
        let message = DeleteTableMessage::new(name);
        let bytes = packed(&message);
        let decoded = DeleteTableMessage::unpack(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(decoded, message);
    }
}

#[test]
fn test_delete_table_pack_bytes() {
    let bytes = packed(&DeleteTableMessage::new("foo"));
    assert_eq!(bytes, b"\x81\xa4name\xa3foo");
}

#[test]
fn test_delete_table_unpack_name() {
    let bytes = map_of_strings(&[("name", "foo")]);
    let message = DeleteTableMessage::unpack(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(message.name, "foo");
}

#[test]
fn test_delete_table_unpack_ignores_unknown_keys() {
    let bytes = map_of_strings(&[("name", "foo"), ("extra", "x")]);
    let message = DeleteTableMessage::unpack(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(message.name, "foo");
}

#[test]
fn test_delete_table_unpack_skips_unknown_nested_value() {
    let mut bytes = Vec::new();
    codec::write_map(&mut bytes, 2).unwrap();
    codec::write_string(&mut bytes, "options").unwrap();
    codec::write_map(&mut bytes, 1).unwrap();
    codec::write_string(&mut bytes, "cascade").unwrap();
    codec::write_array(&mut bytes, 2).unwrap();
    codec::write_uint(&mut bytes, 70_000).unwrap();
    codec::write_bool(&mut bytes, false).unwrap();
    codec::write_string(&mut bytes, "name").unwrap();
    codec::write_string(&mut bytes, "foo").unwrap();

    let mut cursor = Cursor::new(bytes);
    let message = DeleteTableMessage::unpack(&mut cursor).unwrap();
    assert_eq!(message.name, "foo");
    assert_eq!(cursor.position() as usize, cursor.get_ref().len());
}

#[test]
fn test_delete_table_unpack_missing_name_is_empty() {
    let bytes = map_of_strings(&[("other", "x")]);
    let message = DeleteTableMessage::unpack(&mut Cursor::new(bytes)).unwrap();
    assert!(message.name.is_empty());
}

#[test]
fn test_unpack_declared_count_exceeds_content() {
    // Map claims two pairs but the stream ends after one
    let mut bytes = Vec::new();
    codec::write_map(&mut bytes, 2).unwrap();
    codec::write_string(&mut bytes, "name").unwrap();
    codec::write_string(&mut bytes, "foo").unwrap();

    let err = DeleteTableMessage::unpack(&mut Cursor::new(bytes)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[test]
fn test_unpack_truncated_value() {
    let mut bytes = map_of_strings(&[("name", "foobar")]);
    bytes.truncate(bytes.len() - 2);

    let err = DeleteTableMessage::unpack(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, TableWireError::Protocol(_)));
}

#[test]
fn test_unpack_non_map_payload() {
    let mut bytes = Vec::new();
    codec::write_string(&mut bytes, "name").unwrap();

    let err = DeleteTableMessage::unpack(&mut Cursor::new(bytes)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[test]
fn test_unpack_non_string_name() {
    let mut bytes = Vec::new();
    codec::write_map(&mut bytes, 1).unwrap();
    codec::write_string(&mut bytes, "name").unwrap();
    codec::write_uint(&mut bytes, 7).unwrap();

    let err = DeleteTableMessage::unpack(&mut Cursor::new(bytes)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[test]
fn test_unpack_empty_stream() {
    let err = DeleteTableMessage::unpack(&mut Cursor::new(Vec::new())).unwrap_err();
    assert!(err.to_string().contains("end of stream"));
}

// =============================================================================
// Empty Requests
// =============================================================================

#[test]
fn test_empty_requests_pack_to_empty_map() {
    assert_eq!(packed(&PingMessage), vec![0x80]);
    assert_eq!(packed(&GetTablesMessage), vec![0x80]);
}

#[test]
fn test_empty_request_accepts_extra_keys() {
    let bytes = map_of_strings(&[("verbose", "yes")]);
    let mut cursor = Cursor::new(bytes);
    PingMessage::unpack(&mut cursor).unwrap();
    assert_eq!(cursor.position() as usize, cursor.get_ref().len());
}

// =============================================================================
// Header
// =============================================================================

#[test]
fn test_header_followed_by_body() {
    let mut bytes = packed(&MessageHeader::new("delete_table"));
    bytes.extend(packed(&DeleteTableMessage::new("foo")));

    let mut cursor = Cursor::new(bytes);
    let header = MessageHeader::unpack(&mut cursor).unwrap();
    let body = DeleteTableMessage::unpack(&mut cursor).unwrap();

    assert_eq!(header.message_type, "delete_table");
    assert!(header.table.is_empty());
    assert_eq!(body.name, "foo");
}

// =============================================================================
// Responses
// =============================================================================

#[test]
fn test_status_ok_bytes() {
    assert_eq!(packed(&StatusResponse::ok()), b"\x81\xa6status\xa2ok");
}

#[test]
fn test_table_info_round_trip() {
    let info = TableInfo {
        name: "users".to_string(),
        path: "/var/lib/tablewire/users".to_string(),
    };
    let decoded = TableInfo::unpack(&mut Cursor::new(packed(&info))).unwrap();
    assert_eq!(decoded, info);
}

#[test]
fn test_table_list_round_trip() {
    let list = TableList {
        tables: (0..20).map(|i| format!("table_{:02}", i)).collect(),
    };
    let decoded = TableList::unpack(&mut Cursor::new(packed(&list))).unwrap();
    assert_eq!(decoded, list);
}

#[test]
fn test_table_list_empty() {
    let bytes = packed(&TableList::default());
    assert_eq!(bytes, b"\x81\xa6tables\x90");
    assert!(TableList::unpack(&mut Cursor::new(bytes))
        .unwrap()
        .tables
        .is_empty());
}
