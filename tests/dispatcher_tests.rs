//! Dispatcher Tests
//!
//! These tests verify:
//! - Header parsing and handler lookup
//! - Table-scoped resolution through the registry
//! - Each registered handler's request/response pair

use std::io::Cursor;
use std::sync::Arc;

use tablewire::fs::LocalFilesystem;
use tablewire::protocol::codec;
use tablewire::protocol::{
    CreateTableMessage, DeleteTableMessage, GetTableMessage, GetTablesMessage, Message,
    MessageHeader, PingMessage, StatusResponse, TableInfo, TableList,
};
use tablewire::table::TableRegistry;
use tablewire::{Dispatcher, ErrorKind, HandlerRegistry, ServerContext, TableWireError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup() -> (TempDir, Dispatcher) {
    let temp_dir = TempDir::new().unwrap();
    let tables = TableRegistry::open(temp_dir.path()).unwrap();
    let context = Arc::new(ServerContext::new(tables, Arc::new(LocalFilesystem)));
    let dispatcher = Dispatcher::new(Arc::new(HandlerRegistry::standard().unwrap()), context);
    (temp_dir, dispatcher)
}

fn request<M: Message>(header: MessageHeader, body: &M) -> Vec<u8> {
    let mut bytes = Vec::new();
    header.pack(&mut bytes).unwrap();
    body.pack(&mut bytes).unwrap();
    bytes
}

fn send(dispatcher: &Dispatcher, bytes: Vec<u8>) -> tablewire::Result<Vec<u8>> {
    let mut output = Vec::new();
    dispatcher.dispatch(Cursor::new(bytes), &mut output)?;
    Ok(output)
}

fn create(dispatcher: &Dispatcher, name: &str) -> tablewire::Result<Vec<u8>> {
    send(
        dispatcher,
        request(MessageHeader::new("create_table"), &CreateTableMessage::new(name)),
    )
}

// =============================================================================
// Header Handling
// =============================================================================

#[test]
fn test_unknown_message_type() {
    let (_temp, dispatcher) = setup();

    let mut output = Vec::new();
    let err = dispatcher
        .dispatch(
            Cursor::new(request(MessageHeader::new("drop_everything"), &PingMessage)),
            &mut output,
        )
        .unwrap_err();

    assert!(matches!(err, TableWireError::UnknownMessageType(ref t) if t == "drop_everything"));
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(output.is_empty());
}

#[test]
fn test_missing_header_is_protocol_error() {
    let (_temp, dispatcher) = setup();

    let err = send(&dispatcher, Vec::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[test]
fn test_header_without_type_is_unknown() {
    let (_temp, dispatcher) = setup();

    let mut bytes = Vec::new();
    codec::write_map(&mut bytes, 0).unwrap();
    PingMessage.pack(&mut bytes).unwrap();

    let err = send(&dispatcher, bytes).unwrap_err();
    assert!(matches!(err, TableWireError::UnknownMessageType(ref t) if t.is_empty()));
}

#[test]
fn test_unsupported_version() {
    let (_temp, dispatcher) = setup();
    let header = MessageHeader {
        version: 9,
        ..MessageHeader::new("ping")
    };

    let err = send(&dispatcher, request(header, &PingMessage)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

// =============================================================================
// Server-scoped Handlers
// =============================================================================

#[test]
fn test_ping() {
    let (_temp, dispatcher) = setup();

    let output = send(&dispatcher, request(MessageHeader::new("ping"), &PingMessage)).unwrap();
    let status = StatusResponse::unpack(&mut Cursor::new(output)).unwrap();
    assert!(status.is_ok());
}

#[test]
fn test_create_table() {
    let (temp, dispatcher) = setup();

    let output = create(&dispatcher, "users").unwrap();

    assert_eq!(output, b"\x81\xa6status\xa2ok");
    assert!(dispatcher.context().tables().contains("users"));
    assert!(temp.path().join("users").is_dir());
}

#[test]
fn test_create_duplicate_table() {
    let (_temp, dispatcher) = setup();
    create(&dispatcher, "users").unwrap();

    let err = create(&dispatcher, "users").unwrap_err();
    assert!(matches!(err, TableWireError::TableExists(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_create_over_stray_directory() {
    let (temp, dispatcher) = setup();
    std::fs::create_dir(temp.path().join("stray")).unwrap();

    let err = create(&dispatcher, "stray").unwrap_err();
    assert!(matches!(err, TableWireError::TableExists(_)));
    assert!(!dispatcher.context().tables().contains("stray"));
}

#[test]
fn test_create_invalid_names() {
    let (temp, dispatcher) = setup();

    for name in ["", "..", "a/b"] {
        let err = create(&dispatcher, name).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "name {:?}", name);
    }
    assert!(dispatcher.context().tables().is_empty());
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_get_tables_sorted() {
    let (_temp, dispatcher) = setup();
    for name in ["orders", "accounts", "users"] {
        create(&dispatcher, name).unwrap();
    }

    let output = send(
        &dispatcher,
        request(MessageHeader::new("get_tables"), &GetTablesMessage),
    )
    .unwrap();
    let list = TableList::unpack(&mut Cursor::new(output)).unwrap();

    assert_eq!(list.tables, vec!["accounts", "orders", "users"]);
}

#[test]
fn test_get_tables_empty() {
    let (_temp, dispatcher) = setup();

    let output = send(
        &dispatcher,
        request(MessageHeader::new("get_tables"), &GetTablesMessage),
    )
    .unwrap();
    assert_eq!(output, b"\x81\xa6tables\x90");
}

// =============================================================================
// Table-scoped Handlers
// =============================================================================

#[test]
fn test_get_table() {
    let (temp, dispatcher) = setup();
    create(&dispatcher, "users").unwrap();

    let output = send(
        &dispatcher,
        request(
            MessageHeader::for_table("get_table", "users"),
            &GetTableMessage,
        ),
    )
    .unwrap();
    let info = TableInfo::unpack(&mut Cursor::new(output)).unwrap();

    assert_eq!(info.name, "users");
    assert_eq!(
        info.path,
        temp.path().join("users").display().to_string()
    );
}

#[test]
fn test_table_scope_missing_table() {
    let (_temp, dispatcher) = setup();

    let mut output = Vec::new();
    let err = dispatcher
        .dispatch(
            Cursor::new(request(
                MessageHeader::for_table("get_table", "ghost"),
                &GetTableMessage,
            )),
            &mut output,
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(output.is_empty());
}

#[test]
fn test_table_scope_requires_header_table() {
    let (_temp, dispatcher) = setup();
    create(&dispatcher, "users").unwrap();

    let err = send(
        &dispatcher,
        request(MessageHeader::new("get_table"), &GetTableMessage),
    )
    .unwrap_err();

    assert!(matches!(err, TableWireError::Protocol(_)));
}

#[test]
fn test_table_scope_releases_lease() {
    let (_temp, dispatcher) = setup();
    create(&dispatcher, "users").unwrap();

    for _ in 0..3 {
        send(
            &dispatcher,
            request(
                MessageHeader::for_table("get_table", "users"),
                &GetTableMessage,
            ),
        )
        .unwrap();
    }

    // Would block forever if a lease leaked
    let lease = dispatcher.context().tables().get_table("users").unwrap();
    assert_eq!(lease.table().name(), "users");
}

#[test]
fn test_create_then_delete_then_recreate() {
    let (_temp, dispatcher) = setup();
    create(&dispatcher, "users").unwrap();

    send(
        &dispatcher,
        request(
            MessageHeader::new("delete_table"),
            &DeleteTableMessage::new("users"),
        ),
    )
    .unwrap();
    create(&dispatcher, "users").unwrap();

    assert_eq!(dispatcher.context().tables().table_names(), vec!["users"]);
}
