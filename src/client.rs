//! Client
//!
//! Opens one connection per request, writes header and body, then reads the
//! response map until the server closes the connection.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, TableWireError};
use crate::protocol::{
    CreateTableMessage, DeleteTableMessage, GetTableMessage, GetTablesMessage, Message,
    MessageHeader, PingMessage, RequestMessage, StatusResponse, TableInfo, TableList,
};

/// Blocking protocol client
#[derive(Debug, Clone)]
pub struct Client {
    addr: String,
    timeout: Option<Duration>,
}

impl Client {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: Some(Duration::from_secs(5)),
        }
    }

    /// Read/write timeout applied to each connection (`None` blocks forever)
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send one request and decode the response as `T`
    ///
    /// `table` is placed in the header for table-scoped messages.
    pub fn request<M, T>(&self, table: Option<&str>, message: &M) -> Result<T>
    where
        M: RequestMessage,
        T: Message,
    {
        let header = match table {
            Some(table) => MessageHeader::for_table(M::TYPE_NAME, table),
            None => MessageHeader::new(M::TYPE_NAME),
        };

        let mut request = BytesMut::with_capacity(64).writer();
        header.pack(&mut request)?;
        message.pack(&mut request)?;
        let request = request.into_inner().freeze();

        let response = self.round_trip(&request)?;
        if response.is_empty() {
            return Err(TableWireError::Protocol(format!(
                "Server closed the connection without responding to {}",
                M::TYPE_NAME
            )));
        }

        T::unpack(&mut response.reader())
    }

    pub fn ping(&self) -> Result<()> {
        let status: StatusResponse = self.request(None, &PingMessage)?;
        expect_ok(status)
    }

    pub fn create_table(&self, name: &str) -> Result<()> {
        let status: StatusResponse = self.request(None, &CreateTableMessage::new(name))?;
        expect_ok(status)
    }

    pub fn delete_table(&self, name: &str) -> Result<()> {
        let status: StatusResponse = self.request(None, &DeleteTableMessage::new(name))?;
        expect_ok(status)
    }

    pub fn get_tables(&self) -> Result<Vec<String>> {
        let list: TableList = self.request(None, &GetTablesMessage)?;
        Ok(list.tables)
    }

    pub fn get_table(&self, name: &str) -> Result<TableInfo> {
        self.request(Some(name), &GetTableMessage)
    }

    fn round_trip(&self, request: &[u8]) -> Result<Bytes> {
        let mut stream = TcpStream::connect(&self.addr)?;
        stream.set_read_timeout(self.timeout)?;
        stream.set_write_timeout(self.timeout)?;

        stream.write_all(request)?;
        stream.flush()?;

        let mut response = Vec::new();
        stream.read_to_end(&mut response)?;
        Ok(Bytes::from(response))
    }
}

fn expect_ok(status: StatusResponse) -> Result<()> {
    if status.is_ok() {
        Ok(())
    } else {
        Err(TableWireError::Protocol(format!(
            "Unexpected status: {:?}",
            status.status
        )))
    }
}
