//! Table handle
//!
//! A table is a directory holding a metadata file and a data file. While the
//! table is open the data file stays open; closing syncs and releases it.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::{Result, TableWireError};

use super::meta::TableMeta;

/// Name of the data file inside a table directory
pub const DATA_FILENAME: &str = "data";

/// An open (or closed) table
#[derive(Debug)]
pub struct Table {
    name: String,
    path: PathBuf,

    /// Open data file handle, `None` once closed
    data: Mutex<Option<File>>,
}

impl Table {
    /// Create the table directory at `path` and open it
    ///
    /// Fails if anything already exists at `path`. A directory created here
    /// is removed again when a later step fails.
    pub fn create(name: &str, path: &Path) -> Result<Self> {
        Self::create_with(name, path, |path| {
            TableMeta::new(name).write_to(path)?;
            Self::open(path)
        })
    }

    fn create_with<F>(name: &str, path: &Path, init: F) -> Result<Self>
    where
        F: FnOnce(&Path) -> Result<Self>,
    {
        fs::create_dir(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                TableWireError::TableExists(name.to_string())
            } else {
                TableWireError::Io(e)
            }
        })?;

        init(path).map_err(|e| {
            if let Err(cleanup) = fs::remove_dir_all(path) {
                tracing::warn!(
                    "Unable to remove partial table directory {}: {}",
                    path.display(),
                    cleanup
                );
            }
            e
        })
    }

    /// Open an existing table directory
    pub fn open(path: &Path) -> Result<Self> {
        let meta = TableMeta::read_from(path)?;
        let data = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.join(DATA_FILENAME))?;

        Ok(Self {
            name: meta.name,
            path: path.to_path_buf(),
            data: Mutex::new(Some(data)),
        })
    }

    /// Sync and release the data file
    ///
    /// Closing an already closed table is a no-op. If the sync fails the
    /// handle is kept and the table stays open.
    pub fn close(&self) -> Result<()> {
        let mut data = self.data.lock();
        if let Some(file) = data.take() {
            if let Err(e) = file.sync_all() {
                *data = Some(file);
                return Err(TableWireError::Close(format!(
                    "Unable to sync data file of table {}: {}",
                    self.name, e
                )));
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.data.lock().is_some()
    }
}
