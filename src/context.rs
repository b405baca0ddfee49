//! Server context
//!
//! Shared state every handler runs against.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::fs::{Filesystem, LocalFilesystem};
use crate::table::TableRegistry;

/// Tables and filesystem shared by all workers
pub struct ServerContext {
    tables: TableRegistry,
    filesystem: Arc<dyn Filesystem>,
}

impl ServerContext {
    pub fn new(tables: TableRegistry, filesystem: Arc<dyn Filesystem>) -> Self {
        Self { tables, filesystem }
    }

    /// Open the table registry under the configured data directory, on the local disk
    pub fn open(config: &Config) -> Result<Self> {
        let tables = TableRegistry::open(&config.data_dir)?;
        Ok(Self::new(tables, Arc::new(LocalFilesystem)))
    }

    pub fn tables(&self) -> &TableRegistry {
        &self.tables
    }

    pub fn filesystem(&self) -> &dyn Filesystem {
        self.filesystem.as_ref()
    }
}
