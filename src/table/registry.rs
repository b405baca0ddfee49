//! Table Registry
//!
//! Tracks every open table by name and serializes work on a single name.
//!
//! ## Locking
//! - `tables`: RwLock over the name → table map
//! - `leased`: set of names currently held by a request, with a Condvar that
//!   wakes waiters when a lease is dropped
//!
//! A request that resolves a table holds the name's lease until it is done
//! with it. `close_table` consumes the table lease and hands back the bare
//! name lease, so close, existence check and removal of the files all happen
//! before any other request can see the name again.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex, RwLock};

use crate::error::{Result, TableWireError};

use super::meta::META_FILENAME;
use super::table::Table;

/// Registry of open tables under one data directory
pub struct TableRegistry {
    /// Directory holding one subdirectory per table
    data_dir: PathBuf,

    /// Open tables by name
    tables: RwLock<HashMap<String, Arc<Table>>>,

    /// Names currently leased to a request
    leased: Mutex<HashSet<String>>,

    /// Signalled whenever a lease is released
    released: Condvar,
}

impl TableRegistry {
    /// Open the registry rooted at `data_dir`
    ///
    /// On startup:
    /// 1. Create the directory if it doesn't exist
    /// 2. Open every subdirectory that carries a metadata file
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;

        let mut tables = HashMap::new();
        for entry in fs::read_dir(data_dir)? {
            let path = entry?.path();
            if !path.is_dir() || !path.join(META_FILENAME).is_file() {
                continue;
            }

            let table = Table::open(&path)?;
            let dir_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if table.name() != dir_name {
                tracing::warn!(
                    "Table directory {} holds table {:?}; registering it under the directory name",
                    path.display(),
                    table.name()
                );
            }

            tracing::debug!("Opened table {} at {}", dir_name, path.display());
            tables.insert(dir_name, Arc::new(table));
        }

        tracing::info!("Loaded {} table(s) from {}", tables.len(), data_dir.display());

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            tables: RwLock::new(tables),
            leased: Mutex::new(HashSet::new()),
            released: Condvar::new(),
        })
    }

    /// Resolve a table by name, waiting for any other request on that name
    ///
    /// The returned lease keeps the name exclusive until it is dropped.
    pub fn get_table(&self, name: &str) -> Result<TableLease<'_>> {
        let lease = self.lease(name);
        let table = self.tables.read().get(name).cloned();

        match table {
            Some(table) => Ok(TableLease { table, lease }),
            None => Err(TableWireError::TableNotFound(name.to_string())),
        }
    }

    /// Close a leased table and remove it from the registry
    ///
    /// Fails with [`TableWireError::Close`] if the table is referenced outside
    /// the registry and the lease, or if its data file cannot be synced. On
    /// failure the table stays registered and open.
    ///
    /// On success the name stays leased until the returned [`NameLease`] is
    /// dropped.
    pub fn close_table<'a>(&'a self, lease: TableLease<'a>) -> Result<NameLease<'a>> {
        let TableLease { table, lease } = lease;

        if !std::ptr::eq(lease.registry, self) {
            return Err(TableWireError::Close(format!(
                "Table {} is leased from a different registry",
                lease.name
            )));
        }

        // One reference in the map, one in the lease
        let references = Arc::strong_count(&table);
        if references > 2 {
            return Err(TableWireError::Close(format!(
                "Table {} is still referenced by {} other handle(s)",
                lease.name,
                references - 2
            )));
        }

        table.close()?;
        self.tables.write().remove(&lease.name);
        tracing::debug!("Closed table {}", lease.name);

        Ok(lease)
    }

    /// Create, open and register a new table
    pub fn create_table(&self, name: &str) -> Result<TableLease<'_>> {
        validate_table_name(name)?;

        let lease = self.lease(name);
        if self.tables.read().contains_key(name) {
            return Err(TableWireError::TableExists(name.to_string()));
        }

        let table = Arc::new(Table::create(name, &self.table_path(name))?);
        self.tables
            .write()
            .insert(name.to_string(), Arc::clone(&table));
        tracing::info!("Created table {} at {}", name, table.path().display());

        Ok(TableLease { table, lease })
    }

    /// Names of all registered tables, sorted
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether a table is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }

    /// Number of registered tables
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Directory a table named `name` lives in
    pub fn table_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Block until `name` is free, then take it
    fn lease(&self, name: &str) -> NameLease<'_> {
        let mut leased = self.leased.lock();
        while leased.contains(name) {
            self.released.wait(&mut leased);
        }
        leased.insert(name.to_string());

        NameLease {
            registry: self,
            name: name.to_string(),
        }
    }

    fn release(&self, name: &str) {
        let mut leased = self.leased.lock();
        leased.remove(name);
        self.released.notify_all();
    }
}

/// Exclusive hold on a table name
#[derive(Debug)]
pub struct NameLease<'a> {
    registry: &'a TableRegistry,
    name: String,
}

impl NameLease<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for NameLease<'_> {
    fn drop(&mut self) {
        self.registry.release(&self.name);
    }
}

/// A resolved table together with the exclusive hold on its name
#[derive(Debug)]
pub struct TableLease<'a> {
    table: Arc<Table>,
    lease: NameLease<'a>,
}

impl TableLease<'_> {
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }
}

impl std::fmt::Debug for TableRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableRegistry")
            .field("data_dir", &self.data_dir)
            .field("tables", &self.table_names())
            .finish()
    }
}

/// Table names become directory names, so they must be a single path component
pub fn validate_table_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(TableWireError::Validation("Table name required".to_string()));
    }
    if name == "." || name == ".." {
        return Err(TableWireError::Validation(format!(
            "Invalid table name: {:?}",
            name
        )));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(TableWireError::Validation(format!(
            "Table name may not contain path separators: {:?}",
            name
        )));
    }
    Ok(())
}
