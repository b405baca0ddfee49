//! Table Module
//!
//! Named, file-backed tables and the registry that resolves them.
//!
//! ## On-disk Layout
//! ```text
//! {data_dir}/
//!   └── {table}/
//!         ├── meta    (crc + bincode TableMeta)
//!         └── data    (held open while the table is registered)
//! ```

mod meta;
mod registry;
#[allow(clippy::module_inception)]
mod table;

pub use meta::{TableMeta, FORMAT_VERSION, META_FILENAME};
pub use registry::{validate_table_name, NameLease, TableLease, TableRegistry};
pub use table::{Table, DATA_FILENAME};
