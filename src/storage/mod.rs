pub mod csv_backend;

use std::path::PathBuf;

use crate::{errors::Result, ledger::Record};

pub use csv_backend::{CsvStorage, HEADER};

/// How an export treats a file that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// Replace the file with a header plus every record.
    Overwrite,
    /// Keep existing rows and add only records not already present.
    Append,
}

/// Abstraction over persistence backends capable of storing ledger records.
///
/// File names are resolved against the backend's storage root; every read or
/// write makes sure that root exists first.
pub trait StorageBackend: Send + Sync {
    fn path_for(&self, file_name: &str) -> PathBuf;

    fn exists(&self, file_name: &str) -> bool {
        self.path_for(file_name).is_file()
    }

    /// Names of the ledger files available under the storage root.
    fn list_files(&self) -> Result<Vec<String>>;

    /// Reads every record, failing with `NotFound` or `LoadFailed`.
    fn read_records(&self, file_name: &str) -> Result<Vec<Record>>;

    /// Writes `records` according to `mode` and returns how many rows were written.
    fn write_records(&self, file_name: &str, records: &[&Record], mode: ExportMode)
        -> Result<usize>;
}
