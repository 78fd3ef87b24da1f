use std::path::PathBuf;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::ledger::{Ledger, Record};
use crate::storage::{ExportMode, StorageBackend};

/// Outcome of a successful load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub path: PathBuf,
    pub records: usize,
}

/// Outcome of a successful export.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub path: PathBuf,
    pub mode: ExportMode,
    pub written: usize,
}

/// Facade that keeps the in-memory ledger in sync with its persisted file.
///
/// Edits and deletes write the whole ledger back immediately (overwrite
/// mode). When that write fails the in-memory change is kept and the failure
/// is returned, so memory and disk differ until the next successful export.
pub struct LedgerManager {
    ledger: Ledger,
    storage: Box<dyn StorageBackend>,
}

impl LedgerManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            ledger: Ledger::new(),
            storage,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    /// Appends `record` and returns the id it is tracked under.
    pub fn add(&mut self, record: Record) -> Uuid {
        let summary = record.to_string();
        let id = self.ledger.add(record);
        debug!(%id, record = %summary, "record added");
        id
    }

    /// Replaces the record at `index` and rewrites `file_name`.
    /// Returns the record that was replaced.
    pub fn edit_at(&mut self, index: usize, record: Record, file_name: &str) -> Result<Record> {
        let previous = self.ledger.replace(index, record)?;
        let id = self.ledger.id_at(index);
        debug!(index, ?id, previous = %previous, "record replaced");
        self.sync(file_name)?;
        Ok(previous)
    }

    /// Removes the record at `index` and rewrites `file_name`.
    /// Returns the removed record.
    pub fn delete_at(&mut self, index: usize, file_name: &str) -> Result<Record> {
        let id = self.ledger.id_at(index);
        let removed = self.ledger.remove(index)?;
        debug!(index, ?id, removed = %removed, "record removed");
        self.sync(file_name)?;
        Ok(removed)
    }

    pub fn export(&self, file_name: &str, mode: ExportMode) -> Result<ExportReport> {
        let records: Vec<&Record> = self.ledger.records().collect();
        let path = self.storage.path_for(file_name);
        match self.storage.write_records(file_name, &records, mode) {
            Ok(written) => {
                info!(path = %path.display(), ?mode, written, "ledger exported");
                Ok(ExportReport {
                    path,
                    mode,
                    written,
                })
            }
            Err(err) => {
                warn!(path = %path.display(), ?mode, error = %err, "export failed");
                Err(err)
            }
        }
    }

    /// Replaces the ledger with the contents of `file_name`.
    ///
    /// On any failure the ledger is left empty; a missing file reports
    /// `NotFound` so callers can treat it as a fresh start.
    pub fn load(&mut self, file_name: &str) -> Result<LoadReport> {
        self.ledger.clear();
        let path = self.storage.path_for(file_name);
        match self.storage.read_records(file_name) {
            Ok(records) => {
                self.ledger = Ledger::from_records(records);
                info!(path = %path.display(), records = self.ledger.len(), "ledger loaded");
                Ok(LoadReport {
                    path,
                    records: self.ledger.len(),
                })
            }
            Err(err @ LedgerError::NotFound(_)) => {
                warn!(path = %path.display(), "ledger file missing, starting empty");
                Err(err)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "load failed, starting empty");
                Err(err)
            }
        }
    }

    fn sync(&self, file_name: &str) -> Result<()> {
        self.export(file_name, ExportMode::Overwrite).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::CsvStorage;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn manager() -> (TempDir, LedgerManager) {
        let temp = tempdir().unwrap();
        let storage = CsvStorage::new(temp.path().join("files"));
        (temp, LedgerManager::new(Box::new(storage)))
    }

    fn record(amount: f64, category: &str, date: &str, kind: &str) -> Record {
        Record::new(amount, category, date, kind).unwrap()
    }

    #[test]
    fn edit_rewrites_target_file() {
        let (_temp, mut manager) = manager();
        manager.add(record(100.0, "Еда", "2023-10-01", "expense"));
        manager.add(record(50000.0, "Зарплата", "2023-10-01", "income"));

        let replacement = record(200.0, "Транспорт", "2023-10-02", "expense");
        let previous = manager.edit_at(0, replacement.clone(), "data.csv").unwrap();
        assert_eq!(previous.category(), "Еда");
        assert_eq!(manager.ledger().get(0), Some(&replacement));

        let on_disk = manager.storage().read_records("data.csv").unwrap();
        let in_memory: Vec<Record> = manager.ledger().records().cloned().collect();
        assert_eq!(on_disk, in_memory);
    }

    #[test]
    fn edit_keeps_the_id_returned_by_add() {
        let (_temp, mut manager) = manager();
        manager.add(record(1.0, "First", "2023-10-01", "expense"));
        let id = manager.add(record(2.0, "Second", "2023-10-01", "expense"));

        manager
            .edit_at(1, record(3.0, "Third", "2023-10-02", "expense"), "data.csv")
            .unwrap();
        assert_eq!(manager.ledger().id_at(1), Some(id));

        manager.delete_at(0, "data.csv").unwrap();
        assert_eq!(manager.ledger().id_at(0), Some(id));
    }

    #[test]
    fn out_of_range_edit_performs_no_io() {
        let (_temp, mut manager) = manager();
        manager.add(record(100.0, "Еда", "2023-10-01", "expense"));

        let err = manager
            .edit_at(1, record(1.0, "X", "2023-10-01", "expense"), "data.csv")
            .unwrap_err();
        assert!(matches!(err, LedgerError::IndexOutOfRange { index: 1, len: 1 }));
        assert!(!manager.storage().exists("data.csv"));
        assert_eq!(manager.ledger().get(0).map(Record::amount), Some(100.0));

        let err = manager.delete_at(1, "data.csv").unwrap_err();
        assert!(matches!(err, LedgerError::IndexOutOfRange { .. }));
        assert!(!manager.storage().exists("data.csv"));
        assert_eq!(manager.ledger().len(), 1);
    }

    #[test]
    fn failed_sync_keeps_in_memory_change() {
        let (temp, mut manager) = manager();
        manager.add(record(100.0, "Еда", "2023-10-01", "expense"));
        manager.add(record(5.0, "Tea", "2023-10-03", "expense"));
        let blocked = temp.path().join("files").join("blocked.csv");
        fs::create_dir_all(&blocked).unwrap();

        let err = manager.delete_at(0, "blocked.csv").unwrap_err();
        assert!(matches!(err, LedgerError::ExportFailed(_)));
        assert_eq!(manager.ledger().len(), 1);
        assert_eq!(manager.ledger().get(0).map(Record::category), Some("Tea"));
    }

    #[test]
    fn load_missing_file_leaves_empty_ledger() {
        let (_temp, mut manager) = manager();
        manager.add(record(1.0, "Stale", "2023-10-01", "expense"));
        let err = manager.load("nope.csv").unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
        assert!(manager.ledger().is_empty());
    }

    #[test]
    fn load_failure_is_all_or_nothing() {
        let (temp, mut manager) = manager();
        let dir = temp.path().join("files");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("broken.csv"),
            "Date,Type,Category,Amount\n2023-10-01,income,Salary,10\n2023-10-02,gift,Aunt,5\n",
        )
        .unwrap();

        let err = manager.load("broken.csv").unwrap_err();
        assert!(matches!(err, LedgerError::LoadFailed(_)));
        assert!(manager.ledger().is_empty());
    }

    #[test]
    fn export_then_load_reproduces_records() {
        let (_temp, mut manager) = manager();
        let records = vec![
            record(100.0, "Еда", "2023-10-01", "expense"),
            record(50000.0, "Зарплата", "2023-10-01", "income"),
            record(-12.75, "Refund", "2024-02-29", "expense"),
        ];
        for item in &records {
            manager.add(item.clone());
        }
        let report = manager.export("data.csv", ExportMode::Overwrite).unwrap();
        assert_eq!(report.written, 3);

        let loaded = manager.load("data.csv").unwrap();
        assert_eq!(loaded.records, 3);
        let reloaded: Vec<Record> = manager.ledger().records().cloned().collect();
        assert_eq!(reloaded, records);
    }
}
