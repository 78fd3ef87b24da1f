#![allow(dead_code)]

use std::{fs, path::Path};

use finance_tracker::{
    core::LedgerManager,
    ledger::Record,
    storage::CsvStorage,
};
use tempfile::TempDir;

pub const SALARY_AND_FOOD: &str =
    "Date,Type,Category,Amount\n2023-10-01,income,Зарплата,50000\n2023-10-02,expense,Еда,1500\n";

/// Creates a manager whose storage root is `files/` inside a fresh temp dir.
/// Keep the returned guard alive for the duration of the test.
pub fn setup_test_env() -> (TempDir, LedgerManager) {
    let temp = TempDir::new().expect("create temp dir");
    let storage = CsvStorage::new(temp.path().join("files"));
    (temp, LedgerManager::new(Box::new(storage)))
}

pub fn record(amount: f64, category: &str, date: &str, kind: &str) -> Record {
    Record::new(amount, category, date, kind).expect("valid record")
}

pub fn salary() -> Record {
    record(50000.0, "Зарплата", "2023-10-01", "income")
}

pub fn food() -> Record {
    record(1500.0, "Еда", "2023-10-02", "expense")
}

pub fn write_ledger_file(base: &Path, name: &str, contents: &str) {
    let dir = base.join("files");
    fs::create_dir_all(&dir).expect("create storage dir");
    fs::write(dir.join(name), contents).expect("write ledger file");
}

pub fn read_ledger_file(base: &Path, name: &str) -> String {
    fs::read_to_string(base.join("files").join(name)).expect("read ledger file")
}
