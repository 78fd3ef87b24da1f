use uuid::Uuid;

use crate::errors::{LedgerError, Result};

use super::record::Record;

#[derive(Debug, Clone)]
struct Entry {
    id: Uuid,
    record: Record,
}

/// Ordered, index-addressed collection of records.
///
/// Positions are dense and 0-based; removing index `i` shifts every later
/// record down by one. Each entry also carries an opaque id that survives
/// such shifts, for callers that need a stable handle between operations.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<Entry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut ledger = Self::new();
        for record in records {
            ledger.add(record);
        }
        ledger
    }

    /// Appends a record and returns its stable id.
    pub fn add(&mut self, record: Record) -> Uuid {
        let id = Uuid::new_v4();
        self.entries.push(Entry { id, record });
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.entries.get(index).map(|entry| &entry.record)
    }

    pub fn id_at(&self, index: usize) -> Option<Uuid> {
        self.entries.get(index).map(|entry| entry.id)
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.entries.iter().map(|entry| &entry.record)
    }

    pub fn check_index(&self, index: usize) -> Result<()> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(LedgerError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }

    /// Swaps in `record` at `index`, returning the record it replaced.
    /// The entry keeps its id.
    pub fn replace(&mut self, index: usize, record: Record) -> Result<Record> {
        self.check_index(index)?;
        let entry = &mut self.entries[index];
        Ok(std::mem::replace(&mut entry.record, record))
    }

    pub fn remove(&mut self, index: usize) -> Result<Record> {
        self.check_index(index)?;
        Ok(self.entries.remove(index).record)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
