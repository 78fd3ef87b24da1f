use std::{
    collections::HashSet,
    fs::{self, OpenOptions},
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::{
    errors::{LedgerError, Result},
    ledger::{Record, DATE_FORMAT},
    utils::ensure_dir,
};

use super::{ExportMode, StorageBackend};

/// Literal header row of every ledger file.
pub const HEADER: [&str; 4] = ["Date", "Type", "Category", "Amount"];

const LEDGER_EXTENSION: &str = "csv";

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Amount")]
    amount: String,
}

impl CsvRow {
    fn from_record(record: &Record) -> Self {
        Self {
            date: record.date().format(DATE_FORMAT).to_string(),
            kind: record.kind().to_string(),
            category: record.category().to_string(),
            amount: record.amount().to_string(),
        }
    }

    fn into_record(self) -> Result<Record> {
        let amount = self
            .amount
            .parse::<f64>()
            .map_err(|_| LedgerError::InvalidAmount(self.amount.clone()))?;
        Record::new(amount, self.category, &self.date, &self.kind)
    }
}

/// Delimited-text storage rooted at a single directory.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    root: PathBuf,
}

impl CsvStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> io::Result<()> {
        ensure_dir(&self.root)
    }
}

impl StorageBackend for CsvStorage {
    fn path_for(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let listing = || -> io::Result<Vec<String>> {
            self.ensure_root()?;
            let mut names = Vec::new();
            for entry in fs::read_dir(&self.root)? {
                let path = entry?.path();
                if !path.is_file()
                    || path.extension().and_then(|ext| ext.to_str()) != Some(LEDGER_EXTENSION)
                {
                    continue;
                }
                if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                    names.push(name.to_string());
                }
            }
            names.sort();
            Ok(names)
        };
        listing().map_err(|err| {
            LedgerError::LoadFailed(format!("cannot list {}: {err}", self.root.display()))
        })
    }

    fn read_records(&self, file_name: &str) -> Result<Vec<Record>> {
        self.ensure_root().map_err(|err| {
            LedgerError::LoadFailed(format!("cannot prepare {}: {err}", self.root.display()))
        })?;
        let path = self.path_for(file_name);
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(LedgerError::NotFound(path));
            }
            Err(err) => {
                return Err(LedgerError::LoadFailed(format!("{}: {err}", path.display())));
            }
        };
        parse_records(file, &path)
    }

    fn write_records(
        &self,
        file_name: &str,
        records: &[&Record],
        mode: ExportMode,
    ) -> Result<usize> {
        let path = self.path_for(file_name);
        self.ensure_root().map_err(|err| export_failed(&path, err))?;
        match mode {
            ExportMode::Overwrite => overwrite(&path, records),
            ExportMode::Append => append(&path, records),
        }
    }
}

/// Contents of a ledger file. A file holding nothing but blank lines has no
/// header.
struct ParsedFile {
    has_header: bool,
    records: Vec<Record>,
}

fn parse_records(source: impl Read, path: &Path) -> Result<Vec<Record>> {
    parse_file(source, path).map(|parsed| parsed.records)
}

/// Parses a header row followed by `Date,Type,Category,Amount` rows.
/// Any malformed row fails the whole parse.
fn parse_file(source: impl Read, path: &Path) -> Result<ParsedFile> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(source);
    let headers = reader
        .headers()
        .map_err(|err| LedgerError::LoadFailed(format!("{}: {err}", path.display())))?
        .clone();
    if headers.is_empty() {
        return Ok(ParsedFile {
            has_header: false,
            records: Vec::new(),
        });
    }
    if !headers.iter().eq(HEADER.iter().copied()) {
        return Err(LedgerError::LoadFailed(format!(
            "{}: unexpected header `{}`",
            path.display(),
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut records = Vec::new();
    for (offset, row) in reader.deserialize::<CsvRow>().enumerate() {
        let line = offset + 2;
        let record = row
            .map_err(|err| err.to_string())
            .and_then(|row| row.into_record().map_err(|err| err.to_string()))
            .map_err(|reason| {
                LedgerError::LoadFailed(format!("{} line {line}: {reason}", path.display()))
            })?;
        records.push(record);
    }
    Ok(ParsedFile {
        has_header: true,
        records,
    })
}

/// Writes into an anonymous file next to `path`, then moves it over `path`.
fn overwrite(path: &Path, records: &[&Record]) -> Result<usize> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let staged = || -> std::result::Result<usize, csv::Error> {
        let mut staging = NamedTempFile::new_in(parent)?;
        {
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(staging.as_file_mut());
            writer.write_record(HEADER)?;
            for record in records {
                writer.serialize(CsvRow::from_record(record))?;
            }
            writer.flush()?;
        }
        staging.persist(path).map_err(|err| err.error)?;
        Ok(records.len())
    };
    staged().map_err(|err| export_failed(path, err))
}

fn append(path: &Path, records: &[&Record]) -> Result<usize> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(export_failed(path, err)),
    };
    let parsed = parse_file(existing.as_bytes(), path)
        .map_err(|err| export_failed(path, format!("cannot read existing rows ({err})")))?;
    let mut seen: HashSet<Record> = parsed.records.into_iter().collect();
    // Structural duplicates are skipped, including repeats within `records`.
    let fresh: Vec<&Record> = records
        .iter()
        .copied()
        .filter(|record| seen.insert((*record).clone()))
        .collect();

    let appended = || -> std::result::Result<(), csv::Error> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if !existing.is_empty() && !existing.ends_with('\n') {
            file.write_all(b"\n")?;
        }
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if !parsed.has_header {
            writer.write_record(HEADER)?;
        }
        for record in &fresh {
            writer.serialize(CsvRow::from_record(record))?;
        }
        writer.flush()?;
        Ok(())
    };
    appended().map_err(|err| export_failed(path, err))?;
    Ok(fresh.len())
}

fn export_failed(path: &Path, reason: impl std::fmt::Display) -> LedgerError {
    LedgerError::ExportFailed(format!("{}: {reason}", path.display()))
}
