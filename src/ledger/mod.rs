//! Ledger records, the in-memory ledger, and the aggregates derived from it.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod record;
pub mod summary;

pub use ledger::Ledger;
pub use record::{parse_date, Kind, Record, DATE_FORMAT, DEFAULT_CURRENCY_SUFFIX};
