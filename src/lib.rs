#![doc(test(attr(deny(warnings))))]

//! Finance Tracker keeps a personal income/expense ledger in memory, keeps it
//! in sync with a delimited text file, and derives balances and reports from it.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Finance Tracker tracing initialized.");
    });
}
