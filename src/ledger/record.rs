use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use chrono::{Datelike, NaiveDate};

use crate::errors::{LedgerError, Result};

/// Canonical textual form for record dates, both on screen and on disk.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Suffix appended to rendered amounts when no configuration overrides it.
pub const DEFAULT_CURRENCY_SUFFIX: &str = "руб.";

/// Income/expense classification of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
        }
    }
}

impl FromStr for Kind {
    type Err = LedgerError;

    /// Accepts only the exact lower-case spellings; callers normalise case first.
    fn from_str(value: &str) -> Result<Self> {
        match value {
            "income" => Ok(Kind::Income),
            "expense" => Ok(Kind::Expense),
            other => Err(LedgerError::InvalidKind(other.to_string())),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ledger entry. Records are never mutated in place; edits replace them.
#[derive(Debug, Clone)]
pub struct Record {
    amount: f64,
    category: String,
    date: NaiveDate,
    kind: Kind,
}

impl Record {
    /// Builds a record from the textual date and kind supplied by an input layer.
    pub fn new(amount: f64, category: impl Into<String>, date: &str, kind: &str) -> Result<Self> {
        let date = parse_date(date)?;
        let kind = kind.parse::<Kind>()?;
        Self::from_parts(amount, category, date, kind)
    }

    pub fn from_parts(
        amount: f64,
        category: impl Into<String>,
        date: NaiveDate,
        kind: Kind,
    ) -> Result<Self> {
        if !amount.is_finite() {
            return Err(LedgerError::InvalidAmount(amount.to_string()));
        }
        let category = category.into();
        if category.is_empty() {
            return Err(LedgerError::InvalidCategory);
        }
        Ok(Self {
            amount,
            category,
            date,
            kind,
        })
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is_income(&self) -> bool {
        self.kind == Kind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == Kind::Expense
    }

    pub fn falls_in(&self, month: u32, year: i32) -> bool {
        self.date.month() == month && self.date.year() == year
    }

    /// `2023-10-01 | EXPENSE | Еда: 100 руб.`
    pub fn render(&self, currency_suffix: &str) -> String {
        format!(
            "{} | {} | {}: {} {}",
            self.date.format(DATE_FORMAT),
            self.kind.as_str().to_uppercase(),
            self.category,
            self.amount,
            currency_suffix
        )
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_CURRENCY_SUFFIX))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.amount == other.amount
            && self.category == other.category
            && self.date == other.date
            && self.kind == other.kind
    }
}

// Amounts are always finite, so equality on them is reflexive.
impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // 0.0 == -0.0 must hash identically.
        let amount = if self.amount == 0.0 { 0.0 } else { self.amount };
        amount.to_bits().hash(state);
        self.category.hash(state);
        self.date.hash(state);
        self.kind.hash(state);
    }
}

/// Parses `YYYY-MM-DD` text into a calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| LedgerError::InvalidDate(value.to_string()))
}
