//! Aggregates derived from a ledger. Everything is recomputed from scratch on
//! each call; nothing is cached between mutations.

use std::collections::BTreeMap;

use super::{ledger::Ledger, record::Record};

impl Ledger {
    /// Sum of incomes minus sum of expenses.
    pub fn balance(&self) -> f64 {
        let income: f64 = self
            .records()
            .filter(|record| record.is_income())
            .map(Record::amount)
            .sum();
        let expense: f64 = self
            .records()
            .filter(|record| record.is_expense())
            .map(Record::amount)
            .sum();
        income - expense
    }

    /// Records whose category equals `category` exactly, in ledger order.
    pub fn filter_by_category(&self, category: &str) -> Vec<&Record> {
        self.records()
            .filter(|record| record.category() == category)
            .collect()
    }

    /// Records dated within `month`/`year`, in ledger order (no sorting).
    pub fn monthly_report(&self, month: u32, year: i32) -> Vec<&Record> {
        self.records()
            .filter(|record| record.falls_in(month, year))
            .collect()
    }

    /// Total expense per category. Categories without expenses are absent.
    pub fn category_spend_totals(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for record in self.records().filter(|record| record.is_expense()) {
            *totals.entry(record.category().to_string()).or_insert(0.0) += record.amount();
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(amount: f64, category: &str, date: &str, kind: &str) -> Record {
        Record::new(amount, category, date, kind).unwrap()
    }

    #[test]
    fn balance_subtracts_expenses_from_income() {
        let ledger = Ledger::from_records([
            record(50000.0, "Зарплата", "2023-10-01", "income"),
            record(1500.0, "Еда", "2023-10-02", "expense"),
        ]);
        assert_eq!(ledger.balance(), 48500.0);
    }

    #[test]
    fn balance_is_independent_of_insertion_order() {
        let records = vec![
            record(10.0, "Salary", "2023-01-01", "income"),
            record(4.0, "Food", "2023-01-02", "expense"),
            record(2.0, "Gift", "2023-01-03", "income"),
            record(7.0, "Rent", "2023-01-04", "expense"),
        ];
        let forward = Ledger::from_records(records.clone());
        let reversed = Ledger::from_records(records.into_iter().rev());
        assert_eq!(forward.balance(), 1.0);
        assert_eq!(forward.balance(), reversed.balance());
    }

    #[test]
    fn empty_ledger_has_zero_balance() {
        assert_eq!(Ledger::new().balance(), 0.0);
        assert!(Ledger::new().category_spend_totals().is_empty());
    }

    #[test]
    fn filter_by_category_is_exact_and_ordered() {
        let ledger = Ledger::from_records([
            record(1.0, "Food", "2023-01-01", "expense"),
            record(2.0, "food", "2023-01-02", "expense"),
            record(3.0, "Food ", "2023-01-03", "expense"),
            record(4.0, "Food", "2023-01-04", "income"),
        ]);
        let amounts: Vec<f64> = ledger
            .filter_by_category("Food")
            .into_iter()
            .map(Record::amount)
            .collect();
        assert_eq!(amounts, vec![1.0, 4.0]);
    }

    #[test]
    fn monthly_report_keeps_ledger_order() {
        let ledger = Ledger::from_records([
            record(1.0, "A", "2023-10-20", "expense"),
            record(2.0, "B", "2023-11-01", "expense"),
            record(3.0, "C", "2023-10-01", "income"),
            record(4.0, "D", "2022-10-15", "expense"),
        ]);
        let categories: Vec<&str> = ledger
            .monthly_report(10, 2023)
            .into_iter()
            .map(Record::category)
            .collect();
        assert_eq!(categories, vec!["A", "C"]);
        assert!(ledger.monthly_report(12, 2023).is_empty());
    }

    #[test]
    fn spend_totals_only_count_expenses() {
        let ledger = Ledger::from_records([
            record(100.0, "Food", "2023-10-01", "expense"),
            record(50.0, "Food", "2023-10-02", "expense"),
            record(900.0, "Salary", "2023-10-03", "income"),
            record(30.0, "Taxi", "2023-10-04", "expense"),
            record(5.0, "Taxi", "2023-10-05", "income"),
        ]);
        let totals = ledger.category_spend_totals();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals.get("Food"), Some(&150.0));
        assert_eq!(totals.get("Taxi"), Some(&30.0));
        assert!(!totals.contains_key("Salary"));
    }
}
