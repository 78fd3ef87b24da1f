//! Text rendering of expense totals per category.

use std::collections::BTreeMap;

pub const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub category: String,
    pub total: f64,
    /// Fraction of all spending, in `0.0..=1.0` when every total is positive.
    pub share: f64,
}

/// Orders categories by descending total. Ties keep alphabetical order.
pub fn spending_rows(totals: &BTreeMap<String, f64>) -> Vec<ChartRow> {
    let sum: f64 = totals.values().sum();
    let mut rows: Vec<ChartRow> = totals
        .iter()
        .map(|(category, total)| ChartRow {
            category: category.clone(),
            total: *total,
            share: if sum > 0.0 { total / sum } else { 0.0 },
        })
        .collect();
    rows.sort_by(|a, b| b.total.total_cmp(&a.total));
    rows
}

pub fn render_spending_chart(totals: &BTreeMap<String, f64>, currency_suffix: &str) -> String {
    let rows = spending_rows(totals);
    let name_width = rows
        .iter()
        .map(|row| row.category.chars().count())
        .max()
        .unwrap_or(0);
    let amounts: Vec<String> = rows.iter().map(|row| format!("{:.2}", row.total)).collect();
    let amount_width = amounts.iter().map(String::len).max().unwrap_or(0);

    let mut out = String::new();
    for (row, amount) in rows.iter().zip(&amounts) {
        let share = row.share * 100.0;
        out.push_str(&format!(
            "{:<name_width$}  {:>amount_width$} {}  {:>5.1}%  {}\n",
            row.category,
            amount,
            currency_suffix,
            share,
            bar(row.share),
        ));
    }
    out
}

fn bar(share: f64) -> String {
    let cells = (share * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize;
    "█".repeat(cells)
}
