//! Handlers behind each main menu entry.

use crate::cli::chart;
use crate::cli::core::{CliError, CommandResult, LoopControl, ShellContext};
use crate::cli::output;
use crate::cli::prompt::{parse_amount, Field};
use crate::errors::LedgerError;
use crate::ledger::{parse_date, Record};
use crate::storage::ExportMode;

/// Prompt wording for the record form; editing prefixes every label.
#[derive(Clone, Copy)]
enum FormPurpose {
    Add,
    Edit,
}

impl FormPurpose {
    fn label(self, field: &str) -> String {
        match self {
            FormPurpose::Add => format!("{field}: "),
            FormPurpose::Edit => {
                let mut chars = field.chars();
                let lowered: String = chars
                    .next()
                    .map(|first| first.to_lowercase().chain(chars).collect())
                    .unwrap_or_default();
                format!("New {lowered}: ")
            }
        }
    }
}

impl ShellContext {
    pub(crate) fn cmd_add(&mut self) -> CommandResult {
        let Some(record) = self.read_record(FormPurpose::Add)? else {
            return Ok(LoopControl::Continue);
        };
        self.manager.add(record);
        output::success("Record added.");
        Ok(LoopControl::Continue)
    }

    pub(crate) fn cmd_balance(&mut self) -> CommandResult {
        let balance = self.manager.ledger().balance();
        output::info(format!(
            "Current balance: {} {}",
            balance, self.config.currency_suffix
        ));
        Ok(LoopControl::Continue)
    }

    pub(crate) fn cmd_monthly_report(&mut self) -> CommandResult {
        let Some(month) = self.read_parsed(
            "Month (1-12): ",
            "Month must be a number from 1 to 12.",
            |text| text.parse::<u32>().ok().filter(|month| (1..=12).contains(month)),
        )?
        else {
            return Ok(LoopControl::Continue);
        };
        let Some(year) = self.read_parsed("Year: ", "Year must be a whole number.", |text| {
            text.parse::<i32>().ok()
        })?
        else {
            return Ok(LoopControl::Continue);
        };

        let report = self.manager.ledger().monthly_report(month, year);
        if report.is_empty() {
            output::info(format!("No records for {month:02}.{year}."));
            return Ok(LoopControl::Continue);
        }
        output::section(format!("Report for {month:02}.{year}"));
        for record in report {
            output::info(record.render(&self.config.currency_suffix));
        }
        Ok(LoopControl::Continue)
    }

    pub(crate) fn cmd_visualize(&mut self) -> CommandResult {
        let totals = self.manager.ledger().category_spend_totals();
        if totals.is_empty() {
            output::info("No expenses to show.");
            return Ok(LoopControl::Continue);
        }
        output::section("Spending by category");
        print!(
            "{}",
            chart::render_spending_chart(&totals, &self.config.currency_suffix)
        );
        Ok(LoopControl::Continue)
    }

    pub(crate) fn cmd_export(&mut self) -> CommandResult {
        let prompt = format!(
            "File name for export (Enter for {}): ",
            self.config.default_file
        );
        let Some(answer) = self.prompter.read_line(&prompt, Field::Text)? else {
            return Ok(cancelled());
        };
        let file_name = match answer.trim() {
            "" => self.config.default_file.clone(),
            name => name.to_string(),
        };

        let mode = if self.manager.storage().exists(&file_name) {
            match self
                .prompter
                .confirm("File already exists. Append new records to it?")?
            {
                Some(true) => ExportMode::Append,
                Some(false) => ExportMode::Overwrite,
                None => return Ok(cancelled()),
            }
        } else {
            ExportMode::Overwrite
        };

        let report = self.manager.export(&file_name, mode)?;
        match report.mode {
            ExportMode::Overwrite => output::success(format!(
                "Exported {} record(s) to {}.",
                report.written,
                report.path.display()
            )),
            ExportMode::Append => output::success(format!(
                "Appended {} new record(s) to {}.",
                report.written,
                report.path.display()
            )),
        }
        Ok(LoopControl::Continue)
    }

    pub(crate) fn cmd_edit(&mut self) -> CommandResult {
        if !self.list_records() {
            return Ok(LoopControl::Continue);
        }
        let Some(index) = self.read_index("Index of the record to edit: ")? else {
            return Ok(LoopControl::Continue);
        };
        let Some(record) = self.read_record(FormPurpose::Edit)? else {
            return Ok(LoopControl::Continue);
        };
        let Some(file_name) = self.read_file_name("File to update (e.g. data.csv): ")? else {
            return Ok(LoopControl::Continue);
        };

        match self.manager.edit_at(index, record, &file_name) {
            Ok(previous) => {
                output::success(format!("Record {index} updated (was: {previous})."));
                Ok(LoopControl::Continue)
            }
            Err(err) => Err(self.unsaved_change(err)),
        }
    }

    pub(crate) fn cmd_delete(&mut self) -> CommandResult {
        if !self.list_records() {
            return Ok(LoopControl::Continue);
        }
        let Some(index) = self.read_index("Index of the record to delete: ")? else {
            return Ok(LoopControl::Continue);
        };
        let Some(file_name) = self.read_file_name("File to update (e.g. data.csv): ")? else {
            return Ok(LoopControl::Continue);
        };

        match self.manager.delete_at(index, &file_name) {
            Ok(removed) => {
                output::success(format!("Record removed: {removed}"));
                Ok(LoopControl::Continue)
            }
            Err(err) => Err(self.unsaved_change(err)),
        }
    }

    /// Prints the ledger with indices. Returns `false` when there is nothing
    /// to pick from.
    fn list_records(&self) -> bool {
        let ledger = self.manager.ledger();
        if ledger.is_empty() {
            output::info("The ledger is empty.");
            return false;
        }
        output::section("Records");
        for (index, record) in ledger.records().enumerate() {
            output::info(format!(
                "[{index}] {}",
                record.render(&self.config.currency_suffix)
            ));
        }
        true
    }

    fn read_index(&mut self, prompt: &str) -> Result<Option<usize>, CliError> {
        let Some(answer) = self.prompter.read_line(prompt, Field::Text)? else {
            cancelled();
            return Ok(None);
        };
        let Ok(index) = answer.trim().parse::<usize>() else {
            output::error("Index must be a non-negative whole number.");
            return Ok(None);
        };
        if let Err(err) = self.manager.ledger().check_index(index) {
            output::error(err);
            return Ok(None);
        }
        Ok(Some(index))
    }

    fn read_file_name(&mut self, prompt: &str) -> Result<Option<String>, CliError> {
        let Some(answer) = self.prompter.read_line(prompt, Field::Text)? else {
            cancelled();
            return Ok(None);
        };
        let name = answer.trim();
        if name.is_empty() {
            output::error("File name must not be empty.");
            return Ok(None);
        }
        Ok(Some(name.to_string()))
    }

    /// Reads one answer and parses it, printing `invalid` when parsing fails.
    fn read_parsed<T>(
        &mut self,
        prompt: &str,
        invalid: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, CliError> {
        let Some(answer) = self.prompter.read_line(prompt, Field::Text)? else {
            cancelled();
            return Ok(None);
        };
        let parsed = parse(answer.trim());
        if parsed.is_none() {
            output::error(invalid);
        }
        Ok(parsed)
    }

    /// Runs the record form. Amount and date are asked again until valid;
    /// an empty category or an unknown kind abandons the form.
    fn read_record(&mut self, purpose: FormPurpose) -> Result<Option<Record>, CliError> {
        let amount = loop {
            let Some(answer) = self
                .prompter
                .read_line(&purpose.label("Amount"), Field::Amount)?
            else {
                return Ok(cancelled_form());
            };
            match parse_amount(&answer) {
                Some(amount) => break amount,
                None => output::warning("Amount must be a number, e.g. 100 or 50.5."),
            }
        };

        let Some(category) = self
            .prompter
            .read_line(&purpose.label("Category"), Field::Text)?
        else {
            return Ok(cancelled_form());
        };
        let category = category.trim().to_string();
        if category.is_empty() {
            output::error("Category must not be empty.");
            return Ok(None);
        }

        let date = loop {
            let Some(answer) = self
                .prompter
                .read_line(&purpose.label("Date (YYYY-MM-DD)"), Field::Date)?
            else {
                return Ok(cancelled_form());
            };
            let answer = answer.trim().to_string();
            match parse_date(&answer) {
                Ok(_) => break answer,
                Err(_) => output::warning("Invalid date. Use YYYY-MM-DD, e.g. 2023-12-31."),
            }
        };

        let Some(kind) = self
            .prompter
            .read_line(&purpose.label("Type (income/expense)"), Field::Kind)?
        else {
            return Ok(cancelled_form());
        };
        let kind = kind.trim().to_lowercase();
        if kind != "income" && kind != "expense" {
            output::error("Type must be 'income' or 'expense'.");
            return Ok(None);
        }

        Ok(Some(Record::new(amount, category, &date, &kind)?))
    }

    fn unsaved_change(&self, err: LedgerError) -> CliError {
        if matches!(err, LedgerError::ExportFailed(_)) {
            output::warning("The change is kept in memory but was not saved. Export to retry.");
        }
        err.into()
    }
}

fn cancelled() -> LoopControl {
    output::info("Cancelled.");
    LoopControl::Continue
}

fn cancelled_form() -> Option<Record> {
    output::info("Cancelled.");
    None
}
