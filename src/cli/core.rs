//! Shell context, error type, and the main menu loop.

use std::{io, path::Path};

use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::cli::menu::{self, Command};
use crate::cli::output;
use crate::cli::prompt::{Field, Prompter};
use crate::config::{Config, ConfigError};
use crate::core::LedgerManager;
use crate::errors::LedgerError;
use crate::storage::CsvStorage;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Input error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("Prompt error: {0}")]
    Dialog(#[from] dialoguer::Error),
}

pub type CommandResult = Result<LoopControl, CliError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub struct ShellContext {
    pub(crate) manager: LedgerManager,
    pub(crate) config: Config,
    pub(crate) prompter: Box<dyn Prompter>,
}

impl ShellContext {
    pub fn new(config: Config, base_dir: &Path, prompter: Box<dyn Prompter>) -> Self {
        let storage = CsvStorage::new(config.storage_root(base_dir));
        Self {
            manager: LedgerManager::new(Box::new(storage)),
            config,
            prompter,
        }
    }

    pub fn manager(&self) -> &LedgerManager {
        &self.manager
    }

    /// Offers the startup file picker, then serves the menu until the user
    /// quits or input ends.
    pub fn run(&mut self) -> Result<(), CliError> {
        if let Err(err) = self.pick_startup_file() {
            self.report_error(err)?;
        }

        loop {
            menu::print_main_menu();
            let Some(choice) = self.prompter.read_line("Choose an action: ", Field::Text)? else {
                output::info("Exiting.");
                break;
            };
            match self.dispatch(&choice) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break,
                Err(err) => self.report_error(err)?,
            }
        }
        Ok(())
    }

    pub fn dispatch(&mut self, choice: &str) -> CommandResult {
        let Some(command) = Command::from_choice(choice) else {
            output::warning("Unknown choice. Enter a number from 1 to 8.");
            return Ok(LoopControl::Continue);
        };
        match command {
            Command::Add => self.cmd_add(),
            Command::Balance => self.cmd_balance(),
            Command::MonthlyReport => self.cmd_monthly_report(),
            Command::Visualize => self.cmd_visualize(),
            Command::Export => self.cmd_export(),
            Command::Edit => self.cmd_edit(),
            Command::Delete => self.cmd_delete(),
            Command::Quit => {
                output::info("Goodbye.");
                Ok(LoopControl::Exit)
            }
        }
    }

    /// Ledger errors are shown and the shell keeps going; anything else ends
    /// the session.
    pub(crate) fn report_error(&self, err: CliError) -> Result<(), CliError> {
        match err {
            CliError::Ledger(err) => {
                output::error(err);
                Ok(())
            }
            other => Err(other),
        }
    }

    fn pick_startup_file(&mut self) -> Result<(), CliError> {
        let files = self.manager.storage().list_files()?;
        if files.is_empty() {
            output::info("No CSV files found. Starting with an empty ledger.");
            return Ok(());
        }

        output::section("Available files");
        for (number, name) in files.iter().enumerate() {
            output::info(format!("{}. {}", number + 1, name));
        }
        let answer = self
            .prompter
            .read_line("File number to load (Enter to start empty): ", Field::Text)?;
        let chosen = answer
            .and_then(|text| text.trim().parse::<usize>().ok())
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| files.get(index));
        let Some(file_name) = chosen else {
            output::info("Nothing loaded. Starting with an empty ledger.");
            return Ok(());
        };

        match self.manager.load(file_name) {
            Ok(report) => {
                output::success(format!(
                    "Loaded {} record(s) from {}.",
                    report.records,
                    report.path.display()
                ));
            }
            Err(LedgerError::NotFound(path)) => {
                output::warning(format!(
                    "File {} not found. Starting with an empty ledger.",
                    path.display()
                ));
            }
            Err(err) => {
                output::error(format!("{err}. Starting with an empty ledger."));
            }
        }
        Ok(())
    }
}
