use std::{
    env,
    io::{self, IsTerminal},
};

use tracing::debug;

use crate::cli::core::{CliError, ShellContext};
use crate::cli::output::{self, OutputPreferences};
use crate::cli::prompt::{Prompter, ScriptPrompter, TerminalPrompter};
use crate::config::ConfigManager;

/// How answers are read from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

impl CliMode {
    pub fn detect() -> Self {
        if io::stdin().is_terminal() {
            CliMode::Interactive
        } else {
            CliMode::Script
        }
    }
}

/// Runs the menu shell against the current working directory.
pub fn run_cli() -> Result<(), CliError> {
    let config_manager = ConfigManager::with_base_dir(env::current_dir()?);
    let config = config_manager.load()?;
    debug!(path = %config_manager.config_path().display(), ?config, "configuration loaded");

    if !config.ui_color_enabled {
        colored::control::set_override(false);
    }
    output::set_preferences(OutputPreferences {
        plain_mode: !config.ui_color_enabled,
    });

    let mode = CliMode::detect();
    let prompter: Box<dyn Prompter> = match mode {
        CliMode::Interactive => Box::new(TerminalPrompter::new()?),
        CliMode::Script => Box::new(ScriptPrompter::new(io::stdin().lock())),
    };
    debug!(?mode, "starting shell");

    let mut context = ShellContext::new(config, config_manager.base_dir(), prompter);
    context.run()
}
