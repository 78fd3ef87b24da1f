pub mod chart;
mod commands;
pub mod core;
pub mod menu;
pub mod output;
pub mod prompt;
mod shell;

pub use self::core::{CliError, LoopControl, ShellContext};
pub use shell::{run_cli, CliMode};
