use crate::cli::output;

/// Actions offered by the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Balance,
    MonthlyReport,
    Visualize,
    Export,
    Edit,
    Delete,
    Quit,
}

pub struct MenuEntry {
    pub key: &'static str,
    pub command: Command,
    pub label: &'static str,
}

pub const MAIN_MENU: &[MenuEntry] = &[
    MenuEntry { key: "1", command: Command::Add, label: "Add a record" },
    MenuEntry { key: "2", command: Command::Balance, label: "Show balance" },
    MenuEntry { key: "3", command: Command::MonthlyReport, label: "Monthly report" },
    MenuEntry { key: "4", command: Command::Visualize, label: "Spending by category" },
    MenuEntry { key: "5", command: Command::Export, label: "Export to CSV" },
    MenuEntry { key: "6", command: Command::Edit, label: "Edit a record" },
    MenuEntry { key: "7", command: Command::Delete, label: "Delete a record" },
    MenuEntry { key: "8", command: Command::Quit, label: "Quit" },
];

impl Command {
    pub fn from_choice(choice: &str) -> Option<Command> {
        let choice = choice.trim();
        MAIN_MENU
            .iter()
            .find(|entry| entry.key == choice)
            .map(|entry| entry.command)
    }
}

pub fn print_main_menu() {
    output::section("Personal finance tracker");
    for entry in MAIN_MENU {
        output::info(format!("{}. {}", entry.key, entry.label));
    }
}
