use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, RwLock};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OutputPreferences {
    /// Drops colours and icons in favour of textual labels.
    pub plain_mode: bool,
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
}

pub fn current_preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

pub fn format_message(
    kind: MessageKind,
    message: impl fmt::Display,
    prefs: &OutputPreferences,
) -> String {
    let text = message.to_string();
    let (icon, label) = match kind {
        MessageKind::Success => ("✔", "OK:"),
        MessageKind::Warning => ("⚠", "WARNING:"),
        MessageKind::Error => ("✖", "ERROR:"),
        MessageKind::Section => return colorize(format!("=== {} ===", text.trim()), kind, prefs),
        MessageKind::Info => return text,
    };
    if prefs.plain_mode {
        format!("{label} {text}")
    } else {
        colorize(format!("{icon} {text}"), kind, prefs)
    }
}

fn colorize(text: String, kind: MessageKind, prefs: &OutputPreferences) -> String {
    if prefs.plain_mode {
        return text;
    }
    match kind {
        MessageKind::Success => text.green().to_string(),
        MessageKind::Warning => text.yellow().to_string(),
        MessageKind::Error => text.red().to_string(),
        MessageKind::Section => text.bold().to_string(),
        MessageKind::Info => text,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = format_message(kind, message, &current_preferences());
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}
