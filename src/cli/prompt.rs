use std::{
    borrow::Cow,
    io::{self, BufRead, Write},
};

use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Context as ReadlineContext, Editor, Helper,
};

use crate::cli::core::CliError;
use crate::ledger::{parse_date, Kind};

/// What a prompt is asking for; drives completion and inline validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Text,
    Amount,
    Date,
    Kind,
}

/// Source of user answers for the menu shell.
///
/// `None` means the input ended (EOF or interrupt) and the current command
/// should be abandoned.
pub trait Prompter {
    fn read_line(&mut self, prompt: &str, field: Field) -> Result<Option<String>, CliError>;

    fn confirm(&mut self, prompt: &str) -> Result<Option<bool>, CliError>;
}

/// Parses a user supplied amount. Surrounding whitespace is ignored and
/// non-finite values are rejected.
pub fn parse_amount(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Answers read line by line from any buffered reader. Used when stdin is
/// not a terminal.
pub struct ScriptPrompter<R> {
    reader: R,
    echo_prompts: bool,
}

impl<R: BufRead> ScriptPrompter<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            echo_prompts: true,
        }
    }

    pub fn quiet(reader: R) -> Self {
        Self {
            reader,
            echo_prompts: false,
        }
    }

    fn next_line(&mut self, prompt: &str) -> Result<Option<String>, CliError> {
        if self.echo_prompts {
            let mut stdout = io::stdout().lock();
            write!(stdout, "{prompt}")?;
            stdout.flush()?;
        }
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            if self.echo_prompts {
                println!();
            }
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).to_string();
        if self.echo_prompts {
            println!("{trimmed}");
        }
        Ok(Some(trimmed))
    }
}

impl<R: BufRead> Prompter for ScriptPrompter<R> {
    fn read_line(&mut self, prompt: &str, _field: Field) -> Result<Option<String>, CliError> {
        self.next_line(prompt)
    }

    fn confirm(&mut self, prompt: &str) -> Result<Option<bool>, CliError> {
        let answer = self.next_line(&format!("{prompt} [y/N] "))?;
        Ok(answer.map(|text| matches!(text.trim().to_lowercase().as_str(), "y" | "yes")))
    }
}

/// Line editor backed prompter with kind completion and inline checks for
/// amounts and dates.
pub struct TerminalPrompter {
    editor: Editor<FieldHelper, DefaultHistory>,
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Result<Self, CliError> {
        let mut editor = Editor::<FieldHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(FieldHelper::default()));
        Ok(Self {
            editor,
            theme: ColorfulTheme::default(),
        })
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str, field: Field) -> Result<Option<String>, CliError> {
        if let Some(helper) = self.editor.helper_mut() {
            helper.field = field;
        }
        match self.editor.readline(prompt) {
            Ok(line) => {
                if field == Field::Text && !line.trim().is_empty() {
                    self.editor.add_history_entry(line.trim()).ok();
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<Option<bool>, CliError> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact_opt()
            .map_err(CliError::from)
    }
}

#[derive(Default)]
struct FieldHelper {
    field: Field,
}

impl Helper for FieldHelper {}

impl Completer for FieldHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if self.field != Field::Kind {
            return Ok((pos, Vec::new()));
        }
        Ok((0, kind_candidates(&line[..pos])))
    }
}

fn kind_candidates(prefix: &str) -> Vec<Pair> {
    let needle = prefix.trim_start().to_lowercase();
    [Kind::Income, Kind::Expense]
        .iter()
        .map(Kind::as_str)
        .filter(|name| name.starts_with(&needle))
        .map(|name| Pair {
            display: name.to_string(),
            replacement: name.to_string(),
        })
        .collect()
}

impl Hinter for FieldHelper {
    type Hint = String;
}

impl Highlighter for FieldHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for FieldHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(validate_field(self.field, ctx.input()))
    }
}

fn validate_field(field: Field, input: &str) -> ValidationResult {
    match field {
        Field::Amount if parse_amount(input).is_none() => ValidationResult::Invalid(Some(
            "  <- enter a number, e.g. 100 or 50.5".to_string(),
        )),
        Field::Date if parse_date(input.trim()).is_err() => ValidationResult::Invalid(Some(
            "  <- use YYYY-MM-DD, e.g. 2023-12-31".to_string(),
        )),
        _ => ValidationResult::Valid(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn script_prompter_reads_lines_until_eof() {
        let mut prompter = ScriptPrompter::quiet(Cursor::new("first\r\nsecond\n"));
        assert_eq!(
            prompter.read_line("> ", Field::Text).unwrap().as_deref(),
            Some("first")
        );
        assert_eq!(
            prompter.read_line("> ", Field::Text).unwrap().as_deref(),
            Some("second")
        );
        assert_eq!(prompter.read_line("> ", Field::Text).unwrap(), None);
    }

    #[test]
    fn script_confirm_accepts_yes_only() {
        let mut prompter = ScriptPrompter::quiet(Cursor::new("Y\nno\n\nyes\n"));
        assert_eq!(prompter.confirm("?").unwrap(), Some(true));
        assert_eq!(prompter.confirm("?").unwrap(), Some(false));
        assert_eq!(prompter.confirm("?").unwrap(), Some(false));
        assert_eq!(prompter.confirm("?").unwrap(), Some(true));
        assert_eq!(prompter.confirm("?").unwrap(), None);
    }

    #[test]
    fn amounts_must_be_finite_numbers() {
        assert_eq!(parse_amount(" 50.5 "), Some(50.5));
        assert_eq!(parse_amount("-3"), Some(-3.0));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn kind_completion_ignores_case() {
        let names: Vec<String> = kind_candidates("IN").into_iter().map(|p| p.replacement).collect();
        assert_eq!(names, vec!["income".to_string()]);
        assert_eq!(kind_candidates("").len(), 2);
        assert!(kind_candidates("x").is_empty());
    }

    #[test]
    fn validator_flags_bad_amounts_and_dates() {
        assert!(matches!(
            validate_field(Field::Amount, "12a"),
            ValidationResult::Invalid(_)
        ));
        assert!(matches!(
            validate_field(Field::Date, "2023-02-30"),
            ValidationResult::Invalid(_)
        ));
        assert!(matches!(
            validate_field(Field::Date, "2024-02-29"),
            ValidationResult::Valid(_)
        ));
        assert!(matches!(
            validate_field(Field::Text, ""),
            ValidationResult::Valid(_)
        ));
    }
}
