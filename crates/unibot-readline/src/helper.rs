use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::command::{COMMANDS, FILTER_KEYWORDS};

/// rustyline helper for the chat prompt.
///
/// Completes slash commands and their arguments: `/suggest ` offers the
/// numbered quick questions, `/filter ` the quick-filter keywords. Hints
/// show the expected argument once a command is typed.
#[derive(Clone)]
pub struct CliHelper {
    suggestions: Vec<String>,
}

impl CliHelper {
    pub fn new(suggestions: &[String]) -> Self {
        Self {
            suggestions: suggestions.to_vec(),
        }
    }

    fn command_candidates(&self, prefix: &str) -> Vec<Pair> {
        COMMANDS
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, usage)| Pair {
                display: format!("{name} {usage}").trim_end().to_string(),
                replacement: if usage.is_empty() {
                    name.to_string()
                } else {
                    format!("{name} ")
                },
            })
            .collect()
    }

    fn argument_candidates(&self, command: &str, prefix: &str) -> Vec<Pair> {
        match command {
            "/suggest" => self
                .suggestions
                .iter()
                .enumerate()
                .map(|(i, text)| ((i + 1).to_string(), text))
                .filter(|(n, _)| n.starts_with(prefix))
                .map(|(n, text)| Pair {
                    display: format!("{n}  {text}"),
                    replacement: n,
                })
                .collect(),
            "/filter" => FILTER_KEYWORDS
                .iter()
                .filter(|keyword| keyword.starts_with(&prefix.to_lowercase()))
                .map(|keyword| Pair {
                    display: keyword.to_string(),
                    replacement: keyword.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Text shown after the cursor for a partially typed line.
    fn hint_for(&self, line: &str) -> Option<String> {
        let rest = line.strip_prefix('/')?;
        match rest.split_once(' ') {
            None => COMMANDS
                .iter()
                .find(|(name, _)| name.starts_with(line) && name.len() > line.len())
                .map(|(name, _)| name[line.len()..].to_string()),
            Some((name, "")) => {
                let command = format!("/{name}");
                let (_, usage) = COMMANDS.iter().find(|(name, _)| *name == command)?;
                match command.as_str() {
                    "/suggest" if !self.suggestions.is_empty() => {
                        Some(format!("1-{}", self.suggestions.len()))
                    }
                    _ if usage.is_empty() => None,
                    _ => Some(usage.to_string()),
                }
            }
            Some(_) => None,
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        match line.split_once(' ') {
            None => Ok((0, self.command_candidates(line))),
            Some((command, arg)) => {
                let start = command.len() + 1;
                Ok((start, self.argument_candidates(command, arg.trim_start())))
            }
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.hint_for(line)
    }
}

impl Validator for CliHelper {}
