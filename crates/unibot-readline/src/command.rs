use std::path::PathBuf;

use unibot_application::FilterCommand;

/// Slash commands offered for completion, with the argument hint shown
/// after a trailing space (empty when the command takes none).
pub const COMMANDS: [(&str, &str); 12] = [
    ("/suggest", "[número]"),
    ("/filter", "<texto | pagados | pendientes | todos>"),
    ("/paid", ""),
    ("/pending", ""),
    ("/all", ""),
    ("/todos", ""),
    ("/action", "<número>"),
    ("/history", ""),
    ("/clear", ""),
    ("/export", "<archivo.html>"),
    ("/help", ""),
    ("/quit", ""),
];

/// Keywords `/filter` turns into quick filters.
pub const FILTER_KEYWORDS: [&str; 3] = ["pagados", "pendientes", "todos"];

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text sent to the chatbot.
    Message(String),
    /// `/suggest` lists the quick questions; `/suggest N` sends one.
    Suggest(Option<usize>),
    Filter(FilterCommand),
    AllStudents,
    /// Runs the N-th action (1-based) of the latest view offering actions.
    Action(usize),
    History,
    Clear,
    Export(PathBuf),
    Help,
    Quit,
    /// Unknown or malformed command, with a hint for the user.
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line == "quit" || line == "exit" {
            return Self::Quit;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Message(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "suggest" if arg.is_empty() => Self::Suggest(None),
            "suggest" => parse_index(arg, "/suggest <número>").map_or_else(Self::Invalid, |n| {
                Self::Suggest(Some(n))
            }),
            "filter" => filter(arg),
            "paid" | "pagados" | "pending" | "pendientes" | "all" => filter(name),
            "todos" => Self::AllStudents,
            "action" => parse_index(arg, "/action <número>").map_or_else(Self::Invalid, Self::Action),
            "history" => Self::History,
            "clear" => Self::Clear,
            "export" if arg.is_empty() => Self::Invalid("Uso: /export <archivo.html>".to_string()),
            "export" => Self::Export(PathBuf::from(arg)),
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => Self::Invalid(format!("Comando desconocido: /{other}")),
        }
    }
}

/// `/filter pagados` and `/paid` both end up as the quick filter.
fn filter(arg: &str) -> Command {
    let Ok(filter) = arg.parse::<FilterCommand>();
    Command::Filter(filter)
}

fn parse_index(arg: &str, usage: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Uso: {usage}")),
    }
}
