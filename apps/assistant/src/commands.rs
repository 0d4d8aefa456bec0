//! Terminal commands typed by the user, and their translation into workflow actions.

use client_core::Action;
use shared::domain::SearchResultItem;

pub const HELP: &str = "\
commands:
  type <text>   edit the search box (searches after a pause once 3+ characters)
  select <n>    pick the n-th NAMASTE result and translate it
  generate      build the FHIR record for the selected term
  submit        send the generated record to the server
  help          show this list
  quit          exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Type(String),
    Select(usize),
    Generate,
    Submit,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (verb, rest) = match line.trim_start().split_once(' ') {
        Some((verb, rest)) => (verb, rest),
        None => (line.trim(), ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "type" | "t" => Ok(Command::Type(rest.to_string())),
        "select" | "s" => {
            let index = rest
                .trim()
                .parse::<usize>()
                .map_err(|_| format!("expected a result number, got '{}'", rest.trim()))?;
            if index == 0 {
                return Err("result numbers start at 1".to_string());
            }
            Ok(Command::Select(index))
        }
        "generate" | "g" => Ok(Command::Generate),
        "submit" => Ok(Command::Submit),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "" => Err("empty command; type 'help'".to_string()),
        other => Err(format!("unknown command '{other}'; type 'help'")),
    }
}

/// Maps a command onto a workflow action. `Help` and `Quit` never reach the workflow.
pub fn to_action(command: Command, displayed: &[SearchResultItem]) -> Result<Option<Action>, String> {
    match command {
        Command::Type(text) => Ok(Some(Action::QueryChanged(text))),
        Command::Select(index) => displayed
            .get(index - 1)
            .cloned()
            .map(|item| Some(Action::Select(item)))
            .ok_or_else(|| format!("no NAMASTE result #{index} is displayed")),
        Command::Generate => Ok(Some(Action::Generate)),
        Command::Submit => Ok(Some(Action::Submit)),
        Command::Help | Command::Quit => Ok(None),
    }
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
