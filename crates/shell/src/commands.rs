//! Line parsing for the interactive shell.

use thiserror::Error;

/// One shell command. Positions are 1-based, relative to the visible page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Page(usize),
    Next,
    Prev,
    Save(usize),
    More(usize),
    Owned,
    Stats,
    Help,
    Quit,
    /// Blank line.
    Nothing,
}

impl Command {
    /// Name used for metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Search(_) => "search",
            Command::Page(_) => "page",
            Command::Next => "next",
            Command::Prev => "prev",
            Command::Save(_) => "save",
            Command::More(_) => "more",
            Command::Owned => "owned",
            Command::Stats => "stats",
            Command::Help => "help",
            Command::Quit => "quit",
            Command::Nothing => "nothing",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("'{command}' needs a number, got '{value}'")]
    BadNumber { command: &'static str, value: String },

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
}

pub const HELP: &str = "\
Commands:
  search <text>   search the catalog
  page <n>        show page n
  next | prev     move between pages
  save <n>        save card n of this page to your collection
  more <n>        show or hide the description of card n
  owned           list your collection
  stats           print metrics
  help            show this list
  quit            end the session";

/// Parse one input line.
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Ok(Command::Nothing),
        "search" | "s" => {
            if rest.is_empty() {
                Err(ParseError::MissingArgument("search"))
            } else {
                Ok(Command::Search(rest.to_string()))
            }
        }
        "page" => number("page", rest).map(Command::Page),
        "next" | "n" => Ok(Command::Next),
        "prev" | "p" => Ok(Command::Prev),
        "save" => number("save", rest).map(Command::Save),
        "more" => number("more", rest).map(Command::More),
        "owned" => Ok(Command::Owned),
        "stats" => Ok(Command::Stats),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

fn number(command: &'static str, value: &str) -> Result<usize, ParseError> {
    if value.is_empty() {
        return Err(ParseError::MissingArgument(command));
    }
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::BadNumber {
            command,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_keeps_text() {
        assert_eq!(
            parse("search  the left hand of darkness "),
            Ok(Command::Search("the left hand of darkness".to_string()))
        );
    }

    #[test]
    fn test_parse_numbered_commands() {
        assert_eq!(parse("save 3"), Ok(Command::Save(3)));
        assert_eq!(parse("MORE 1"), Ok(Command::More(1)));
        assert_eq!(parse("page 2"), Ok(Command::Page(2)));
    }

    #[test]
    fn test_parse_rejects_bad_numbers() {
        assert_eq!(
            parse("save zero"),
            Err(ParseError::BadNumber {
                command: "save",
                value: "zero".to_string()
            })
        );
        assert!(matches!(parse("save 0"), Err(ParseError::BadNumber { .. })));
        assert_eq!(parse("more"), Err(ParseError::MissingArgument("more")));
    }

    #[test]
    fn test_parse_plain_commands() {
        assert_eq!(parse(""), Ok(Command::Nothing));
        assert_eq!(parse("next"), Ok(Command::Next));
        assert_eq!(parse("quit"), Ok(Command::Quit));
        assert_eq!(parse("search"), Err(ParseError::MissingArgument("search")));
        assert_eq!(
            parse("delete 1"),
            Err(ParseError::Unknown("delete".to_string()))
        );
    }
}
