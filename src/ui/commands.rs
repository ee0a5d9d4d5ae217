//! Line commands understood by the terminal UI.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(String),
    /// Smart Assign
    Auto,
    Book,
    Release,
    /// Empty text clears the search
    Search(String),
    Date(String),
    Time(String),
    Login,
    Cookie(String),
    Logout,
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
}

pub const HELP: &str = "\
commands:
  select <id>     select a seat
  auto            Smart Assign a random free seat
  book            reserve the selected seat
  release         check out of the selected seat
  search [text]   highlight occupants matching text (no text clears)
  date <text>     set the booking date
  time <text>     set the booking time slot
  login           check the session again
  cookie <value>  use a session cookie from a browser sign-in
  logout          stop syncing and return to the sign-in screen
  refresh         poll seats now
  help            show this help
  quit            exit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let required = |name: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument(name))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "select" | "s" => required("select").map(Self::Select),
            "auto" | "assign" => Ok(Self::Auto),
            "book" => Ok(Self::Book),
            "release" | "checkout" => Ok(Self::Release),
            "search" | "/" => Ok(Self::Search(rest.to_string())),
            "date" => required("date").map(Self::Date),
            "time" => required("time").map(Self::Time),
            "login" => Ok(Self::Login),
            "cookie" => required("cookie").map(Self::Cookie),
            "logout" => Ok(Self::Logout),
            "refresh" | "r" => Ok(Self::Refresh),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
