use spicewatch_core::StatusFilter;

/// A line typed on stdin while the view is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Retry,
    Filter(StatusFilter),
    Cancel(String),
    Refresh(String),
    Help,
    Quit,
}

pub const HELP: &str =
    "commands: retry | filter <all|active|completed|failed|cancelled> | cancel <job id> | refresh <url> | quit";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Err("empty command".to_string());
    };
    let argument = parts.next();
    if parts.next().is_some() {
        return Err(format!("too many arguments for '{verb}'"));
    }

    match (verb.to_ascii_lowercase().as_str(), argument) {
        ("retry" | "r", None) => Ok(Command::Retry),
        ("filter" | "f", Some(name)) => StatusFilter::parse(name)
            .map(Command::Filter)
            .ok_or_else(|| format!("unknown filter '{name}'")),
        ("cancel" | "c", Some(id)) => Ok(Command::Cancel(id.to_string())),
        ("refresh" | "invalidate", Some(url)) => Ok(Command::Refresh(url.to_string())),
        ("help" | "?", None) => Ok(Command::Help),
        ("quit" | "q" | "exit", None) => Ok(Command::Quit),
        ("filter" | "f" | "cancel" | "c" | "refresh" | "invalidate", None) => {
            Err(format!("'{verb}' needs an argument"))
        }
        _ => Err(format!("unknown command '{verb}'")),
    }
}
