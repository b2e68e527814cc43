use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SopTreeError;

/// Represents all user commands the view understands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Quit,
    Redraw,

    // Selection movement
    Up,
    Down,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    Select(String),

    // Expand / collapse
    Toggle,
    Expand,
    Collapse,
    Activate(String),
    Click { row: u16 },

    // Multi-step commands for testing
    Sequence(Vec<Command>),
}

impl Command {
    /// Parse a command from a string representation
    pub fn from_string(s: &str) -> Result<Self, SopTreeError> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "quit" | "q" => return Ok(Command::Quit),
            "redraw" => return Ok(Command::Redraw),
            "up" => return Ok(Command::Up),
            "down" => return Ok(Command::Down),
            "page_up" => return Ok(Command::PageUp),
            "page_down" => return Ok(Command::PageDown),
            "goto_top" | "home" => return Ok(Command::GoToTop),
            "goto_bottom" | "end" => return Ok(Command::GoToBottom),
            "toggle" | "enter" | "space" => return Ok(Command::Toggle),
            "expand" | "right" => return Ok(Command::Expand),
            "collapse" | "left" => return Ok(Command::Collapse),
            _ => {}
        }

        // Ids are case sensitive, so these look at the raw string
        if let Some(id) = s.strip_prefix("activate:") {
            if !id.is_empty() {
                return Ok(Command::Activate(id.to_string()));
            }
        }
        if let Some(id) = s.strip_prefix("select:") {
            if !id.is_empty() {
                return Ok(Command::Select(id.to_string()));
            }
        }
        if let Some(row) = s.strip_prefix("click:") {
            if let Ok(row) = row.parse::<u16>() {
                return Ok(Command::Click { row });
            }
        }
        if let Some(inner) = s
            .strip_prefix("sequence:[")
            .and_then(|rest| rest.strip_suffix(']'))
        {
            if inner.trim().is_empty() {
                return Ok(Command::Sequence(Vec::new()));
            }
            let commands = split_top_level(inner)
                .into_iter()
                .map(|part| {
                    Command::from_string(part).map_err(|e| {
                        SopTreeError::Command(format!("in sequence '{}': {}", part.trim(), e))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Command::Sequence(commands));
        }

        Err(SopTreeError::Command(s.to_string()))
    }
}

/// Split a sequence body on the commas that are not inside a nested `[..]`.
/// Ids used inside a sequence therefore cannot contain `,`, `[` or `]`.
fn split_top_level(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in inner.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&inner[start..]);
    parts
}

impl FromStr for Command {
    type Err = SopTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::from_string(s)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Quit => write!(f, "quit"),
            Command::Redraw => write!(f, "redraw"),
            Command::Up => write!(f, "up"),
            Command::Down => write!(f, "down"),
            Command::PageUp => write!(f, "page_up"),
            Command::PageDown => write!(f, "page_down"),
            Command::GoToTop => write!(f, "goto_top"),
            Command::GoToBottom => write!(f, "goto_bottom"),
            Command::Select(id) => write!(f, "select:{}", id),
            Command::Toggle => write!(f, "toggle"),
            Command::Expand => write!(f, "expand"),
            Command::Collapse => write!(f, "collapse"),
            Command::Activate(id) => write!(f, "activate:{}", id),
            Command::Click { row } => write!(f, "click:{}", row),
            Command::Sequence(commands) => write!(
                f,
                "sequence:[{}]",
                commands
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            ),
        }
    }
}
