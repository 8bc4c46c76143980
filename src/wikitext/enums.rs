//! Enums used by the wikitext parser.
//!
//! - `ListType` - which list marker started a line, and the element it becomes.

use std::fmt;
use std::str::FromStr;

/// The kind of list line in wikitext.
///
/// Common tokens:
/// - `*` unordered
/// - `#` ordered (numbered)
/// - `;` definition term
/// - `:` indented / definition description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Unordered,
    Ordered,
    Term,
    Description,
}

impl ListType {
    /// Element tag the line is turned into.
    pub fn tag(&self) -> &'static str {
        match self {
            ListType::Unordered | ListType::Ordered => "li",
            ListType::Term => "dt",
            ListType::Description => "dd",
        }
    }

    /// List type of the innermost marker in a run like `**#`.
    pub fn from_markers(markers: &str) -> Option<Self> {
        markers.chars().last().and_then(Self::from_marker)
    }

    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            '*' => Some(ListType::Unordered),
            '#' => Some(ListType::Ordered),
            ';' => Some(ListType::Term),
            ':' => Some(ListType::Description),
            _ => None,
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListType::Unordered => write!(f, "Unordered"),
            ListType::Ordered => write!(f, "Ordered"),
            ListType::Term => write!(f, "Term"),
            ListType::Description => write!(f, "Description"),
        }
    }
}

impl FromStr for ListType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "*" | "unordered" | "bullet" => Ok(ListType::Unordered),
            "#" | "ordered" | "numbered" => Ok(ListType::Ordered),
            ";" | "term" => Ok(ListType::Term),
            ":" | "description" | "indent" => Ok(ListType::Description),
            other => Err(format!("unknown ListType '{}'", other)),
        }
    }
}
