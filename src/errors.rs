//! Error types for the page lookup and section extraction pipeline.
//!
//! - `WikiError` - every failure kind a stage can report.
//! - `Stage` - which step of the pipeline produced the error.
//! - `BridgeError` - a `WikiError` tagged with its `Stage`, returned by the
//!   top level operations.
//!
//! Errors are never retried or translated; the first one encountered is
//! handed back to the caller as-is.

use std::error::Error;
use std::fmt;

/// Result alias used by the individual stages.
pub type Result<T> = std::result::Result<T, WikiError>;

/// Boxed cause carried by the transport/decode variants.
pub type Cause = Box<dyn Error + Send + Sync + 'static>;

#[derive(Debug)]
pub enum WikiError {
    /// Connection, DNS or timeout failure.
    Transport { msg: String, source: Option<Cause> },
    /// The server answered with a non 2xx status.
    Remote { status: u16 },
    /// Response body was not JSON, or lacked the fields we need.
    Decode { msg: String, source: Option<Cause> },
    /// No page matches the requested title.
    NotFound { title: String },
    /// The page exists but reported no revisions.
    NoRevisions { page_id: i64 },
    /// The revision id is unknown to the server.
    RevisionMissing { revision_id: i64 },
    /// The revision exists but has no `main` slot.
    SlotMissing { revision_id: i64 },
    /// The markup could not be turned into a document tree.
    Parse { msg: String, offset: Option<usize> },
    /// No heading contains the requested section title.
    SectionNotFound { title: String },
    /// Caller supplied something unusable (e.g. an empty title).
    InvalidArgument { msg: String },
    /// The base URL could not be turned into an API URL.
    InvalidUrl { msg: String, source: Option<Cause> },
}

impl WikiError {
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        WikiError::Transport {
            msg: msg.into(),
            source: None,
        }
    }

    pub fn decode<S: Into<String>>(msg: S) -> Self {
        WikiError::Decode {
            msg: msg.into(),
            source: None,
        }
    }

    pub fn parse<S: Into<String>>(msg: S) -> Self {
        WikiError::Parse {
            msg: msg.into(),
            offset: None,
        }
    }

    /// Parse error with the byte offset where the problem was detected.
    pub fn parse_at<S: Into<String>>(msg: S, offset: usize) -> Self {
        WikiError::Parse {
            msg: msg.into(),
            offset: Some(offset),
        }
    }

    pub fn invalid_arg<S: Into<String>>(msg: S) -> Self {
        WikiError::InvalidArgument { msg: msg.into() }
    }

    /// Short name of the error kind, handy for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            WikiError::Transport { .. } => "TransportError",
            WikiError::Remote { .. } => "RemoteError",
            WikiError::Decode { .. } => "DecodeError",
            WikiError::NotFound { .. } => "NotFoundError",
            WikiError::NoRevisions { .. } => "NoRevisionsError",
            WikiError::RevisionMissing { .. } => "RevisionMissingError",
            WikiError::SlotMissing { .. } => "SlotMissingError",
            WikiError::Parse { .. } => "ParseError",
            WikiError::SectionNotFound { .. } => "SectionNotFoundError",
            WikiError::InvalidArgument { .. } => "InvalidArgument",
            WikiError::InvalidUrl { .. } => "InvalidUrl",
        }
    }
}

impl fmt::Display for WikiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WikiError::Transport { msg, source } => match source {
                Some(s) => write!(f, "Transport error: {} (cause: {})", msg, s),
                None => write!(f, "Transport error: {}", msg),
            },
            WikiError::Remote { status } => write!(f, "Query failed with status {}", status),
            WikiError::Decode { msg, source } => match source {
                Some(s) => write!(f, "Decode error: {} (cause: {})", msg, s),
                None => write!(f, "Decode error: {}", msg),
            },
            WikiError::NotFound { title } => write!(f, "Page not found: {:?}", title),
            WikiError::NoRevisions { page_id } => {
                write!(f, "No revisions found for page {}", page_id)
            }
            WikiError::RevisionMissing { revision_id } => {
                write!(f, "Revision {} not found", revision_id)
            }
            WikiError::SlotMissing { revision_id } => {
                write!(f, "Revision {} has no main slot", revision_id)
            }
            WikiError::Parse { msg, offset } => match offset {
                Some(off) => write!(f, "Parse error at {}: {}", off, msg),
                None => write!(f, "Parse error: {}", msg),
            },
            WikiError::SectionNotFound { title } => {
                write!(f, "Failed to find section {:?}", title)
            }
            WikiError::InvalidArgument { msg } => write!(f, "Invalid argument: {}", msg),
            WikiError::InvalidUrl { msg, source } => match source {
                Some(s) => write!(f, "Invalid url: {} (cause: {})", msg, s),
                None => write!(f, "Invalid url: {}", msg),
            },
        }
    }
}

impl Error for WikiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WikiError::Transport { source, .. }
            | WikiError::Decode { source, .. }
            | WikiError::InvalidUrl { source, .. } => {
                source.as_ref().map(|b| b.as_ref() as &dyn Error)
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WikiError {
    fn from(e: reqwest::Error) -> Self {
        let msg = if e.is_timeout() {
            "request timed out"
        } else if e.is_connect() {
            "failed to connect"
        } else if e.is_decode() || e.is_body() {
            "failed to read response body"
        } else {
            "request failed"
        };
        WikiError::Transport {
            msg: msg.to_string(),
            source: Some(Box::new(e)),
        }
    }
}

impl From<serde_json::Error> for WikiError {
    fn from(e: serde_json::Error) -> Self {
        WikiError::Decode {
            msg: "malformed query response".to_string(),
            source: Some(Box::new(e)),
        }
    }
}

impl From<url::ParseError> for WikiError {
    fn from(e: url::ParseError) -> Self {
        WikiError::InvalidUrl {
            msg: "cannot build api url".to_string(),
            source: Some(Box::new(e)),
        }
    }
}

/// The pipeline step an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PageLookup,
    RevisionLookup,
    ContentFetch,
    Parse,
    Extract,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::PageLookup => write!(f, "page lookup"),
            Stage::RevisionLookup => write!(f, "revision lookup"),
            Stage::ContentFetch => write!(f, "content fetch"),
            Stage::Parse => write!(f, "parse"),
            Stage::Extract => write!(f, "extract"),
        }
    }
}

/// A stage failure as seen by the caller of the pipeline.
#[derive(Debug)]
pub struct BridgeError {
    pub stage: Stage,
    pub error: WikiError,
}

impl BridgeError {
    pub fn new(stage: Stage, error: WikiError) -> Self {
        Self { stage, error }
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.error)
    }
}

impl Error for BridgeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// Attach a stage to a stage-level result.
pub trait AtStage<T> {
    fn at(self, stage: Stage) -> std::result::Result<T, BridgeError>;
}

impl<T> AtStage<T> for Result<T> {
    fn at(self, stage: Stage) -> std::result::Result<T, BridgeError> {
        self.map_err(|error| BridgeError::new(stage, error))
    }
}
