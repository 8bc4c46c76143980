use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, de::IgnoredAny};
use std::collections::BTreeMap;

use crate::errors::{Result, WikiError};

/// Envelope of every `action=query` response.
#[derive(Debug, Deserialize, Default)]
pub struct QueryResponse {
    #[serde(default)]
    pub query: Option<Query>,
    /// Present instead of `query` when the api rejects the request.
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub info: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct Query {
    /// Pages keyed by id. Iteration order means nothing to the server.
    #[serde(default)]
    pub pages: BTreeMap<i64, Page>,
    /// Revision ids the server did not recognise.
    #[serde(default)]
    pub badrevids: BTreeMap<i64, IgnoredAny>,
}

#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(rename = "pageid", default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub ns: i64,
    #[serde(default)]
    pub title: String,
    /// Set by the server when the title does not exist.
    #[serde(default)]
    pub missing: Option<IgnoredAny>,
    #[serde(default)]
    pub revisions: Vec<Revision>,
}

#[derive(Debug, Deserialize)]
pub struct Revision {
    // Content queries only ask for `content`, so every metadata field is optional.
    #[serde(rename = "revid", default)]
    pub id: Option<i64>,
    #[serde(rename = "parentid", default)]
    pub parent_id: Option<i64>,
    #[serde(rename = "user", default)]
    pub author: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub slots: BTreeMap<String, Content>,
}

/// Raw serialized markup of one slot.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Content {
    #[serde(rename = "contentmodel", default)]
    pub model: String,
    #[serde(rename = "contentformat", default)]
    pub format: String,
    #[serde(rename = "*", default)]
    pub text: String,
}

/// Name of the slot holding the canonical page body.
pub const MAIN_SLOT: &str = "main";

impl QueryResponse {
    /// Unwrap the `query` block, turning api level errors into decode errors.
    pub fn into_query(self) -> Result<Query> {
        if let Some(err) = self.error {
            return Err(WikiError::decode(format!(
                "api error {}: {}",
                err.code, err.info
            )));
        }
        self.query
            .ok_or_else(|| WikiError::decode("response has no query block"))
    }
}

impl Query {
    /// First-or-error access to the page map.
    ///
    /// # Returns
    /// - Ok(None) -> no pages at all
    /// - Ok(Some) -> exactly one page
    /// - Err(Decode) -> more than one page, we can't tell which one was meant.
    pub fn single_page(&self) -> Result<Option<&Page>> {
        self.pages.values().at_most_one().map_err(|extra| {
            WikiError::decode(format!(
                "expected a single page in response, got {}",
                extra.count()
            ))
        })
    }
}

impl Page {
    pub fn is_missing(&self) -> bool {
        self.missing.is_some() || self.id.is_none_or(|id| id <= 0)
    }

    /// The first listed revision. The server returns newest first.
    pub fn latest_revision(&self) -> Option<&Revision> {
        self.revisions.first()
    }
}

impl Revision {
    pub fn main_slot(&self) -> Option<&Content> {
        self.slots.get(MAIN_SLOT)
    }
}
