//! Read one section of a MediaWiki page as a bullet list.
//!
//! page title -> page id -> latest revision id -> raw markup -> document tree
//! -> section lines. Every step is a blocking call and the first failure is
//! returned, tagged with the step it came from.

pub mod definitions;
pub mod document;
pub mod errors;
pub mod pipeline;
pub mod reqwest_client;
pub mod section;
pub mod wiki_api;
pub mod wikitext;

pub use document::{DocumentNode, NodeKind};
pub use errors::{BridgeError, Stage, WikiError};
pub use pipeline::{get_page_text, get_section_text, get_section_text_with, get_text};
pub use reqwest_client::{ClientConfig, ClientConfigBuilder, RustClient, Transport};
pub use section::{Section, SectionExtractor, extract_section};
pub use wikitext::{MarkupParser, WikitextParser};
