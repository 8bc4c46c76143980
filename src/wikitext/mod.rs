//! Wikitext module root
//!
//! Declares the submodules of the bundled markup parser and re-exports the
//! items callers need:
//! - `MarkupParser` - the seam any parser plugs into.
//! - `WikitextParser` - the default line based MediaWiki parser.
//! - `Node` / `Tree` - the arena tree it produces.

pub mod enums;
pub mod inline;
pub mod parser;
pub mod tree;

pub use enums::ListType;
pub use parser::{MarkupParser, ROOT_TAG, WikitextParser};
pub use tree::{Node, Tree};
