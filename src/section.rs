use std::fmt;

use crate::{
    document::{DocumentNode, NodeKind},
    errors::{Result, WikiError},
};

/// Prefix put in front of every extracted line.
pub const BULLET: &str = "* ";

/// Heading tags matched when nothing else is configured.
pub const DEFAULT_HEADING: &str = "h2";

const ALL_HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// The content found under one heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Tag of the matched heading, also the tag that ends the section.
    pub heading_tag: String,
    /// Rendered text of the matched heading.
    pub title: String,
    /// Bullet prefixed lines in document order.
    pub lines: Vec<String>,
}

impl Section {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// One bullet per line.
    pub fn to_bullet_list(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_bullet_list())
    }
}

/// Finds a heading by title and collects what follows it.
///
/// Matching is a case sensitive substring test on the heading's rendered
/// text; the first heading in document order wins. Collection stops at the
/// next sibling element carrying the same tag as the matched heading, or at
/// the end of the sibling chain. Headings with a different tag are content.
#[derive(Debug, Clone)]
pub struct SectionExtractor {
    heading_tags: Vec<String>,
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self {
            heading_tags: vec![DEFAULT_HEADING.to_string()],
        }
    }
}

impl SectionExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match headings of every level (`h1` to `h6`).
    pub fn any_heading(self) -> Self {
        self.heading_tags(&ALL_HEADINGS)
    }

    /// Match only headings with one of these tags.
    pub fn heading_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.heading_tags = tags.iter().map(|t| t.as_ref().to_string()).collect();
        self
    }

    fn is_heading<N: DocumentNode>(&self, node: &N) -> bool {
        node.kind() == NodeKind::Element
            && node
                .tag()
                .is_some_and(|tag| self.heading_tags.iter().any(|h| h == tag))
    }

    /// Locate the section titled `title` below `root`.
    ///
    /// # Returns
    /// - Ok(Section) -> possibly with no lines, when nothing follows the heading.
    /// - Err(WikiError::SectionNotFound) -> no heading contains `title`.
    pub fn extract<N: DocumentNode>(&self, root: &N, title: &str) -> Result<Section> {
        if title.is_empty() {
            return Err(WikiError::invalid_arg("section title is empty"));
        }
        let heading = root
            .descendants()
            .filter(|n| self.is_heading(n))
            .find(|n| n.rendered_text().contains(title))
            .ok_or_else(|| WikiError::SectionNotFound {
                title: title.to_string(),
            })?;
        let heading_tag = heading.tag().unwrap_or(DEFAULT_HEADING).to_string();

        let lines = heading
            .following_siblings()
            .take_while(|n| !n.is_element(&heading_tag))
            .filter_map(|n| {
                let text = n.rendered_text();
                let text = text.trim();
                (!text.is_empty()).then(|| format!("{}{}", BULLET, text))
            })
            .collect::<Vec<String>>();

        log::debug!(
            "Section {:?} ({}) has {} lines",
            title,
            heading_tag,
            lines.len()
        );
        Ok(Section {
            title: heading.rendered_text().trim().to_string(),
            heading_tag,
            lines,
        })
    }
}

/// Extract with the default extractor (second level headings).
pub fn extract_section<N: DocumentNode>(root: &N, title: &str) -> Result<Section> {
    SectionExtractor::default().extract(root, title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wikitext::{MarkupParser, Node, Tree, WikitextParser};

    const PAGE: &str = "== Intro ==\ntext\n== Groceries ==\n* milk\n* eggs\n== Other ==\nmore";

    fn parse(markup: &str) -> Node {
        WikitextParser.parse(markup).unwrap()
    }

    #[test]
    fn collects_until_next_heading_of_same_level() {
        let section = extract_section(&parse(PAGE), "Groceries").unwrap();
        assert_eq!(section.lines, vec!["* milk", "* eggs"]);
        assert_eq!(section.heading_tag, "h2");
        assert_eq!(section.title, "Groceries");
        assert_eq!(section.to_bullet_list(), "* milk\n* eggs");
    }

    #[test]
    fn missing_title_is_an_error() {
        let err = extract_section(&parse(PAGE), "Nonexistent").unwrap_err();
        assert!(matches!(err, WikiError::SectionNotFound { title } if title == "Nonexistent"));
    }

    #[test]
    fn match_is_case_sensitive_substring() {
        let root = parse(PAGE);
        assert_eq!(extract_section(&root, "roce").unwrap().title, "Groceries");
        assert!(extract_section(&root, "groceries").is_err());
    }

    #[test]
    fn earliest_heading_wins() {
        let root = parse("== Groceries (old) ==\n* bread\n== Groceries ==\n* milk");
        let section = extract_section(&root, "Groceries").unwrap();
        assert_eq!(section.title, "Groceries (old)");
        assert_eq!(section.lines, vec!["* bread"]);
    }

    #[test]
    fn last_heading_runs_to_end_of_siblings() {
        let root = parse("== A ==\nx\n== B ==\n* one\n\n* two");
        assert_eq!(extract_section(&root, "B").unwrap().lines, vec!["* one", "* two"]);
    }

    #[test]
    fn heading_without_following_siblings_is_empty() {
        let section = extract_section(&parse("intro\n== Empty =="), "Empty").unwrap();
        assert!(section.is_empty());
        assert_eq!(section.to_bullet_list(), "");
    }

    #[test]
    fn subheadings_are_content_not_boundaries() {
        let root = parse("== Shop ==\n* milk\n=== Frozen ===\n* peas\n= Top =\n* ice\n== Next ==\n* no");
        let section = extract_section(&root, "Shop").unwrap();
        assert_eq!(section.lines, vec!["* milk", "* Frozen", "* peas", "* Top", "* ice"]);
    }

    #[test]
    fn blank_siblings_are_skipped_and_text_trimmed() {
        let mut tree = Tree::new("body");
        let root = tree.root();
        tree.append_block(root, "h2", "List");
        tree.append_text(root, "   \n ");
        tree.append_block(root, "p", "  spaced  ");
        tree.append_block(root, "hr", "");
        let ul = tree.append_element(root, "ul");
        tree.append_block(ul, "li", "a");
        tree.append_block(ul, "li", "b");
        tree.append_block(root, "h2", "Stop");
        let section = extract_section(&tree.into_root(), "List").unwrap();
        assert_eq!(section.lines, vec!["* spaced", "* ab"]);
    }

    #[test]
    fn nested_heading_only_scans_its_own_siblings() {
        let mut tree = Tree::new("body");
        let root = tree.root();
        let div = tree.append_element(root, "div");
        tree.append_block(div, "h2", "Inner");
        tree.append_block(div, "p", "inside");
        tree.append_block(root, "p", "outside");
        let section = extract_section(&tree.into_root(), "Inner").unwrap();
        assert_eq!(section.lines, vec!["* inside"]);
    }

    #[test]
    fn only_configured_heading_tags_match() {
        let root = parse("=== Deep ===\n* x\n== Shallow ==");
        assert!(extract_section(&root, "Deep").is_err());

        let section = SectionExtractor::new().any_heading().extract(&root, "Deep").unwrap();
        assert_eq!(section.heading_tag, "h3");
        assert_eq!(section.lines, vec!["* x", "* Shallow"]);

        let section = SectionExtractor::new()
            .heading_tags(&["h3"])
            .extract(&root, "Deep")
            .unwrap();
        assert_eq!(section.heading_tag, "h3");
    }

    #[test]
    fn empty_title_is_rejected() {
        assert!(matches!(
            extract_section(&parse(PAGE), ""),
            Err(WikiError::InvalidArgument { .. })
        ));
    }
}
