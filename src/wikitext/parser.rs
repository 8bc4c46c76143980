use lazy_regex::{regex_captures, regex_is_match};

use crate::{
    document::DocumentNode,
    errors::Result,
    wikitext::{
        enums::ListType,
        inline::{render_inline, strip_comments, strip_templates},
        tree::{Node, Tree},
    },
};

/// Turns raw markup into a document tree.
///
/// The section extractor only needs [`DocumentNode`], so any parser that can
/// produce one can be plugged into the pipeline.
pub trait MarkupParser {
    type Node: DocumentNode;

    fn parse(&self, markup: &str) -> Result<Self::Node>;
}

/// Tag of the element every parsed document hangs off.
pub const ROOT_TAG: &str = "body";

/// Line based parser for MediaWiki markup.
///
/// Block structure only: headings, list lines, rules and paragraphs become
/// flat children of the `body` root. Tables are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct WikitextParser;

/// What one source line turned out to be.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Heading { level: usize, text: &'a str },
    Item { list: ListType, text: &'a str },
    Rule,
    TableStart,
    TableEnd,
    Blank,
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let line = line.trim_end();
    if line.trim().is_empty() {
        return Line::Blank;
    }
    if let Some((_, open, text, close)) = regex_captures!(r"^(={1,6})(.+?)(={1,6})$", line) {
        return Line::Heading {
            level: open.len().min(close.len()),
            text: text.trim(),
        };
    }
    if let Some((_, markers, text)) = regex_captures!(r"^([*#;:]+)(.*)$", line)
        && let Some(list) = ListType::from_markers(markers)
    {
        return Line::Item {
            list,
            text: text.trim(),
        };
    }
    if regex_is_match!(r"^-{4,}$", line) {
        return Line::Rule;
    }
    if line.starts_with("{|") {
        return Line::TableStart;
    }
    if line.starts_with("|}") {
        return Line::TableEnd;
    }
    Line::Text(line.trim())
}

/// Collects consecutive text lines into one paragraph.
struct Builder {
    tree: Tree,
    paragraph: Vec<String>,
    table_depth: usize,
}

impl Builder {
    fn flush(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = self.paragraph.join("\n");
        self.paragraph.clear();
        let root = self.tree.root();
        self.tree.append_block(root, "p", &text);
    }

    fn block(&mut self, tag: &str, text: &str) {
        self.flush();
        let root = self.tree.root();
        self.tree.append_block(root, tag, &render_inline(text));
    }

    fn line(&mut self, line: Line<'_>) {
        if self.table_depth > 0 {
            match line {
                Line::TableStart => self.table_depth += 1,
                Line::TableEnd => self.table_depth -= 1,
                _ => {}
            }
            return;
        }
        match line {
            Line::Heading { level, text } => self.block(&format!("h{}", level), text),
            Line::Item { list, text } => self.block(list.tag(), text),
            Line::Rule => self.block("hr", ""),
            Line::TableStart => {
                self.flush();
                log::debug!("Skipping table markup");
                self.table_depth = 1;
            }
            Line::TableEnd => log::debug!("Stray table end ignored"),
            Line::Blank => self.flush(),
            Line::Text(text) => self.paragraph.push(render_inline(text)),
        }
    }
}

impl MarkupParser for WikitextParser {
    type Node = Node;

    fn parse(&self, markup: &str) -> Result<Node> {
        let text = strip_templates(&strip_comments(markup)?);

        let mut builder = Builder {
            tree: Tree::new(ROOT_TAG),
            paragraph: Vec::new(),
            table_depth: 0,
        };
        for line in text.lines() {
            builder.line(classify(line));
        }
        builder.flush();
        if builder.table_depth > 0 {
            log::warn!("Table never closed, skipped to the end of the page");
        }

        log::debug!(
            "Parsed {} bytes of markup into {} nodes",
            markup.len(),
            builder.tree.node_count()
        );
        Ok(builder.tree.into_root())
    }
}
