//! Generic document tree consumed by the section extractor.
//!
//! Any markup parser can feed the extractor as long as its nodes expose the
//! small capability set of [`DocumentNode`]. Nothing here knows about a
//! particular grammar.

use std::fmt;

/// What a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Element => write!(f, "Element"),
            NodeKind::Text => write!(f, "Text"),
        }
    }
}

/// Read-only view of one node of a parsed document.
pub trait DocumentNode: Clone {
    fn kind(&self) -> NodeKind;
    /// Tag name for elements (`h2`, `li`, ...). `None` for text.
    fn tag(&self) -> Option<&str>;
    fn children(&self) -> Vec<Self>;
    fn next_sibling(&self) -> Option<Self>;
    /// Concatenated text of the node and everything below it.
    fn rendered_text(&self) -> String;

    /// Element with exactly this tag.
    fn is_element(&self, tag: &str) -> bool {
        self.kind() == NodeKind::Element && self.tag() == Some(tag)
    }

    /// Every node below this one, in document order (pre-order).
    fn descendants(&self) -> Descendants<Self> {
        let mut stack = self.children();
        stack.reverse();
        Descendants { stack }
    }

    /// Following siblings, starting after this node.
    fn following_siblings(&self) -> FollowingSiblings<Self> {
        FollowingSiblings {
            next: self.next_sibling(),
        }
    }
}

/// Depth first walk, see [`DocumentNode::descendants`].
pub struct Descendants<N> {
    stack: Vec<N>,
}

impl<N: DocumentNode> Iterator for Descendants<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let node = self.stack.pop()?;
        let mut children = node.children();
        children.reverse();
        self.stack.extend(children);
        Some(node)
    }
}

/// Sibling chain walk, see [`DocumentNode::following_siblings`].
pub struct FollowingSiblings<N> {
    next: Option<N>,
}

impl<N: DocumentNode> Iterator for FollowingSiblings<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let node = self.next.take()?;
        self.next = node.next_sibling();
        Some(node)
    }
}
