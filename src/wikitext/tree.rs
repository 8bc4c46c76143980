//! Arena backed document tree produced by the wikitext parser.
//!
//! Nodes live in one `Vec` owned by a shared [`Tree`]; a [`Node`] is a cheap
//! handle (tree + index) that implements [`DocumentNode`].

use std::sync::Arc;

use crate::document::{DocumentNode, NodeKind};

const ROOT: usize = 0;

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    tag: Option<String>,
    text: String,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Mutable tree used while parsing. Turn it into a [`Node`] with [`Tree::into_root`].
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    /// New tree holding only a root element with `root_tag`.
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Element,
                tag: Some(root_tag.to_string()),
                text: String::new(),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> usize {
        ROOT
    }

    fn push(&mut self, parent: usize, data: NodeData) -> usize {
        let id = self.nodes.len();
        self.nodes.push(data);
        self.nodes[parent].children.push(id);
        id
    }

    /// Append an element under `parent` and return its index.
    pub fn append_element(&mut self, parent: usize, tag: &str) -> usize {
        self.push(
            parent,
            NodeData {
                kind: NodeKind::Element,
                tag: Some(tag.to_string()),
                text: String::new(),
                parent: Some(parent),
                children: Vec::new(),
            },
        )
    }

    /// Append a text node under `parent` and return its index.
    pub fn append_text(&mut self, parent: usize, text: &str) -> usize {
        self.push(
            parent,
            NodeData {
                kind: NodeKind::Text,
                tag: None,
                text: text.to_string(),
                parent: Some(parent),
                children: Vec::new(),
            },
        )
    }

    /// Element with a single text child, the common case for block lines.
    pub fn append_block(&mut self, parent: usize, tag: &str, text: &str) -> usize {
        let id = self.append_element(parent, tag);
        if !text.is_empty() {
            self.append_text(id, text);
        }
        id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn into_root(self) -> Node {
        Node {
            tree: Arc::new(self),
            id: ROOT,
        }
    }
}

/// Handle to one node of a finished tree.
#[derive(Debug, Clone)]
pub struct Node {
    tree: Arc<Tree>,
    id: usize,
}

impl Node {
    fn data(&self) -> &NodeData {
        &self.tree.nodes[self.id]
    }

    fn at(&self, id: usize) -> Node {
        Node {
            tree: Arc::clone(&self.tree),
            id,
        }
    }

    fn collect_text(&self, id: usize, out: &mut String) {
        let data = &self.tree.nodes[id];
        match data.kind {
            NodeKind::Text => out.push_str(&data.text),
            NodeKind::Element => {
                for child in &data.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }
}

impl DocumentNode for Node {
    fn kind(&self) -> NodeKind {
        self.data().kind
    }

    fn tag(&self) -> Option<&str> {
        self.data().tag.as_deref()
    }

    fn children(&self) -> Vec<Self> {
        self.data().children.iter().map(|id| self.at(*id)).collect()
    }

    fn next_sibling(&self) -> Option<Self> {
        let parent = &self.tree.nodes[self.data().parent?];
        let pos = parent.children.iter().position(|c| *c == self.id)?;
        parent.children.get(pos + 1).map(|id| self.at(*id))
    }

    fn rendered_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(self.id, &mut out);
        out
    }
}
