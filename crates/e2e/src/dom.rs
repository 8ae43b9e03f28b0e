//! Owned DOM snapshots
//!
//! Pages are parsed with html5ever into an `RcDom` and immediately converted
//! into an owned tree so a snapshot is `Send` and can cross await points.
//! Only elements and text survive the conversion; comments, doctypes and
//! processing instructions are dropped.

use std::io;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::{E2eError, E2eResult};

/// A node in an owned DOM tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNode {
    Document { children: Vec<DomNode> },
    Element { tag: String, children: Vec<DomNode> },
    Text(String),
}

impl DomNode {
    pub fn tag(&self) -> Option<&str> {
        match self {
            DomNode::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn children(&self) -> &[DomNode] {
        match self {
            DomNode::Document { children } | DomNode::Element { children, .. } => children,
            DomNode::Text(_) => &[],
        }
    }

    /// Concatenated text of all descendant text nodes, untrimmed
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            DomNode::Text(text) => out.push_str(text),
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Elements matching a descendant chain of tag names, in document order.
    ///
    /// `["table", "thead", "th"]` behaves like the CSS selector
    /// `table thead th`.
    pub fn select(&self, path: &[&str]) -> Vec<&DomNode> {
        let mut out = Vec::new();
        if let Some((last, ancestors)) = path.split_last() {
            let mut stack = Vec::new();
            walk(self, last, ancestors, &mut stack, &mut out);
        }
        out
    }
}

fn walk<'a>(
    node: &'a DomNode,
    target: &str,
    required: &[&str],
    stack: &mut Vec<&'a str>,
    out: &mut Vec<&'a DomNode>,
) {
    if let DomNode::Element { tag, .. } = node {
        if tag.eq_ignore_ascii_case(target) && has_ancestor_chain(stack, required) {
            out.push(node);
        }
        stack.push(tag);
    }
    for child in node.children() {
        walk(child, target, required, stack, out);
    }
    if node.tag().is_some() {
        stack.pop();
    }
}

/// Whether `required` appears in `stack` as an ordered subsequence
fn has_ancestor_chain(stack: &[&str], required: &[&str]) -> bool {
    let mut remaining = required.iter().peekable();
    for tag in stack {
        match remaining.peek() {
            Some(want) if tag.eq_ignore_ascii_case(want) => {
                remaining.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    remaining.peek().is_none()
}

/// The DOM of one page load
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    url: String,
    root: DomNode,
}

impl PageSnapshot {
    /// Parse an HTML document fetched from `url`
    pub fn parse(url: impl Into<String>, html: &str) -> E2eResult<Self> {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                scripting_enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut reader = io::Cursor::new(html.as_bytes());
        let dom = parse_document(RcDom::default(), opts)
            .from_utf8()
            .read_from(&mut reader)
            .map_err(|e| E2eError::Parse(format!("Failed to parse HTML: {}", e)))?;

        let root = convert(&dom.document).unwrap_or(DomNode::Document {
            children: Vec::new(),
        });

        Ok(Self {
            url: url.into(),
            root,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn root(&self) -> &DomNode {
        &self.root
    }

    /// Query with a whitespace-separated chain of tag names
    pub fn select(&self, selector: &str) -> Vec<&DomNode> {
        let path: Vec<&str> = selector.split_whitespace().collect();
        self.root.select(&path)
    }

    pub fn count(&self, selector: &str) -> usize {
        self.select(selector).len()
    }
}

fn convert(handle: &Handle) -> Option<DomNode> {
    let children = || {
        handle
            .children
            .borrow()
            .iter()
            .filter_map(convert)
            .collect::<Vec<_>>()
    };

    match &handle.data {
        NodeData::Document => Some(DomNode::Document {
            children: children(),
        }),
        NodeData::Element { name, .. } => Some(DomNode::Element {
            tag: name.local.as_ref().to_ascii_lowercase(),
            children: children(),
        }),
        NodeData::Text { contents } => Some(DomNode::Text(contents.borrow().to_string())),
        _ => None,
    }
}
