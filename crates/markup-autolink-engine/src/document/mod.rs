//! # Document Model
//!
//! An immutable tree of blocks and marked text runs.
//!
//! - **`Node`**: either a `Block` (typed container of child nodes) or a `Text`
//!   run carrying a set of [`Marks`]
//! - **`Span`**: half-open byte range into the flattened text of the document
//! - **`Marks`**: node-scoped annotations, at most one per [`MarkKind`]
//!
//! ## Positions
//!
//! A position is a byte offset into the depth-first concatenation of every
//! text node. Block boundaries contribute nothing, so two sibling paragraphs
//! `"ab"` and `"cd"` occupy `0..2` and `2..4`.
//!
//! ## Normalization
//!
//! Every constructor normalizes the tree: empty text nodes are dropped and
//! adjacent text siblings with identical marks are merged. Giving two parts of
//! a run different marks is done by splitting the text node, never by
//! stacking two marks of one kind.

pub mod edit;
mod format;
pub mod marks;
pub mod span;

pub use edit::{Edit, EditError};
pub use marks::{Mark, MarkKind, Marks};
pub use span::Span;

/// Structural type of a block node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Heading { level: u8 },
    BlockQuote,
    List { ordered: bool },
    ListItem,
    CodeBlock,
    Div,
}

impl BlockKind {
    pub fn name(&self) -> String {
        match self {
            BlockKind::Paragraph => "paragraph".to_string(),
            BlockKind::Heading { level } => format!("heading({level})"),
            BlockKind::BlockQuote => "blockquote".to_string(),
            BlockKind::List { ordered: true } => "list(ordered)".to_string(),
            BlockKind::List { ordered: false } => "list".to_string(),
            BlockKind::ListItem => "item".to_string(),
            BlockKind::CodeBlock => "code".to_string(),
            BlockKind::Div => "div".to_string(),
        }
    }
}

/// A node of the document tree.
///
/// Text nodes have no children and blocks have no text of their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Block { kind: BlockKind, children: Vec<Node> },
    Text { text: String, marks: Marks },
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text {
            text: text.into(),
            marks: Marks::new(),
        }
    }

    pub fn marked(text: impl Into<String>, marks: impl IntoIterator<Item = Mark>) -> Self {
        Node::Text {
            text: text.into(),
            marks: marks.into_iter().collect(),
        }
    }

    pub fn block(kind: BlockKind, children: Vec<Node>) -> Self {
        Node::Block { kind, children }
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::block(BlockKind::Paragraph, children)
    }

    /// Number of text bytes under this node.
    pub fn text_len(&self) -> usize {
        match self {
            Node::Text { text, .. } => text.len(),
            Node::Block { children, .. } => children.iter().map(Node::text_len).sum(),
        }
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Node::Text { text, .. } => out.push_str(text),
            Node::Block { children, .. } => children.iter().for_each(|c| c.push_text(out)),
        }
    }
}

/// An immutable document snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Document {
    children: Vec<Node>,
}

impl Document {
    /// Builds a normalized document from top-level nodes.
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            children: normalize(children),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Convenience: one paragraph per entry, each holding a single unmarked run.
    pub fn from_paragraphs<'a>(paragraphs: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(
            paragraphs
                .into_iter()
                .map(|p| Node::paragraph(vec![Node::text(p)]))
                .collect(),
        )
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Total number of text bytes.
    pub fn len(&self) -> usize {
        self.children.iter().map(Node::text_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The flattened text that positions index into.
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.len());
        self.children.iter().for_each(|c| c.push_text(&mut out));
        out
    }

    /// Rebuilds the tree, replacing every text node with whatever `f` returns
    /// for it. `f` receives the node's absolute span, its text and marks.
    /// Text nodes are visited in document order; the result is normalized.
    pub(crate) fn rewrite_text<F>(&self, mut f: F) -> Document
    where
        F: FnMut(Span, &str, &Marks) -> Vec<Node>,
    {
        let mut offset = 0;
        let children = rewrite_nodes(&self.children, &mut offset, &mut f);
        Document::new(children)
    }

    /// Returns a copy with the top-level children replaced.
    pub(crate) fn with_children(&self, children: Vec<Node>) -> Document {
        Document::new(children)
    }

    /// Checks that `span` lies inside the document and on char boundaries.
    pub(crate) fn check_span(&self, span: Span) -> Result<(), EditError> {
        if span.start > span.end {
            return Err(EditError::Inverted {
                start: span.start,
                end: span.end,
            });
        }
        let text = self.text();
        if span.end > text.len() {
            return Err(EditError::OutOfBounds {
                start: span.start,
                end: span.end,
                len: text.len(),
            });
        }
        for offset in [span.start, span.end] {
            if !text.is_char_boundary(offset) {
                return Err(EditError::NotCharBoundary(offset));
            }
        }
        Ok(())
    }

    /// Adds `mark` to every text byte in `span`, splitting text nodes at the
    /// span edges. An existing mark of the same kind is replaced.
    pub fn add_mark(&self, span: Span, mark: &Mark) -> Result<Document, EditError> {
        self.check_span(span)?;
        Ok(self.rewrite_marks(span, |marks| {
            marks.insert(mark.clone());
        }))
    }

    /// Removes marks of `kind` from every text byte in `span`.
    pub fn remove_mark(&self, span: Span, kind: MarkKind) -> Result<Document, EditError> {
        self.check_span(span)?;
        Ok(self.rewrite_marks(span, |marks| {
            marks.remove(kind);
        }))
    }

    fn rewrite_marks(&self, span: Span, mut change: impl FnMut(&mut Marks)) -> Document {
        if span.is_empty() {
            return self.clone();
        }
        self.rewrite_text(|node, text, marks| {
            let Some(hit) = node.intersection(span) else {
                return vec![Node::Text {
                    text: text.to_string(),
                    marks: marks.clone(),
                }];
            };
            let local = hit.relative_to(node.start);
            let mut changed = marks.clone();
            change(&mut changed);
            vec![
                Node::Text {
                    text: text[..local.start].to_string(),
                    marks: marks.clone(),
                },
                Node::Text {
                    text: text[local.start..local.end].to_string(),
                    marks: changed,
                },
                Node::Text {
                    text: text[local.end..].to_string(),
                    marks: marks.clone(),
                },
            ]
        })
    }
}

fn rewrite_nodes<F>(nodes: &[Node], offset: &mut usize, f: &mut F) -> Vec<Node>
where
    F: FnMut(Span, &str, &Marks) -> Vec<Node>,
{
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Block { kind, children } => out.push(Node::Block {
                kind: kind.clone(),
                children: rewrite_nodes(children, offset, f),
            }),
            Node::Text { text, marks } => {
                let span = Span::new(*offset, *offset + text.len());
                *offset = span.end;
                out.extend(f(span, text, marks));
            }
        }
    }
    out
}

/// Drops empty text nodes and merges adjacent text siblings with equal marks,
/// recursively.
fn normalize(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Block { kind, children } => out.push(Node::Block {
                kind,
                children: normalize(children),
            }),
            Node::Text { text, .. } if text.is_empty() => {}
            Node::Text { text, marks } => {
                if let Some(Node::Text {
                    text: prev_text,
                    marks: prev_marks,
                }) = out.last_mut()
                    && *prev_marks == marks
                {
                    prev_text.push_str(&text);
                    continue;
                }
                out.push(Node::Text { text, marks });
            }
        }
    }
    out
}
