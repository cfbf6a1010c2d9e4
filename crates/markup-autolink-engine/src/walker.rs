//! # Text Walker
//!
//! Lazy, restartable traversal of a document's text nodes in document order.
//!
//! [`TextWalker`] yields one [`TextRun`] per non-empty text node with its
//! absolute start position. [`segments`] groups consecutive runs that are
//! inline siblings (no block boundary between them) into a [`Segment`], the
//! unit the link pass scans: a link that was split across several runs by
//! other formatting is still seen as one contiguous target.

use std::iter::Peekable;
use std::slice;

use crate::document::{Document, Marks, Node, Span};

/// One text node, located in the flattened document text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRun<'a> {
    pub text: &'a str,
    /// Absolute position of the first byte.
    pub start: usize,
    pub marks: &'a Marks,
    /// Inline context ordinal; equal for runs that are adjacent inline siblings.
    pub context: usize,
}

impl TextRun<'_> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end())
    }
}

/// Depth-first iterator over the text nodes under a list of nodes.
///
/// Holds no state beyond the traversal itself; walking again means building
/// a new walker.
pub struct TextWalker<'a> {
    stack: Vec<slice::Iter<'a, Node>>,
    offset: usize,
    context: usize,
}

impl<'a> TextWalker<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self::over(doc.children(), 0)
    }

    /// Walks `nodes`, numbering positions from `base`. Used to scan a slice of
    /// top-level blocks without re-walking the ones before it.
    pub fn over(nodes: &'a [Node], base: usize) -> Self {
        Self {
            stack: vec![nodes.iter()],
            offset: base,
            context: 0,
        }
    }
}

impl<'a> Iterator for TextWalker<'a> {
    type Item = TextRun<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                None => {
                    self.stack.pop();
                    self.context += 1;
                }
                Some(Node::Block { children, .. }) => {
                    self.stack.push(children.iter());
                    self.context += 1;
                }
                Some(Node::Text { text, marks }) => {
                    let start = self.offset;
                    self.offset += text.len();
                    if text.is_empty() {
                        continue;
                    }
                    return Some(TextRun {
                        text,
                        start,
                        marks,
                        context: self.context,
                    });
                }
            }
        }
    }
}

/// Consecutive runs of one inline context.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<'a> {
    pub runs: Vec<TextRun<'a>>,
}

impl Segment<'_> {
    pub fn start(&self) -> usize {
        self.runs.first().map_or(0, |r| r.start)
    }

    pub fn end(&self) -> usize {
        self.runs.last().map_or(0, TextRun::end)
    }

    pub fn span(&self) -> Span {
        Span::new(self.start(), self.end())
    }

    /// Concatenated text of all runs; index 0 is [`Segment::start`].
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text).collect()
    }
}

/// Groups runs sharing an inline context into segments.
pub fn segments<'a, I>(runs: I) -> Segments<I::IntoIter>
where
    I: IntoIterator<Item = TextRun<'a>>,
{
    Segments {
        runs: runs.into_iter().peekable(),
    }
}

pub struct Segments<I: Iterator> {
    runs: Peekable<I>,
}

impl<'a, I: Iterator<Item = TextRun<'a>>> Iterator for Segments<I> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.runs.next()?;
        let mut runs = vec![first];
        while let Some(run) = self.runs.next_if(|r| r.context == first.context) {
            runs.push(run);
        }
        Some(Segment { runs })
    }
}
