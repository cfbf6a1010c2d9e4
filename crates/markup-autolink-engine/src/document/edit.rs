use thiserror::Error;

use super::{Document, Mark, MarkKind, Node, Span};

/// An atomic user edit, as committed by the host editor.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Insert `text` at position `at`.
    InsertText { at: usize, text: String },
    /// Delete the text covered by `span`.
    Delete { span: Span },
    /// Apply `mark` over `span` (toolbar formatting).
    AddMark { span: Span, mark: Mark },
    /// Strip marks of `kind` over `span`.
    RemoveMark { span: Span, kind: MarkKind },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("range {start}..{end} is out of bounds (document length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("offset {0} is not on a char boundary")]
    NotCharBoundary(usize),
    #[error("range {start}..{end} is inverted")]
    Inverted { start: usize, end: usize },
}

impl Document {
    /// Applies an edit, producing the next snapshot.
    pub fn edit(&self, edit: &Edit) -> Result<Document, EditError> {
        match edit {
            Edit::InsertText { at, text } => self.insert_text(*at, text),
            Edit::Delete { span } => self.delete(*span),
            Edit::AddMark { span, mark } => self.add_mark(*span, mark),
            Edit::RemoveMark { span, kind } => self.remove_mark(*span, *kind),
        }
    }

    /// Inserts `text` at `at`.
    ///
    /// The inserted text takes the marks of the run containing `at`; at a run
    /// boundary the preceding run wins. A link is not extended by typing right
    /// after it. Inserting into a document without text opens a paragraph.
    fn insert_text(&self, at: usize, text: &str) -> Result<Document, EditError> {
        self.check_span(Span::new(at, at))?;
        if text.is_empty() {
            return Ok(self.clone());
        }

        let mut placed = false;
        let doc = self.rewrite_text(|span, existing, marks| {
            let inside = span.start <= at && at <= span.end;
            if placed || !inside {
                return vec![Node::Text {
                    text: existing.to_string(),
                    marks: marks.clone(),
                }];
            }
            placed = true;
            if at == span.end && marks.contains(MarkKind::Link) {
                return vec![
                    Node::Text {
                        text: existing.to_string(),
                        marks: marks.clone(),
                    },
                    Node::Text {
                        text: text.to_string(),
                        marks: marks.without(MarkKind::Link),
                    },
                ];
            }
            let local = at - span.start;
            let mut joined = String::with_capacity(existing.len() + text.len());
            joined.push_str(&existing[..local]);
            joined.push_str(text);
            joined.push_str(&existing[local..]);
            vec![Node::Text {
                text: joined,
                marks: marks.clone(),
            }]
        });

        if placed {
            return Ok(doc);
        }
        let mut children = doc.children().to_vec();
        children.push(Node::paragraph(vec![Node::text(text)]));
        Ok(self.with_children(children))
    }

    /// Deletes the text in `span`. Runs left empty disappear together with
    /// their marks; blocks are kept.
    fn delete(&self, span: Span) -> Result<Document, EditError> {
        self.check_span(span)?;
        if span.is_empty() {
            return Ok(self.clone());
        }
        Ok(self.rewrite_text(|node, existing, marks| {
            let kept = match node.intersection(span) {
                Some(hit) => {
                    let local = hit.relative_to(node.start);
                    format!("{}{}", &existing[..local.start], &existing[local.end..])
                }
                None => existing.to_string(),
            };
            vec![Node::Text {
                text: kept,
                marks: marks.clone(),
            }]
        }))
    }
}
