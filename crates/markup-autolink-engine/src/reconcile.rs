//! # Reconciler
//!
//! One pass of the engine: style sync, then link detection, resolution and
//! diffing, folded into a single transaction.
//!
//! ## Pass order
//!
//! 1. Underline colors are synced over every text node and applied, giving a
//!    style-synced intermediate document.
//! 2. The link pass walks the intermediate document segment by segment:
//!    detect, resolve, diff against the Link marks already there.
//! 3. Link operations are applied to the intermediate document.
//!
//! Syncing styles first matters because recoloring can make two neighbouring
//! runs equal, and normalization then merges them. Scanning the merged result
//! means the link pass always sees the runs the final document will have.
//!
//! ## Scan scope
//!
//! [`ScanScope::Full`] rescans every segment. [`ScanScope::EditedBlocks`]
//! assumes `old` was already reconciled and limits the link pass to the
//! top-level blocks that differ between `old` and `new`.

use std::borrow::Cow;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{
    detect::{DetectorOptions, detect},
    diff::{diff_segment, extent},
    document::{Document, Node, Span},
    resolve::resolve,
    style::sync_underline_colors,
    transaction::{Operation, Transaction},
    walker::{TextWalker, segments},
};

/// How much of the document the link pass rescans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanScope {
    #[default]
    Full,
    EditedBlocks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    pub detectors: DetectorOptions,
    pub style_sync: bool,
    pub scan_scope: ScanScope,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            detectors: DetectorOptions::default(),
            style_sync: true,
            scan_scope: ScanScope::Full,
        }
    }
}

/// Result of a reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Marks already match the text; the caller keeps its snapshot.
    Unchanged,
    /// A new snapshot and the operations that produced it, in order.
    Changed {
        document: Document,
        operations: Vec<Operation>,
    },
}

impl Outcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Outcome::Changed { .. })
    }

    pub fn operations(&self) -> &[Operation] {
        match self {
            Outcome::Unchanged => &[],
            Outcome::Changed { operations, .. } => operations,
        }
    }

    /// The reconciled snapshot, or `unchanged` when nothing had to change.
    pub fn into_document(self, unchanged: Document) -> Document {
        match self {
            Outcome::Unchanged => unchanged,
            Outcome::Changed { document, .. } => document,
        }
    }
}

/// The reconciliation engine. Holds options only; every pass is a pure
/// function of its inputs.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    options: ReconcileOptions,
}

impl Reconciler {
    pub fn new(options: ReconcileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Reconciles `new`, the snapshot after an edit of `old`.
    ///
    /// Never fails: a pass that cannot be applied is logged and reported as
    /// [`Outcome::Unchanged`].
    pub fn reconcile(&self, old: &Document, new: &Document) -> Outcome {
        let dirty = match self.options.scan_scope {
            ScanScope::Full => Span::new(0, new.len()),
            ScanScope::EditedBlocks => edited_span(old, new),
        };
        self.reconcile_span(new, dirty)
    }

    /// Reconciles `doc` with a full scan, whatever the configured scope.
    pub fn reconcile_all(&self, doc: &Document) -> Outcome {
        self.reconcile_span(doc, Span::new(0, doc.len()))
    }

    fn reconcile_span(&self, doc: &Document, dirty: Span) -> Outcome {
        let mut operations = vec![];

        let styled = if self.options.style_sync {
            let style_ops = sync_underline_colors(TextWalker::new(doc));
            if style_ops.is_empty() {
                Cow::Borrowed(doc)
            } else {
                let tx: Transaction = style_ops.into_iter().collect();
                match tx.apply(doc) {
                    Ok(synced) => {
                        operations.extend(tx.into_operations());
                        Cow::Owned(synced)
                    }
                    Err(e) => {
                        log::error!("Failed to apply style sync: {e}");
                        return Outcome::Unchanged;
                    }
                }
            }
        } else {
            Cow::Borrowed(doc)
        };
        let style_count = operations.len();

        let link_ops = self.link_operations(&styled, dirty);
        let document = if link_ops.is_empty() {
            styled.into_owned()
        } else {
            let tx: Transaction = link_ops.into_iter().collect();
            match tx.apply(&styled) {
                Ok(linked) => {
                    operations.extend(tx.into_operations());
                    linked
                }
                Err(e) => {
                    log::error!("Failed to apply link marks: {e}");
                    return Outcome::Unchanged;
                }
            }
        };

        log::debug!(
            "reconciled {dirty}: {style_count} style ops, {} link ops",
            operations.len() - style_count
        );
        if operations.is_empty() {
            return Outcome::Unchanged;
        }
        Outcome::Changed {
            document,
            operations,
        }
    }

    /// Link operations for every segment in the top-level blocks touching
    /// `dirty`.
    fn link_operations(&self, doc: &Document, dirty: Span) -> Vec<Operation> {
        let Some((blocks, base)) = covering_blocks(doc.children(), dirty) else {
            return vec![];
        };

        let mut ops = vec![];
        for segment in segments(TextWalker::over(&doc.children()[blocks], base)) {
            let text = segment.text();
            let candidates = detect(segment.start(), &text, &self.options.detectors);
            log::trace!(
                "segment {} has {} candidates",
                segment.span(),
                candidates.len()
            );
            let desired = resolve(candidates);
            ops.extend(diff_segment(&segment, &desired));
        }
        if let Some(touched) = extent(&ops) {
            log::trace!("link ops touch {touched}");
        }
        ops
    }
}

/// The byte range of `new` covered by top-level blocks that are not part of
/// the common prefix or suffix shared with `old`.
fn edited_span(old: &Document, new: &Document) -> Span {
    let (old, new) = (old.children(), new.children());
    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    let max_suffix = old.len().min(new.len()) - prefix;
    let suffix = old
        .iter()
        .rev()
        .zip(new.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();

    let start: usize = new[..prefix].iter().map(Node::text_len).sum();
    let len: usize = new[prefix..new.len() - suffix]
        .iter()
        .map(Node::text_len)
        .sum();
    Span::new(start, start + len)
}

/// Indices of the top-level nodes intersecting `dirty`, and the position the
/// first of them starts at. Runs of top-level text nodes are kept whole, since
/// they form one segment.
fn covering_blocks(children: &[Node], dirty: Span) -> Option<(Range<usize>, usize)> {
    let mut offset = 0;
    let mut starts = Vec::with_capacity(children.len());
    let mut hit: Option<Range<usize>> = None;
    for (i, child) in children.iter().enumerate() {
        starts.push(offset);
        let span = Span::new(offset, offset + child.text_len());
        offset = span.end;
        if span.intersects(dirty) {
            hit = Some(hit.map_or(i..i + 1, |r| r.start..i + 1));
        }
    }

    let Range { mut start, mut end } = hit?;
    let is_text = |node: &Node| matches!(node, Node::Text { .. });
    while start > 0 && is_text(&children[start - 1]) && is_text(&children[start]) {
        start -= 1;
    }
    while end < children.len() && is_text(&children[end - 1]) && is_text(&children[end]) {
        end += 1;
    }
    Some((start..end, starts[start]))
}
