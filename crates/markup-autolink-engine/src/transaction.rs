//! # Transaction Builder
//!
//! An ordered list of mark operations and the code that applies it to a
//! document snapshot.
//!
//! Operations only add or remove marks, so they never move positions: every
//! span in a transaction refers to the same text, before and after each step.

use std::fmt;

use thiserror::Error;

use crate::document::{Document, EditError, Mark, MarkKind, Span};

/// A single mark change over an absolute range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    AddMark { span: Span, mark: Mark },
    RemoveMark { span: Span, kind: MarkKind },
}

impl Operation {
    pub fn span(&self) -> Span {
        match self {
            Operation::AddMark { span, .. } | Operation::RemoveMark { span, .. } => *span,
        }
    }

    pub fn kind(&self) -> MarkKind {
        match self {
            Operation::AddMark { mark, .. } => mark.kind,
            Operation::RemoveMark { kind, .. } => *kind,
        }
    }

    /// Applies this operation to `doc`, producing a new snapshot.
    pub fn apply(&self, doc: &Document) -> Result<Document, EditError> {
        match self {
            Operation::AddMark { span, mark } => doc.add_mark(*span, mark),
            Operation::RemoveMark { span, kind } => doc.remove_mark(*span, *kind),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::AddMark { span, mark } => write!(f, "add {mark} @{span}"),
            Operation::RemoveMark { span, kind } => write!(f, "remove {} @{span}", kind.name()),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TransactionError {
    #[error("operation {index} cannot be applied: {source}")]
    Operation {
        index: usize,
        #[source]
        source: EditError,
    },
}

/// Operations to apply in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    operations: Vec<Operation>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: Operation) {
        self.operations.push(op);
    }

    /// True when applying the transaction would be a no-op.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    /// Applies every operation in order. Text nodes are split at operation
    /// boundaries and the result is normalized after each step.
    pub fn apply(&self, doc: &Document) -> Result<Document, TransactionError> {
        let mut current = doc.clone();
        for (index, op) in self.operations.iter().enumerate() {
            current = op
                .apply(&current)
                .map_err(|source| TransactionError::Operation { index, source })?;
        }
        Ok(current)
    }
}

impl Extend<Operation> for Transaction {
    fn extend<T: IntoIterator<Item = Operation>>(&mut self, iter: T) {
        self.operations.extend(iter);
    }
}

impl FromIterator<Operation> for Transaction {
    fn from_iter<T: IntoIterator<Item = Operation>>(iter: T) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}
