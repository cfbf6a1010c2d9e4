//! # Editing Session
//!
//! Shows how a host drives the engine: every committed [`Edit`] is applied,
//! reconciled, and only then announced. Observers never see a snapshot whose
//! marks disagree with its text, and they are not called for edits that end
//! up changing nothing.

use crate::{
    document::{Document, Edit, EditError},
    reconcile::{Outcome, ReconcileOptions, Reconciler},
    transaction::Operation,
};

/// Receives committed snapshots.
pub trait ChangeObserver: Send + Sync {
    fn document_changed(&mut self, version: u64, document: &Document);
}

/// What a commit did.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    /// Session version after the commit; bumped only when the document changed.
    pub version: u64,
    pub changed: bool,
    /// Operations the reconciler added on top of the edit.
    pub operations: Vec<Operation>,
}

pub struct Session {
    document: Document,
    version: u64,
    reconciler: Reconciler,
    observers: Vec<Box<dyn ChangeObserver>>,
}

impl Session {
    /// Starts a session on `document`, reconciling it once up front.
    pub fn new(document: Document, options: ReconcileOptions) -> Self {
        let reconciler = Reconciler::new(options);
        let document = reconciler
            .reconcile_all(&document)
            .into_document(document);
        Self {
            document,
            version: 0,
            reconciler,
            observers: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn subscribe(&mut self, observer: Box<dyn ChangeObserver>) {
        self.observers.push(observer);
    }

    /// Applies `edit`, reconciles, and notifies observers if the document
    /// changed. A failed edit leaves the session untouched.
    pub fn commit(&mut self, edit: &Edit) -> Result<Commit, EditError> {
        let edited = self.document.edit(edit)?;
        let (next, operations) = match self.reconciler.reconcile(&self.document, &edited) {
            Outcome::Unchanged => (edited, vec![]),
            Outcome::Changed {
                document,
                operations,
            } => (document, operations),
        };

        let changed = next != self.document;
        if changed {
            self.document = next;
            self.version += 1;
            log::debug!(
                "commit v{}: {} reconcile ops",
                self.version,
                operations.len()
            );
            for observer in &mut self.observers {
                observer.document_changed(self.version, &self.document);
            }
        }
        Ok(Commit {
            version: self.version,
            changed,
            operations,
        })
    }
}
