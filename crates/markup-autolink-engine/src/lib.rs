//! Mark reconciliation engine.
//!
//! After every edit the engine rescans text, finds URLs, email addresses and
//! phone numbers, and brings Link marks and underline colors back in line
//! with what the text implies. A pass over an already consistent document
//! reports [`Outcome::Unchanged`].
//!
//! ```
//! use markup_autolink_engine::{Document, Outcome, Reconciler};
//!
//! let doc = Document::from_paragraphs(["docs at example.com"]);
//! let outcome = Reconciler::default().reconcile(&Document::empty(), &doc);
//! assert!(outcome.is_changed());
//!
//! let linked = outcome.into_document(doc);
//! assert_eq!(
//!     Reconciler::default().reconcile_all(&linked),
//!     Outcome::Unchanged
//! );
//! ```

pub mod detect;
pub mod diff;
pub mod document;
pub mod import;
pub mod invariants;
pub mod reconcile;
pub mod resolve;
pub mod session;
pub mod style;
pub mod transaction;
pub mod walker;

// Re-export key types for easier usage
pub use detect::{Candidate, DetectorOptions, PatternKind};
pub use document::{BlockKind, Document, Edit, EditError, Mark, MarkKind, Marks, Node, Span};
pub use reconcile::{Outcome, ReconcileOptions, Reconciler, ScanScope};
pub use resolve::LinkTarget;
pub use session::{ChangeObserver, Commit, Session};
pub use transaction::{Operation, Transaction, TransactionError};
pub use walker::{Segment, TextRun, TextWalker};
