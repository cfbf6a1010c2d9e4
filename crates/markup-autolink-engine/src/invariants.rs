//! Structural checks for tests and fuzzing. Each check panics with a
//! description of the first violation it finds.

use crate::{
    document::{Document, MarkKind, Node},
    reconcile::{Outcome, ReconcileOptions, Reconciler},
    walker::TextWalker,
};

/// Asserts that `doc` is normalized and that every Link mark has a target.
pub fn check(doc: &Document) {
    check_nodes(doc.children());

    let mut expected_start = 0;
    for run in TextWalker::new(doc) {
        assert_eq!(
            run.start, expected_start,
            "text run {:?} does not start where the previous one ended",
            run.text
        );
        expected_start = run.end();

        if let Some(link) = run.marks.get(MarkKind::Link) {
            assert!(
                link.href().is_some_and(|href| !href.is_empty()),
                "link without href on {:?} at {}",
                run.text,
                run.span()
            );
        }
    }
    assert_eq!(expected_start, doc.len(), "runs do not cover the document text");
}

fn check_nodes(nodes: &[Node]) {
    for pair in nodes.windows(2) {
        if let [
            Node::Text { marks: a, text },
            Node::Text { marks: b, .. },
        ] = pair
        {
            assert_ne!(a, b, "adjacent text nodes with equal marks after {text:?}");
        }
    }
    for node in nodes {
        match node {
            Node::Text { text, .. } => assert!(!text.is_empty(), "empty text node"),
            Node::Block { children, .. } => check_nodes(children),
        }
    }
}

/// Asserts that reconciling `doc` again would change nothing.
pub fn check_reconciled(doc: &Document, options: &ReconcileOptions) {
    check(doc);
    let outcome = Reconciler::new(options.clone()).reconcile_all(doc);
    assert_eq!(
        outcome,
        Outcome::Unchanged,
        "document is not reconciled:\n{doc}"
    );
}
