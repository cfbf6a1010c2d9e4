use markup_autolink_engine::{
    DetectorOptions, Document, Edit, Mark, MarkKind, Node, Operation, Outcome, ReconcileOptions,
    Reconciler, ScanScope, Session, Span,
    detect::detect,
    diff::current_links,
    import::from_markdown,
    invariants,
    resolve::resolve,
    walker::{TextWalker, segments},
};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Every link in `doc` as `(covered text, href)`.
fn links(doc: &Document) -> Vec<(String, String)> {
    let text = doc.text();
    segments(TextWalker::new(doc))
        .flat_map(|segment| current_links(&segment))
        .map(|t| (text[t.span.start..t.span.end].to_string(), t.href))
        .collect()
}

fn reconciled(doc: &Document) -> Document {
    Reconciler::default().reconcile_all(doc).into_document(doc.clone())
}

fn operations(outcome: &Outcome) -> String {
    outcome
        .operations()
        .iter()
        .map(Operation::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn fixture(name: &str) -> Document {
    let md = std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    from_markdown(&md)
}

#[rstest]
#[case("call 555-0100 at http://555-0100.com")]
#[case("mail jo@example.org or visit example.org/contact.")]
#[case("+44 20 7946 0958, (555) 010-0100")]
#[case("nothing here but version 2.3")]
#[case("a.io b.io c.io")]
fn second_pass_is_a_no_op(#[case] text: &str) {
    let once = reconciled(&Document::from_paragraphs([text, text]));
    invariants::check_reconciled(&once, &ReconcileOptions::default());
}

#[test]
fn url_beats_the_phone_number_inside_it() {
    let doc = reconciled(&Document::from_paragraphs([
        "call 555-0100 at http://555-0100.com",
    ]));
    assert_eq!(
        links(&doc),
        vec![
            ("555-0100".to_string(), "tel:5550100".to_string()),
            (
                "http://555-0100.com".to_string(),
                "http://555-0100.com".to_string()
            ),
        ]
    );
}

#[test]
fn url_with_scheme_round_trips() {
    let doc = reconciled(&Document::from_paragraphs([
        "see https://example.com/path for info",
    ]));
    assert_eq!(
        links(&doc),
        vec![(
            "https://example.com/path".to_string(),
            "https://example.com/path".to_string()
        )]
    );
}

#[rstest]
#[case("visit www.example.com now", "www.example.com", "https://www.example.com")]
#[case("example.com", "example.com", "https://example.com")]
fn bare_domain_gets_https(#[case] text: &str, #[case] covered: &str, #[case] href: &str) {
    let doc = reconciled(&Document::from_paragraphs([text]));
    assert_eq!(links(&doc), vec![(covered.to_string(), href.to_string())]);
}

#[rstest]
#[case("version 2.3 released")]
#[case("call me maybe")]
#[case("x@y")]
#[case("room 101, floor 3")]
fn text_without_patterns_is_unchanged(#[case] text: &str) {
    let doc = Document::from_paragraphs([text]);
    assert_eq!(Reconciler::default().reconcile_all(&doc), Outcome::Unchanged);
}

#[rstest]
#[case("call 555-0100 at http://555-0100.com")]
#[case("jo@example.org.uk www.example.org/jo@example.org")]
#[case("+1 (555) 010-0100 a.io/+15550100 b.io")]
#[case("x.io.y.io jo@a.io@b.io 1-1-1-1-1-1-1-1.com")]
#[case("mail jo@example.org, +44 20 7946 0958 or example.org.")]
fn resolved_targets_never_overlap(#[case] text: &str) {
    let targets = resolve(detect(0, text, &DetectorOptions::default()));
    assert!(!targets.is_empty());
    for (i, a) in targets.iter().enumerate() {
        for b in &targets[i + 1..] {
            assert!(!a.span.intersects(b.span), "{a:?} overlaps {b:?} in {text:?}");
        }
    }
}

#[test]
fn link_without_href_is_removed() {
    let doc = Document::new(vec![Node::paragraph(vec![
        Node::text("plain "),
        Node::marked("words", [Mark::new(MarkKind::Link)]),
    ])]);
    let outcome = Reconciler::default().reconcile_all(&doc);
    assert_eq!(
        outcome.operations(),
        &[Operation::RemoveMark {
            span: Span::new(6, 11),
            kind: MarkKind::Link,
        }]
    );

    let doc = outcome.into_document(doc);
    assert!(TextWalker::new(&doc).all(|run| !run.marks.contains(MarkKind::Link)));
    invariants::check_reconciled(&doc, &ReconcileOptions::default());
}

#[test]
fn link_across_formatting_is_one_target() {
    let doc = reconciled(&from_markdown("mail **jo**@example.org"));
    assert_eq!(
        links(&doc),
        vec![(
            "jo@example.org".to_string(),
            "mailto:jo@example.org".to_string()
        )]
    );
    invariants::check_reconciled(&doc, &ReconcileOptions::default());
}

#[test]
fn links_never_span_blocks() {
    let doc = reconciled(&Document::from_paragraphs(["example", ".com"]));
    assert_eq!(links(&doc), vec![]);
}

#[test]
fn underline_follows_span_color() {
    let doc = Document::new(vec![Node::paragraph(vec![Node::marked(
        "tinted",
        [Mark::styled("color: #112233"), Mark::underline_colored("#ffffff")],
    )])]);
    let once = reconciled(&doc);
    let run = TextWalker::new(&once).next().unwrap();
    assert_eq!(
        run.marks.get(MarkKind::Underline),
        Some(&Mark::underline_colored("#112233"))
    );
    invariants::check_reconciled(&once, &ReconcileOptions::default());
}

#[test]
fn stale_link_is_removed_after_an_edit() {
    let mut session = Session::new(
        Document::from_paragraphs(["visit example.com"]),
        ReconcileOptions::default(),
    );
    assert_eq!(links(session.document()).len(), 1);

    let commit = session
        .commit(&Edit::Delete {
            span: Span::new(13, 17),
        })
        .unwrap();
    assert_eq!(
        commit.operations,
        vec![Operation::RemoveMark {
            span: Span::new(6, 13),
            kind: MarkKind::Link,
        }]
    );
    assert_eq!(links(session.document()), vec![]);
}

#[test]
fn deleting_linked_text_deletes_the_link() {
    let mut session = Session::new(
        Document::from_paragraphs(["visit example.com"]),
        ReconcileOptions::default(),
    );
    let commit = session
        .commit(&Edit::Delete {
            span: Span::new(6, 17),
        })
        .unwrap();

    assert!(commit.changed);
    assert!(commit.operations.is_empty());
    assert_eq!(session.document().text(), "visit ");
    assert_eq!(links(session.document()), vec![]);
}

#[test]
fn edited_blocks_scope_matches_full_scan() {
    let start = Document::from_paragraphs(["first a.io", "second"]);
    let edits = [
        Edit::InsertText {
            at: 16,
            text: " b.io".into(),
        },
        Edit::Delete {
            span: Span::new(6, 10),
        },
        Edit::InsertText {
            at: 6,
            text: "c.org".into(),
        },
    ];

    let mut full = Session::new(start.clone(), ReconcileOptions::default());
    let mut scoped = Session::new(
        start,
        ReconcileOptions {
            scan_scope: ScanScope::EditedBlocks,
            ..ReconcileOptions::default()
        },
    );
    for edit in &edits {
        full.commit(edit).unwrap();
        scoped.commit(edit).unwrap();
        assert_eq!(scoped.document(), full.document());
    }

    assert_eq!(
        links(full.document()),
        vec![
            ("c.org".to_string(), "https://c.org".to_string()),
            ("b.io".to_string(), "https://b.io".to_string()),
        ]
    );
}

#[test]
fn fixture_mixed_links() {
    let doc = fixture("mixed_links");
    let outcome = Reconciler::default().reconcile_all(&doc);
    insta::assert_snapshot!(operations(&outcome), @r"
    add link(href=tel:5550100) @5..13
    add link(href=http://555-0100.com) @17..36
    add link(href=mailto:jo@example.org) @45..59
    remove link @68..76
    add link(href=https://www.example.com/docs) @82..102
    ");

    let doc = outcome.into_document(doc);
    insta::assert_snapshot!(doc.to_string(), @r#"
    paragraph
      "Call " @0..5
      "555-0100" @5..13 [link(href=tel:5550100)]
      " at " @13..17
      "http://555-0100.com" @17..36 [link(href=http://555-0100.com)]
      " or mail " @36..45
      "jo@example.org" @45..59 [link(href=mailto:jo@example.org)]
      "." @59..60
    paragraph
      "See the old link near " @60..82
      "www.example.com/docs" @82..102 [link(href=https://www.example.com/docs)]
      "." @102..103
    "#);
    invariants::check_reconciled(&doc, &ReconcileOptions::default());
}

#[test]
fn fixture_underline_colors() {
    let doc = fixture("underline_colors");
    let outcome = Reconciler::default().reconcile_all(&doc);
    insta::assert_snapshot!(operations(&outcome), @r"
    remove underline @5..9
    add underline(color=red) @5..9
    ");
    invariants::check_reconciled(&outcome.into_document(doc), &ReconcileOptions::default());
}

#[test]
fn fixture_consistent_document_is_unchanged() {
    let doc = fixture("consistent");
    invariants::check_reconciled(&doc, &ReconcileOptions::default());
}
