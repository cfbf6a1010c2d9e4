// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use markup_autolink_engine::{Document, Node};

/// A document of `paragraphs` paragraphs, each with a mix of linkable and
/// plain text.
#[allow(dead_code)]
pub fn generate_document(paragraphs: usize) -> Document {
    let children = (0..paragraphs)
        .map(|i| {
            Node::paragraph(vec![Node::text(format!(
                "Paragraph {i} mentions www.example{i}.com/page, writes to \
                 user{i}@example.org and calls +1 555-010-{:04}. Version 2.{i} \
                 is plain text.",
                i % 10_000
            ))])
        })
        .collect();
    Document::new(children)
}

/// A document of `paragraphs` paragraphs without anything to link.
#[allow(dead_code)]
pub fn generate_plain_document(paragraphs: usize) -> Document {
    let children = (0..paragraphs)
        .map(|i| {
            Node::paragraph(vec![Node::text(format!(
                "Paragraph {i} has some ordinary prose in it, with nothing \
                 that looks like an address."
            ))])
        })
        .collect();
    Document::new(children)
}
