use std::fmt::{self, Write};

use super::{Document, Node};

/// Readable outline of the tree, one node per line, used by the CLI and by
/// snapshot tests:
///
/// ```text
/// paragraph
///   "see " @0..4
///   "https://example.com" @4..23 [link(href=https://example.com)]
/// ```
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut offset = 0;
        for node in self.children() {
            format_node(f, node, 0, &mut offset)?;
        }
        Ok(())
    }
}

fn format_node(
    out: &mut impl Write,
    node: &Node,
    indent: usize,
    offset: &mut usize,
) -> fmt::Result {
    let prefix = "  ".repeat(indent);
    match node {
        Node::Block { kind, children } => {
            writeln!(out, "{prefix}{}", kind.name())?;
            for child in children {
                format_node(out, child, indent + 1, offset)?;
            }
        }
        Node::Text { text, marks } => {
            let start = *offset;
            *offset += text.len();
            write!(out, "{prefix}{text:?} @{start}..{}", *offset)?;
            if !marks.is_empty() {
                write!(out, " {marks}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}
