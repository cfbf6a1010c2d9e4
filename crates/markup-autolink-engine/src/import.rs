//! Markdown fixture import.
//!
//! Builds a [`Document`] from Markdown so tests and the CLI can describe
//! documents as text instead of nested constructors. Block structure maps to
//! blocks; emphasis, strong, strikethrough, inline code and links map to
//! marks. Inline `<span style="...">`, `<u>` and `<u color="...">` tags map to
//! Span and Underline marks, which plain Markdown cannot express.
//!
//! This is a loader, not a round-trippable format: anything without a
//! counterpart in the document model (images, rules, tables) is dropped.

use std::sync::OnceLock;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

use crate::document::{BlockKind, Document, Mark, MarkKind, Marks, Node};

/// Parses `content` as Markdown into a normalized document.
pub fn from_markdown(content: &str) -> Document {
    let parser = Parser::new_ext(content, Options::ENABLE_STRIKETHROUGH);
    let mut importer = MarkdownImporter::new();
    for event in parser {
        importer.process_event(event);
    }
    importer.finalize()
}

/// A block under construction.
struct Frame {
    kind: BlockKind,
    children: Vec<Node>,
}

/// Tracks open blocks and active marks while walking pulldown-cmark events.
///
/// Blocks nest the way the events nest, so a plain stack is enough: `Start`
/// pushes a frame and the matching `End` pops it into its parent. Inline
/// formatting works the same way on a separate stack of marks; text events
/// take a snapshot of that stack as their mark set.
struct MarkdownImporter {
    /// Bottom frame collects the top-level nodes.
    frames: Vec<Frame>,
    marks: Vec<Mark>,
}

impl MarkdownImporter {
    fn new() -> Self {
        Self {
            frames: vec![Frame {
                kind: BlockKind::Div,
                children: Vec::new(),
            }],
            marks: Vec::new(),
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.push_text(&text, self.active_marks()),
            Event::Code(code) => {
                let mut marks = self.active_marks();
                marks.insert(Mark::new(MarkKind::Code));
                self.push_text(&code, marks);
            }
            Event::SoftBreak => self.push_text(" ", self.active_marks()),
            Event::HardBreak => self.push_text("\n", self.active_marks()),
            Event::InlineHtml(html) => self.inline_html(&html),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open(BlockKind::Paragraph),
            Tag::Heading { level, .. } => self.open(BlockKind::Heading { level: level as u8 }),
            Tag::BlockQuote(_) => self.open(BlockKind::BlockQuote),
            Tag::List(first) => self.open(BlockKind::List {
                ordered: first.is_some(),
            }),
            Tag::Item => self.open(BlockKind::ListItem),
            Tag::CodeBlock(_) => self.open(BlockKind::CodeBlock),
            Tag::HtmlBlock => self.open(BlockKind::Div),
            Tag::Emphasis => self.marks.push(Mark::new(MarkKind::Italic)),
            Tag::Strong => self.marks.push(Mark::new(MarkKind::Bold)),
            Tag::Strikethrough => self.marks.push(Mark::new(MarkKind::Strike)),
            Tag::Link { dest_url, .. } => self.marks.push(Mark::link(dest_url.to_string())),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::BlockQuote(_)
            | TagEnd::List(_)
            | TagEnd::Item
            | TagEnd::CodeBlock
            | TagEnd::HtmlBlock => self.close(),
            TagEnd::Emphasis => self.pop_mark(MarkKind::Italic),
            TagEnd::Strong => self.pop_mark(MarkKind::Bold),
            TagEnd::Strikethrough => self.pop_mark(MarkKind::Strike),
            TagEnd::Link => self.pop_mark(MarkKind::Link),
            _ => {}
        }
    }

    fn open(&mut self, kind: BlockKind) {
        self.frames.push(Frame {
            kind,
            children: Vec::new(),
        });
    }

    fn close(&mut self) {
        // never pop the root frame
        if self.frames.len() < 2 {
            return;
        }
        if let Some(frame) = self.frames.pop() {
            self.top().children.push(Node::block(frame.kind, frame.children));
        }
    }

    fn top(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    fn push_text(&mut self, text: &str, marks: Marks) {
        // code blocks keep their text verbatim but never carry inline marks
        let marks = match self.frames.last() {
            Some(Frame {
                kind: BlockKind::CodeBlock,
                ..
            }) => Marks::new(),
            _ => marks,
        };
        self.top().children.push(Node::Text {
            text: text.to_string(),
            marks,
        });
    }

    /// The marks currently open; a later mark of a kind replaces an earlier one.
    fn active_marks(&self) -> Marks {
        self.marks.iter().cloned().collect()
    }

    fn pop_mark(&mut self, kind: MarkKind) {
        if let Some(i) = self.marks.iter().rposition(|m| m.kind == kind) {
            self.marks.remove(i);
        }
    }

    fn inline_html(&mut self, html: &str) {
        match parse_tag(html) {
            Some(HtmlTag::Open(mark)) => self.marks.push(mark),
            Some(HtmlTag::Close(kind)) => self.pop_mark(kind),
            None => log::trace!("ignoring inline html {html:?}"),
        }
    }

    fn finalize(mut self) -> Document {
        while self.frames.len() > 1 {
            self.close();
        }
        let root = self.frames.pop().map(|f| f.children).unwrap_or_default();
        Document::new(root)
    }
}

#[derive(Debug, PartialEq)]
enum HtmlTag {
    Open(Mark),
    Close(MarkKind),
}

/// Recognises the `<span>` and `<u>` tags that carry style information.
/// Attribute values are entity-decoded. Self-closing tags wrap no text and
/// yield `None`.
fn parse_tag(html: &str) -> Option<HtmlTag> {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    static ATTR_REGEX: OnceLock<Regex> = OnceLock::new();
    let tag_regex = TAG_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^<(/?)(span|u)\b([^>]*?)(/?)>$").expect("Invalid tag regex")
    });
    let attr_regex = ATTR_REGEX.get_or_init(|| {
        Regex::new(r#"([A-Za-z][A-Za-z0-9-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("Invalid attribute regex")
    });

    let caps = tag_regex.captures(html.trim())?;
    let kind = if caps[2].eq_ignore_ascii_case("span") {
        MarkKind::Span
    } else {
        MarkKind::Underline
    };
    if !caps[1].is_empty() {
        return Some(HtmlTag::Close(kind));
    }
    if !caps[4].is_empty() {
        return None;
    }

    let mut mark = Mark::new(kind);
    for attr in attr_regex.captures_iter(&caps[3]) {
        let value = attr.get(2).or_else(|| attr.get(3)).map_or("", |m| m.as_str());
        mark = mark.with_attr(
            attr[1].to_ascii_lowercase(),
            html_escape::decode_html_entities(value),
        );
    }
    Some(HtmlTag::Open(mark))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::TextWalker;
    use pretty_assertions::assert_eq;

    #[test]
    fn paragraphs_and_inline_marks() {
        let doc = from_markdown("Hello **bold** and *soft*.\n\nSecond `code` here.");
        insta::assert_snapshot!(doc.to_string(), @r#"
        paragraph
          "Hello " @0..6
          "bold" @6..10 [bold]
          " and " @10..15
          "soft" @15..19 [italic]
          "." @19..20
        paragraph
          "Second " @20..27
          "code" @27..31 [code]
          " here." @31..37
        "#);
    }

    #[test]
    fn lists_headings_and_quotes() {
        let doc = from_markdown("# Title\n\n- one\n- two\n\n> quoted");
        insta::assert_snapshot!(doc.to_string(), @r#"
        heading(1)
          "Title" @0..5
        list
          item
            "one" @5..8
          item
            "two" @8..11
        blockquote
          paragraph
            "quoted" @11..17
        "#);
    }

    #[test]
    fn markdown_links_become_link_marks() {
        let doc = from_markdown("see [docs](https://example.com/docs)");
        insta::assert_snapshot!(doc.to_string(), @r#"
        paragraph
          "see " @0..4
          "docs" @4..8 [link(href=https://example.com/docs)]
        "#);
    }

    #[test]
    fn styled_underline_html() {
        let doc = from_markdown(
            r#"pick <span style="color: red"><u color="blue">this</u></span> one"#,
        );
        insta::assert_snapshot!(doc.to_string(), @r#"
        paragraph
          "pick " @0..5
          "this" @5..9 [underline(color=blue), span(style=color: red)]
          " one" @9..13
        "#);
    }

    #[test]
    fn code_block_text_has_no_marks() {
        let doc = from_markdown("```\nx.io\n```");
        insta::assert_snapshot!(doc.to_string(), @r#"
        code
          "x.io\n" @0..5
        "#);
    }

    #[test]
    fn tags_are_parsed_with_decoded_attributes() {
        assert_eq!(
            parse_tag(r#"<span style="color:&#35;f00">"#),
            Some(HtmlTag::Open(Mark::styled("color:#f00")))
        );
        assert_eq!(
            parse_tag("<U color='red'>"),
            Some(HtmlTag::Open(Mark::underline_colored("red")))
        );
        assert_eq!(parse_tag("</span>"), Some(HtmlTag::Close(MarkKind::Span)));
        assert_eq!(parse_tag("<u>"), Some(HtmlTag::Open(Mark::underline())));
        assert_eq!(parse_tag("<b>"), None);
        assert_eq!(parse_tag("<underline>"), None);
    }

    #[test]
    fn self_closing_tags_mark_nothing() {
        assert_eq!(parse_tag("<u/>"), None);
        assert_eq!(parse_tag(r#"<span style="color: red" />"#), None);

        let doc = from_markdown("plain <u/> text and <span/> more");
        assert!(TextWalker::new(&doc).all(|run| run.marks.is_empty()));
        assert_eq!(doc.text(), "plain  text and  more");
    }

    #[test]
    fn unbalanced_close_tags_are_ignored() {
        let doc = from_markdown("a </u> b");
        assert_eq!(doc.text(), "a  b");
    }
}
