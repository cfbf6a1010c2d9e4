use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The type of an annotation attached to a text node.
///
/// Ordering is only used to keep [`Marks`] sorted; it carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkKind {
    Bold,
    Italic,
    Code,
    Strike,
    Subscript,
    Superscript,
    Underline,
    /// Inline style carrier; its `style` attribute holds CSS declarations.
    Span,
    /// Hyperlink; its `href` attribute holds the target.
    Link,
}

impl MarkKind {
    pub fn name(self) -> &'static str {
        match self {
            MarkKind::Bold => "bold",
            MarkKind::Italic => "italic",
            MarkKind::Code => "code",
            MarkKind::Strike => "strike",
            MarkKind::Subscript => "subscript",
            MarkKind::Superscript => "superscript",
            MarkKind::Underline => "underline",
            MarkKind::Span => "span",
            MarkKind::Link => "link",
        }
    }
}

/// A typed annotation with string attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mark {
    pub kind: MarkKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
}

impl Mark {
    pub const HREF: &'static str = "href";
    pub const COLOR: &'static str = "color";
    pub const STYLE: &'static str = "style";

    pub fn new(kind: MarkKind) -> Self {
        Self {
            kind,
            attrs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn link(href: impl Into<String>) -> Self {
        Self::new(MarkKind::Link).with_attr(Self::HREF, href)
    }

    pub fn underline() -> Self {
        Self::new(MarkKind::Underline)
    }

    pub fn underline_colored(color: impl Into<String>) -> Self {
        Self::underline().with_attr(Self::COLOR, color)
    }

    pub fn styled(style: impl Into<String>) -> Self {
        Self::new(MarkKind::Span).with_attr(Self::STYLE, style)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// The link target, for `Link` marks that carry one.
    pub fn href(&self) -> Option<&str> {
        match self.kind {
            MarkKind::Link => self.attr(Self::HREF),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.name())?;
        if !self.attrs.is_empty() {
            let attrs = self
                .attrs
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "({attrs})")?;
        }
        Ok(())
    }
}

/// The set of marks on one text node: at most one mark per [`MarkKind`],
/// kept sorted by kind so equal sets compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marks(Vec<Mark>);

impl Marks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: MarkKind) -> Option<&Mark> {
        self.position(kind).ok().map(|i| &self.0[i])
    }

    pub fn contains(&self, kind: MarkKind) -> bool {
        self.position(kind).is_ok()
    }

    /// Inserts `mark`, returning the mark of the same kind it replaced.
    pub fn insert(&mut self, mark: Mark) -> Option<Mark> {
        match self.position(mark.kind) {
            Ok(i) => Some(std::mem::replace(&mut self.0[i], mark)),
            Err(i) => {
                self.0.insert(i, mark);
                None
            }
        }
    }

    pub fn remove(&mut self, kind: MarkKind) -> Option<Mark> {
        self.position(kind).ok().map(|i| self.0.remove(i))
    }

    /// A copy of this set without any mark of `kind`.
    #[must_use]
    pub fn without(&self, kind: MarkKind) -> Marks {
        let mut marks = self.clone();
        marks.remove(kind);
        marks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mark> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn position(&self, kind: MarkKind) -> Result<usize, usize> {
        self.0.binary_search_by(|m| m.kind.cmp(&kind))
    }
}

impl FromIterator<Mark> for Marks {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        let mut marks = Marks::new();
        for mark in iter {
            marks.insert(mark);
        }
        marks
    }
}

impl fmt::Display for Marks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.0.iter().map(Mark::to_string).collect::<Vec<_>>();
        write!(f, "[{}]", rendered.join(", "))
    }
}
