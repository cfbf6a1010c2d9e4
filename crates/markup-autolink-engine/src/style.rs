//! # Style Sync Engine
//!
//! Keeps the Underline mark's `color` attribute in step with the `color:`
//! declaration of a Span mark's inline style on the same text node. Runs
//! independently of link detection.

use std::sync::OnceLock;

use regex::Regex;

use crate::{
    document::{Mark, MarkKind},
    transaction::Operation,
    walker::TextRun,
};

/// Extracts the value of the first `color` declaration in an inline style.
///
/// Only a property named exactly `color` counts (ASCII case-insensitive), so
/// `background-color: red` yields nothing. The value runs to the next `;`
/// and is trimmed; an empty value yields `None`.
pub fn parse_color(style: &str) -> Option<&str> {
    static COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
    let color_regex = COLOR_REGEX.get_or_init(|| {
        Regex::new(r"(?i)(?:^|;)\s*color\s*:([^;]*)").expect("Invalid color regex")
    });

    let value = color_regex.captures(style)?.get(1)?.as_str().trim();
    (!value.is_empty()).then_some(value)
}

/// Operations that recolor underlines whose Span style names a different
/// color. The underline is removed and re-added carrying only the new `color`.
pub fn sync_underline_colors<'a>(runs: impl IntoIterator<Item = TextRun<'a>>) -> Vec<Operation> {
    let mut ops = vec![];
    for run in runs {
        let Some(underline) = run.marks.get(MarkKind::Underline) else {
            continue;
        };
        let Some(color) = run
            .marks
            .get(MarkKind::Span)
            .and_then(|span| span.attr(Mark::STYLE))
            .and_then(parse_color)
        else {
            continue;
        };
        if underline.attr(Mark::COLOR) == Some(color) {
            continue;
        }

        log::trace!("underline at {} recolored to {color}", run.span());
        ops.push(Operation::RemoveMark {
            span: run.span(),
            kind: MarkKind::Underline,
        });
        ops.push(Operation::AddMark {
            span: run.span(),
            mark: Mark::underline_colored(color),
        });
    }
    ops
}
