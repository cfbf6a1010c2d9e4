//! # Pattern Matcher
//!
//! Explicit tokenizers that find linkable patterns in a run of text.
//!
//! ## Detectors
//!
//! - **`url`**: optional `http(s)://`, a dotted host ending in an alphabetic
//!   top-level label, optional path
//! - **`email`**: `local@host` with the same host rules
//! - **`phone`**: digits with interleaved separators, enough significant digits
//!
//! Detectors run independently and may report overlapping candidates (a
//! phone-shaped number inside a URL path, the host part of an email address).
//! Choosing between them is the resolver's job; see [`crate::resolve`].
//!
//! All boundary checks use ASCII word characters `[A-Za-z0-9_]`.

pub mod cursor;
pub mod email;
mod host;
pub mod phone;
pub mod url;

use serde::{Deserialize, Serialize};

use crate::document::Span;

/// Which detector produced a candidate.
///
/// Declaration order is conflict priority: `Url` beats `Email` beats `Phone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternKind {
    Url,
    Email,
    Phone,
}

/// A provisional match, before overlap resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute document range of the matched text.
    pub span: Span,
    pub kind: PatternKind,
    /// Link target built from the matched text.
    pub href: String,
}

/// Which detectors run, and how strict the phone detector is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorOptions {
    pub url: bool,
    pub email: bool,
    pub phone: bool,
    /// Minimum number of digits, separators and `+` excluded.
    pub min_phone_digits: usize,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            url: true,
            email: true,
            phone: true,
            min_phone_digits: phone::Phone::DEFAULT_MIN_DIGITS,
        }
    }
}

/// Runs every enabled detector over `text`, which starts at absolute
/// position `base`. Candidates come back grouped by detector in priority order.
pub fn detect(base: usize, text: &str, options: &DetectorOptions) -> Vec<Candidate> {
    let mut out = Vec::new();
    if options.url {
        out.extend(url::find(base, text));
    }
    if options.email {
        out.extend(email::find(base, text));
    }
    if options.phone {
        out.extend(phone::find(base, text, options.min_phone_digits));
    }
    out
}

pub(crate) fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
