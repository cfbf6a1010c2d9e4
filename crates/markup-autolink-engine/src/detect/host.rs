//! Host name validation shared by the URL and email detectors.

/// Shortest accepted top-level label.
pub(crate) const MIN_TLD_LEN: usize = 2;

pub(crate) fn is_host_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'.'
}

/// Length of the longest prefix of `raw` that is a valid host: at least two
/// non-empty dot-separated labels, the last of which is alphabetic and at
/// least [`MIN_TLD_LEN`] long. Trailing dots and hyphens never count.
///
/// Returns `None` when no prefix qualifies, which is how `2.3` or a bare word
/// gets rejected.
pub(crate) fn valid_host_len(raw: &str) -> Option<usize> {
    let host = raw.trim_end_matches(['.', '-']);
    let labels: Vec<&str> = host.split('.').collect();
    let usable = labels
        .iter()
        .position(|label| label.is_empty())
        .unwrap_or(labels.len());

    (1..usable)
        .rev()
        .find(|&k| is_tld(labels[k]))
        .map(|k| labels[..=k].iter().map(|l| l.len()).sum::<usize>() + k)
}

fn is_tld(label: &str) -> bool {
    label.len() >= MIN_TLD_LEN && label.bytes().all(|b| b.is_ascii_alphabetic())
}
