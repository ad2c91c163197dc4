//! Natural ordering for group labels.
//!
//! Batch labels embed an ordinal ("Batch 7"). Sorting them as plain strings
//! puts "Batch 10" before "Batch 2"; these helpers sort by the embedded
//! number instead. Labels are never modified.

use std::cmp::Ordering;

/// Integer value of the first run of ASCII digits in `label`, `0` if none.
///
/// Saturates at `u64::MAX` on absurdly long digit runs.
///
/// ```rust
/// use engine::normalize::group_rank;
///
/// assert_eq!(group_rank("Batch 12"), 12);
/// assert_eq!(group_rank("2019 batch 3"), 2019);
/// assert_eq!(group_rank("External Sponsors"), 0);
/// ```
pub fn group_rank(label: &str) -> u64 {
    label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .map_while(|c| c.to_digit(10))
        .fold(0u64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u64::from(digit))
        })
}

/// Returns `true` if `label` contains at least one ASCII digit.
pub fn has_rank(label: &str) -> bool {
    label.bytes().any(|b| b.is_ascii_digit())
}

/// Compare by embedded number, then by the label text.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    group_rank(a)
        .cmp(&group_rank(b))
        .then_with(|| a.cmp(b))
}

/// Tie-break used when two groups have the same total.
///
/// Labels with a number come first, ordered by that number; labels without
/// one compare equal so a stable sort keeps their first-seen order.
pub(crate) fn tie_break(a: &str, b: &str) -> Ordering {
    let key = |label: &str| {
        if has_rank(label) {
            (false, group_rank(label))
        } else {
            (true, 0)
        }
    };
    key(a).cmp(&key(b))
}
