//! Selector child-match decision
//!
//! String-level relationship only: a candidate selector is a child of a
//! parent selector when some part of it textually derives from the parent
//! (`.a` -> `.a .b`, `.a:hover`, `.a > li`, `.a.active`). No specificity
//! or cascade semantics. Malformed input degrades to "no match".

use tracing::instrument;

/// Characters that may follow the parent prefix for the candidate to count
/// as a derivation rather than a different selector (`.a` vs `.ab`).
const DERIVATION_CHARS: [char; 7] = [':', '>', '+', '~', '.', '#', '['];

/// Does `candidate` structurally nest under `parent`?
///
/// Exact equality is not a child match; callers decide separately whether
/// self-matches count.
#[instrument(level = "trace")]
pub fn is_child_selector(parent: &str, candidate: &str) -> bool {
    let parent = parent.trim();
    if parent.is_empty() {
        return false;
    }
    candidate
        .split(',')
        .map(str::trim)
        .any(|part| derives_from(parent, part))
}

fn derives_from(parent: &str, part: &str) -> bool {
    if part == parent || !part.starts_with(parent) {
        return false;
    }
    match part[parent.len()..].chars().next() {
        Some(c) => c.is_whitespace() || DERIVATION_CHARS.contains(&c),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(".a", ".a .b", true)]
    #[case(".a", ".a:hover", true)]
    #[case(".a", ".a > li", true)]
    #[case(".a", ".a.active", true)]
    #[case(".a", ".a[data-x]", true)]
    #[case(".a", ".a", false)]
    #[case(".a", ".ab", false)]
    #[case(".a", ".c", false)]
    #[case(".a", ".c, .a .b", true)]
    #[case(".header", ".header .logo", true)]
    #[case("", ".a", false)]
    #[case(".a", "", false)]
    fn given_selector_pair_when_matching_then_expected(
        #[case] parent: &str,
        #[case] candidate: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(is_child_selector(parent, candidate), expected);
    }
}
