use std::collections::BTreeMap;

use crate::domain::{Change, SliceSet};

/// Derives the content a change newly introduces: `head − base`.
///
/// A change that also *removes* content is legitimate but unusual, so the
/// removed names are reported as a warning (truncated to `budget`
/// characters) without affecting the result.
#[must_use]
pub fn extract(change: &Change, head: &SliceSet, base: &SliceSet, budget: usize) -> SliceSet {
    let removed = base - head;
    if !removed.is_empty() {
        tracing::warn!(
            "#{}: removes {} content item(s): {}",
            change.number,
            removed.len(),
            truncated(&removed, budget),
        );
    }

    head - base
}

/// Extracts the delta for every change, keyed by change number.
///
/// Changes with no entry in a table contribute an empty set; the engine
/// validates table coverage before calling this.
#[must_use]
pub fn extract_all(
    changes: &[Change],
    heads: &BTreeMap<u64, SliceSet>,
    bases: &BTreeMap<u64, SliceSet>,
    budget: usize,
) -> BTreeMap<u64, SliceSet> {
    static EMPTY: SliceSet = SliceSet::new();

    changes
        .iter()
        .map(|change| {
            let head = heads.get(&change.number).unwrap_or(&EMPTY);
            let base = bases.get(&change.number).unwrap_or(&EMPTY);
            (change.number, extract(change, head, base, budget))
        })
        .collect()
}

/// Joins the names for display, cutting the list off at `budget` characters.
fn truncated(items: &SliceSet, budget: usize) -> String {
    let joined = items
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    if joined.chars().count() <= budget {
        return joined;
    }

    let mut cut: String = joined.chars().take(budget).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GitRef;

    fn names(items: &[&str]) -> SliceSet {
        items.iter().map(ToString::to_string).collect()
    }

    fn change(number: u64) -> Change {
        Change {
            number,
            title: format!("change #{number}"),
            author: "octocat".to_string(),
            head: GitRef {
                ref_name: format!("topic-{number}"),
                repo_name: "releases".to_string(),
                repo_owner: "octocat".to_string(),
            },
            base: GitRef {
                ref_name: "ubuntu-22.04".to_string(),
                repo_name: "releases".to_string(),
                repo_owner: "upstream".to_string(),
            },
            labeled: false,
            url: format!("https://example.com/pulls/{number}"),
        }
    }

    #[test]
    fn delta_is_head_minus_base() {
        let head = names(&["foo", "bar", "baz"]);
        let base = names(&["bar"]);
        assert_eq!(
            extract(&change(1), &head, &base, 120),
            names(&["foo", "baz"])
        );
    }

    #[test]
    fn removals_do_not_affect_the_delta() {
        let head = names(&["foo"]);
        let base = names(&["foo", "dropped"]);
        assert!(extract(&change(1), &head, &base, 120).is_empty());
    }

    #[test]
    fn identical_sets_yield_an_empty_delta() {
        let set = names(&["foo"]);
        assert!(extract(&change(1), &set, &set, 120).is_empty());
    }

    #[test]
    fn extract_all_covers_every_change() {
        let changes = vec![change(1), change(2)];
        let heads = BTreeMap::from([(1, names(&["foo"])), (2, names(&["bar"]))]);
        let bases = BTreeMap::from([(1, SliceSet::new()), (2, names(&["bar"]))]);

        let deltas = extract_all(&changes, &heads, &bases, 120);
        assert_eq!(deltas[&1], names(&["foo"]));
        assert!(deltas[&2].is_empty());
    }

    #[test]
    fn truncated_respects_the_budget() {
        let items = names(&["alpha", "bravo", "charlie"]);
        assert_eq!(truncated(&items, 120), "alpha, bravo, charlie");
        assert_eq!(truncated(&items, 12), "alpha, bravo…");
    }

    #[test]
    fn truncated_cuts_on_character_boundaries() {
        let items = names(&["héllo", "wörld"]);
        let cut = truncated(&items, 7);
        assert_eq!(cut, "héllo, …");
    }
}
