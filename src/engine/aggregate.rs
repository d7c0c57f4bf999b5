use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Change, Inventory, Release, ReleaseCatalog, SliceSet, Version};

use super::Comparison;

/// All evidence gathered for one change against one future release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseSlot {
    comparisons: Vec<Comparison>,
    slices: SliceSet,
    discontinued: SliceSet,
}

impl ReleaseSlot {
    /// The comparisons against changes targeting this release. Empty when
    /// nobody targets the release yet.
    #[must_use]
    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    /// The change's new content as evaluated against this release (items
    /// the release already ships are excluded).
    #[must_use]
    pub const fn slices(&self) -> &SliceSet {
        &self.slices
    }

    /// The part of [`Self::slices`] with no backing package in this
    /// release.
    #[must_use]
    pub const fn discontinued(&self) -> &SliceSet {
        &self.discontinued
    }

    /// The content that still needs a forward port into this release:
    /// whatever is neither shipped nor discontinued there.
    #[must_use]
    pub fn required(&self) -> SliceSet {
        &self.slices - &self.discontinued
    }

    /// Sorted numbers of the changes that fully cover this one here.
    #[must_use]
    pub fn covering(&self) -> Vec<u64> {
        let mut numbers: Vec<u64> = self
            .comparisons
            .iter()
            .filter(|c| c.is_forward_ported())
            .map(Comparison::newer_number)
            .collect();
        numbers.sort_unstable();
        numbers.dedup();
        numbers
    }

    /// Whether this release is satisfied: either nothing is required here,
    /// or at least one change covers everything that is.
    #[must_use]
    pub fn is_forward_ported(&self) -> bool {
        self.required().is_empty() || self.comparisons.iter().any(Comparison::is_forward_ported)
    }
}

/// The aggregated outcome of a comparison sweep: per change, per future
/// release, the comparisons that landed there and the derived verdicts.
///
/// Every change that has any future release appears in the grouping, and
/// every one of its future releases appears as a slot — an empty slot,
/// never a missing key — so consumers need no existence checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    /// Numbers of every change that survived partitioning.
    members: BTreeSet<u64>,

    /// Members whose extracted delta was empty.
    empty_deltas: BTreeSet<u64>,

    /// change number → future release version → slot.
    grouped: BTreeMap<u64, BTreeMap<Version, ReleaseSlot>>,
}

impl Aggregate {
    /// Distributes the comparisons into per-(change, future release)
    /// slots and precomputes what each slot requires.
    #[must_use]
    pub fn new(
        catalog: &ReleaseCatalog,
        partition: &BTreeMap<Release, Vec<Change>>,
        deltas: &BTreeMap<u64, SliceSet>,
        inventory: &Inventory,
        comparisons: Vec<Comparison>,
    ) -> Self {
        let mut members = BTreeSet::new();
        let mut empty_deltas = BTreeSet::new();
        let mut grouped: BTreeMap<u64, BTreeMap<Version, ReleaseSlot>> = BTreeMap::new();

        for (release, changes) in partition {
            for change in changes {
                members.insert(change.number);

                let new = deltas.get(&change.number).cloned().unwrap_or_default();
                if new.is_empty() {
                    empty_deltas.insert(change.number);
                }

                let slots: BTreeMap<Version, ReleaseSlot> = catalog
                    .future_of(release)
                    .map(|future| {
                        let (slices, discontinued) =
                            super::net_of_release(&new, inventory, future);
                        (
                            future.version(),
                            ReleaseSlot {
                                comparisons: Vec::new(),
                                slices,
                                discontinued,
                            },
                        )
                    })
                    .collect();

                if !slots.is_empty() {
                    grouped.insert(change.number, slots);
                }
            }
        }

        for comparison in comparisons {
            let slot = grouped
                .get_mut(&comparison.older_number())
                .and_then(|slots| slots.get_mut(&comparison.future_release()));
            debug_assert!(slot.is_some(), "comparison outside the partition");
            if let Some(slot) = slot {
                slot.comparisons.push(comparison);
            }
        }

        Self {
            members,
            empty_deltas,
            grouped,
        }
    }

    /// Whether the change survived partitioning and is part of this
    /// aggregate.
    #[must_use]
    pub fn contains(&self, number: u64) -> bool {
        self.members.contains(&number)
    }

    /// The slots for a change, keyed by future release version.
    ///
    /// `None` for changes targeting the newest known release — they have
    /// no future release to port to.
    #[must_use]
    pub fn slots(&self, number: u64) -> Option<&BTreeMap<Version, ReleaseSlot>> {
        self.grouped.get(&number)
    }

    /// Per future release, the sorted numbers of the changes covering this
    /// one. Empty map when no future release exists.
    #[must_use]
    pub fn forward_ports(&self, number: u64) -> BTreeMap<Version, Vec<u64>> {
        self.grouped.get(&number).map_or_else(BTreeMap::new, |slots| {
            slots
                .iter()
                .map(|(version, slot)| (*version, slot.covering()))
                .collect()
        })
    }

    /// The overall verdict for one change.
    ///
    /// A change with an empty delta is vacuously forward-ported, as is a
    /// change with no future release. Otherwise every future release slot
    /// must be satisfied.
    #[must_use]
    pub fn is_forward_ported(&self, number: u64) -> bool {
        if self.empty_deltas.contains(&number) {
            return true;
        }

        self.grouped
            .get(&number)
            .is_none_or(|slots| slots.values().all(ReleaseSlot::is_forward_ported))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::GitRef;
    use crate::engine::{by_release, compare_all};

    fn names(items: &[&str]) -> SliceSet {
        items.iter().map(ToString::to_string).collect()
    }

    fn change(number: u64, base_branch: &str) -> Change {
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
                ref_name: base_branch.to_string(),
                repo_name: "releases".to_string(),
                repo_owner: "upstream".to_string(),
            },
            labeled: false,
            url: format!("https://example.com/pulls/{number}"),
        }
    }

    fn catalog() -> ReleaseCatalog {
        ReleaseCatalog::new(
            vec![
                Release::new(Version::new(20, 4), "focal"),
                Release::new(Version::new(22, 4), "jammy"),
                Release::new(Version::new(24, 4), "noble"),
            ],
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        )
    }

    fn aggregate(specs: &[(u64, &str, &[&str])], inventory: &Inventory) -> Aggregate {
        let catalog = catalog();
        let changes: Vec<Change> = specs.iter().map(|(n, b, _)| change(*n, b)).collect();
        let deltas: BTreeMap<u64, SliceSet> =
            specs.iter().map(|(n, _, s)| (*n, names(s))).collect();
        let partition = by_release(&catalog, &changes);
        let comparisons = compare_all(&catalog, &partition, &deltas, inventory);
        Aggregate::new(&catalog, &partition, &deltas, inventory, comparisons)
    }

    fn packages_everywhere(items: &[&str]) -> Inventory {
        let packages = catalog()
            .releases()
            .iter()
            .map(|r| (r.clone(), names(items)))
            .collect();
        Inventory::new(BTreeMap::new(), packages)
    }

    #[test]
    fn every_future_release_gets_a_slot_even_without_candidates() {
        let inventory = packages_everywhere(&["foo"]);
        let aggregate = aggregate(&[(1, "ubuntu-20.04", &["foo"])], &inventory);

        let slots = aggregate.slots(1).unwrap();
        let versions: Vec<String> = slots.keys().map(ToString::to_string).collect();
        assert_eq!(versions, ["22.04", "24.04"]);
        assert!(slots.values().all(|slot| slot.comparisons().is_empty()));
    }

    #[test]
    fn newest_release_changes_have_no_slots() {
        let inventory = packages_everywhere(&["foo"]);
        let aggregate = aggregate(&[(1, "ubuntu-24.04", &["foo"])], &inventory);

        assert!(aggregate.contains(1));
        assert!(aggregate.slots(1).is_none());
        assert!(aggregate.is_forward_ported(1));
    }

    #[test]
    fn an_empty_slot_with_required_content_fails() {
        let inventory = packages_everywhere(&["foo"]);
        let aggregate = aggregate(&[(1, "ubuntu-20.04", &["foo"])], &inventory);

        let slots = aggregate.slots(1).unwrap();
        assert!(slots.values().all(|slot| !slot.is_forward_ported()));
        assert!(!aggregate.is_forward_ported(1));
    }

    #[test]
    fn covering_lists_are_sorted_by_number() {
        let inventory = packages_everywhere(&["foo"]);
        let aggregate = aggregate(
            &[
                (1, "ubuntu-20.04", &["foo"]),
                (31, "ubuntu-22.04", &["foo"]),
                (4, "ubuntu-22.04", &["foo", "bar"]),
            ],
            &inventory,
        );

        let ports = aggregate.forward_ports(1);
        assert_eq!(ports[&Version::new(22, 4)], vec![4, 31]);
    }

    #[test]
    fn partially_covering_changes_are_not_listed() {
        let inventory = packages_everywhere(&["foo", "bar"]);
        let aggregate = aggregate(
            &[
                (1, "ubuntu-20.04", &["foo", "bar"]),
                (2, "ubuntu-22.04", &["foo"]),
            ],
            &inventory,
        );

        let ports = aggregate.forward_ports(1);
        assert_eq!(ports[&Version::new(22, 4)], Vec::<u64>::new());
        assert!(!aggregate.is_forward_ported(1));
    }

    #[test]
    fn slot_required_excludes_discontinued_content() {
        let slot = ReleaseSlot {
            comparisons: Vec::new(),
            slices: names(&["foo", "bar"]),
            discontinued: names(&["bar"]),
        };
        assert_eq!(slot.required(), names(&["foo"]));
        assert!(!slot.is_forward_ported());

        let exempt = ReleaseSlot {
            comparisons: Vec::new(),
            slices: names(&["bar"]),
            discontinued: names(&["bar"]),
        };
        assert!(exempt.is_forward_ported());
    }

    #[test]
    fn empty_delta_beats_unsatisfied_slots() {
        let inventory = packages_everywhere(&["foo"]);
        let aggregate = aggregate(
            &[(1, "ubuntu-20.04", &[]), (2, "ubuntu-20.04", &["foo"])],
            &inventory,
        );

        assert!(aggregate.is_forward_ported(1));
        assert!(!aggregate.is_forward_ported(2));
    }
}
