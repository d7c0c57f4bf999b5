use std::collections::{BTreeMap, BTreeSet};

use super::release::Release;

/// A set of content-item ("slice") names.
///
/// `BTreeSet` keeps iteration deterministic, which the report relies on.
pub type SliceSet = BTreeSet<String>;

static EMPTY: SliceSet = SliceSet::new();

/// Per-release content and package inventory, harvested externally.
///
/// The engine only reads this. Lookups for a release the inventory does not
/// know degrade to the empty set rather than failing: a release with no
/// known packages is treated as "everything is discontinued there", which
/// errs on the side of not flagging regressions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    slices: BTreeMap<Release, SliceSet>,
    packages: BTreeMap<Release, SliceSet>,
}

impl Inventory {
    /// Builds an inventory from per-release content and package name sets.
    #[must_use]
    pub const fn new(
        slices: BTreeMap<Release, SliceSet>,
        packages: BTreeMap<Release, SliceSet>,
    ) -> Self {
        Self { slices, packages }
    }

    /// The content-item names already present in `release`, independent of
    /// any open change.
    #[must_use]
    pub fn slices(&self, release: &Release) -> &SliceSet {
        self.slices.get(release).unwrap_or(&EMPTY)
    }

    /// The package names known to exist in `release`.
    #[must_use]
    pub fn packages(&self, release: &Release) -> &SliceSet {
        self.packages.get(release).unwrap_or(&EMPTY)
    }
}
