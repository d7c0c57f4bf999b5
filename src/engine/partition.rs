use std::collections::BTreeMap;

use crate::domain::{Change, Release, ReleaseCatalog};

/// Groups changes by the release they target.
///
/// Every catalog release appears as a key, releases nobody targets
/// included, so downstream consumers never need existence checks. Changes
/// whose base branch does not resolve to a catalog release are dropped
/// with a warning: release support windows move over time, and a change
/// against a branch we no longer (or do not yet) track is not an error.
#[must_use]
pub fn by_release(
    catalog: &ReleaseCatalog,
    changes: &[Change],
) -> BTreeMap<Release, Vec<Change>> {
    let mut partition: BTreeMap<Release, Vec<Change>> = catalog
        .releases()
        .iter()
        .map(|release| (release.clone(), Vec::new()))
        .collect();

    for change in changes {
        if let Some(release) = change.target_release(catalog) {
            partition
                .get_mut(release)
                .expect("catalog releases all have a bucket")
                .push(change.clone());
        } else {
            tracing::warn!(
                "#{}: base branch '{}' does not match a supported release; dropping",
                change.number,
                change.base.ref_name,
            );
        }
    }

    // Stable iteration order within a release.
    for bucket in partition.values_mut() {
        bucket.sort();
    }

    partition
}
