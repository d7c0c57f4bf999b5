use crate::domain::{Change, Release, SliceSet, Version};

/// One directed evaluation: does a newer change (targeting a strictly
/// later release) cover the new content of an older change?
///
/// Comparisons are pure values. The constructor captures the three input
/// sets; `missing`, `overlap` and the verdict are derived on demand and
/// never mutate the comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    older: u64,
    newer: u64,
    older_release: Version,
    future_release: Version,
    slices: SliceSet,
    slices_future: SliceSet,
    discontinued: SliceSet,
}

impl Comparison {
    /// Creates a comparison of `older` (targeting `older_release`) against
    /// `newer` (targeting `future_release`).
    ///
    /// `slices` is the older change's new content as evaluated against the
    /// future release, `slices_future` the newer change's new content, and
    /// `discontinued` the part of `slices` with no backing package in the
    /// future release.
    ///
    /// # Panics
    ///
    /// Panics unless `older_release` is strictly before `future_release`.
    /// The comparison sweep can never produce such a pair, so hitting this
    /// assertion is a defect in the caller, not a recoverable condition.
    #[must_use]
    pub fn new(
        older: &Change,
        older_release: &Release,
        slices: SliceSet,
        newer: &Change,
        future_release: &Release,
        slices_future: SliceSet,
        discontinued: SliceSet,
    ) -> Self {
        assert!(
            older_release.version() < future_release.version(),
            "comparison out of order: #{} targets {} which is not before {} (#{})",
            older.number,
            older_release,
            future_release,
            newer.number,
        );

        Self {
            older: older.number,
            newer: newer.number,
            older_release: older_release.version(),
            future_release: future_release.version(),
            slices,
            slices_future,
            discontinued,
        }
    }

    /// Number of the older change under evaluation.
    #[must_use]
    pub const fn older_number(&self) -> u64 {
        self.older
    }

    /// Number of the newer, potentially covering change.
    #[must_use]
    pub const fn newer_number(&self) -> u64 {
        self.newer
    }

    /// Version of the release the older change targets.
    #[must_use]
    pub const fn older_release(&self) -> Version {
        self.older_release
    }

    /// Version of the future release the newer change targets.
    #[must_use]
    pub const fn future_release(&self) -> Version {
        self.future_release
    }

    /// The older change's new content, as evaluated against the future
    /// release.
    #[must_use]
    pub const fn slices(&self) -> &SliceSet {
        &self.slices
    }

    /// The newer change's new content.
    #[must_use]
    pub const fn slices_future(&self) -> &SliceSet {
        &self.slices_future
    }

    /// The part of [`Self::slices`] that is discontinued in the future
    /// release.
    #[must_use]
    pub const fn discontinued(&self) -> &SliceSet {
        &self.discontinued
    }

    /// Content the newer change fails to cover, net of discontinued items.
    ///
    /// Subtracting the discontinued set unconditionally is deliberate:
    /// subtracting an empty set is a no-op, not a special case.
    #[must_use]
    pub fn missing(&self) -> SliceSet {
        &(&self.slices - &self.slices_future) - &self.discontinued
    }

    /// Content both changes introduce.
    #[must_use]
    pub fn overlap(&self) -> SliceSet {
        &self.slices & &self.slices_future
    }

    /// Whether the newer change fully covers the older one.
    #[must_use]
    pub fn is_forward_ported(&self) -> bool {
        self.missing().is_empty()
    }
}
