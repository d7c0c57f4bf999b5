//! Serializable views over an [`Aggregate`], ready for terminal tables,
//! JSON output, and label planning.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Change, SliceSet, Version};
use crate::engine::{Aggregate, Comparison, ReleaseSlot};

/// The reportable outcome for a single change.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChangeReport {
    /// Change number.
    pub number: u64,

    /// Change title, verbatim.
    pub title: String,

    /// Link to the change.
    pub url: String,

    /// Branch the change targets.
    pub base_ref: String,

    /// Branch the change comes from.
    pub head_ref: String,

    /// Whether every future release is satisfied.
    pub forward_ported: bool,

    /// Whether the change currently carries the tracking label.
    pub labeled: bool,

    /// Per future release, the numbers of the changes that cover this one.
    pub forward_ports: BTreeMap<Version, Vec<u64>>,

    /// Per-release evidence, populated on request only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<Version, ReleaseDetail>>,
}

/// The evidence behind one future release's verdict.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReleaseDetail {
    /// The change's new content as evaluated against this release.
    pub slices: SliceSet,

    /// Content with no backing package in this release.
    pub discontinued: SliceSet,

    /// Every comparison evaluated against this release.
    pub comparisons: Vec<ComparisonDetail>,
}

/// One comparison, reduced to its derived sets.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ComparisonDetail {
    /// Number of the newer, potentially covering change.
    pub newer: u64,

    /// Whether the newer change fully covers the older one.
    pub forward_ported: bool,

    /// Content the newer change fails to cover.
    pub missing: SliceSet,

    /// Content both changes introduce.
    pub overlap: SliceSet,
}

impl ComparisonDetail {
    fn of(comparison: &Comparison) -> Self {
        Self {
            newer: comparison.newer_number(),
            forward_ported: comparison.is_forward_ported(),
            missing: comparison.missing(),
            overlap: comparison.overlap(),
        }
    }
}

impl ReleaseDetail {
    fn of(slot: &ReleaseSlot) -> Self {
        Self {
            slices: slot.slices().clone(),
            discontinued: slot.discontinued().clone(),
            comparisons: slot.comparisons().iter().map(ComparisonDetail::of).collect(),
        }
    }
}

/// Builds one report per change, sorted by change number.
///
/// Changes absent from the aggregate (those dropped during partitioning)
/// are skipped. With `detail` set, each report carries the full
/// per-release evidence behind its verdict.
#[must_use]
pub fn build(changes: &[Change], aggregate: &Aggregate, detail: bool) -> Vec<ChangeReport> {
    let mut reports: Vec<ChangeReport> = changes
        .iter()
        .filter(|change| aggregate.contains(change.number))
        .map(|change| {
            let details = detail.then(|| {
                aggregate
                    .slots(change.number)
                    .map(|slots| {
                        slots
                            .iter()
                            .map(|(version, slot)| (*version, ReleaseDetail::of(slot)))
                            .collect()
                    })
                    .unwrap_or_default()
            });

            ChangeReport {
                number: change.number,
                title: change.title.clone(),
                url: change.url.clone(),
                base_ref: change.base.ref_name.clone(),
                head_ref: change.head.ref_name.clone(),
                forward_ported: aggregate.is_forward_ported(change.number),
                labeled: change.labeled,
                forward_ports: aggregate.forward_ports(change.number),
                details,
            }
        })
        .collect();

    reports.sort_by_key(|report| report.number);
    reports.dedup_by_key(|report| report.number);
    reports
}

/// The label updates needed to make the tracked changes match their
/// verdicts.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LabelPlan {
    /// Changes that need the label added: not forward-ported, not labeled.
    pub add_label: Vec<u64>,

    /// Changes that need the label removed: forward-ported but labeled.
    pub remove_label: Vec<u64>,
}

impl LabelPlan {
    /// Whether no updates are needed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add_label.is_empty() && self.remove_label.is_empty()
    }
}

/// Derives the label updates from a set of reports.
#[must_use]
pub fn label_plan(reports: &[ChangeReport]) -> LabelPlan {
    let mut plan = LabelPlan::default();

    for report in reports {
        match (report.forward_ported, report.labeled) {
            (false, false) => plan.add_label.push(report.number),
            (true, true) => plan.remove_label.push(report.number),
            _ => {}
        }
    }

    plan
}
