//! The forward-port determination engine.
//!
//! A single forward pass: delta extraction, partitioning by release, the
//! pairwise comparison sweep, and aggregation into per-change verdicts.
//! Everything here is pure and synchronous; the surrounding program hands
//! the engine fully materialized tables and consumes the [`Aggregate`] it
//! returns.

use std::collections::BTreeMap;

use tracing::instrument;

use crate::domain::{Change, Config, Inventory, Release, ReleaseCatalog, SliceSet};

mod delta;
pub use delta::{extract, extract_all};

mod partition;
pub use partition::by_release;

mod comparison;
pub use comparison::Comparison;

mod aggregate;
pub use aggregate::{Aggregate, ReleaseSlot};

/// Errors that abort a whole engine run before any output is produced.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    /// The head-content and base-content tables cover different change
    /// sets. This means the external collaborators that harvested them are
    /// out of sync, and no partial result should be produced.
    #[error(
        "head and base content tables are out of sync \
         (changes missing a head set: {missing_heads:?}; \
         missing a base set: {missing_bases:?}; \
         table keys only on one side: {unpaired:?})"
    )]
    TableMismatch {
        /// Change numbers with no entry in the head-content table.
        missing_heads: Vec<u64>,
        /// Change numbers with no entry in the base-content table.
        missing_bases: Vec<u64>,
        /// Table keys present in exactly one of the two tables.
        unpaired: Vec<u64>,
    },
}

/// Runs the whole pipeline over materialized input tables.
///
/// `heads` and `bases` map change numbers to the content-item names present
/// at the change's tip and merge base respectively; both tables must cover
/// every change.
///
/// # Errors
///
/// Returns [`EngineError::TableMismatch`] when the head and base tables do
/// not cover the same changes.
#[instrument(skip_all, fields(changes = changes.len()))]
pub fn run(
    catalog: &ReleaseCatalog,
    changes: &[Change],
    heads: &BTreeMap<u64, SliceSet>,
    bases: &BTreeMap<u64, SliceSet>,
    inventory: &Inventory,
    config: &Config,
) -> Result<Aggregate, EngineError> {
    check_tables(changes, heads, bases)?;

    let deltas = extract_all(changes, heads, bases, config.diagnostic_budget());
    let partition = by_release(catalog, changes);
    let comparisons = compare_all(catalog, &partition, &deltas, inventory);

    Ok(Aggregate::new(
        catalog,
        &partition,
        &deltas,
        inventory,
        comparisons,
    ))
}

/// Produces every valid comparison: each change evaluated against each
/// change targeting a strictly later release.
///
/// All strictly-later releases are visited, not just the immediately next
/// one: a change may skip an intermediate release line entirely, and each
/// future release gets an independent verdict.
///
/// Content already present in the future release's inventory is covered by
/// definition and is removed from the older change's new set before the
/// pair is compared; content whose backing package no longer exists in the
/// future release is recorded as discontinued there.
#[must_use]
pub fn compare_all(
    catalog: &ReleaseCatalog,
    partition: &BTreeMap<Release, Vec<Change>>,
    deltas: &BTreeMap<u64, SliceSet>,
    inventory: &Inventory,
) -> Vec<Comparison> {
    let mut comparisons = Vec::new();

    for (release, changes) in partition {
        for change in changes {
            let new = deltas.get(&change.number).cloned().unwrap_or_default();

            for future in catalog.future_of(release) {
                let candidates = partition.get(future).map_or(&[][..], Vec::as_slice);
                if candidates.is_empty() {
                    continue;
                }

                let (slices, discontinued) = net_of_release(&new, inventory, future);

                for candidate in candidates {
                    let new_future = deltas.get(&candidate.number).cloned().unwrap_or_default();
                    comparisons.push(Comparison::new(
                        change,
                        release,
                        slices.clone(),
                        candidate,
                        future,
                        new_future,
                        discontinued.clone(),
                    ));
                }
            }
        }
    }

    comparisons
}

/// Evaluates a change's new content against one future release: removes
/// what that release already ships, and splits off what is discontinued
/// there (no backing package in its inventory).
fn net_of_release(
    new: &SliceSet,
    inventory: &Inventory,
    future: &Release,
) -> (SliceSet, SliceSet) {
    let slices = new - inventory.slices(future);
    let discontinued = &slices - inventory.packages(future);
    (slices, discontinued)
}

fn check_tables(
    changes: &[Change],
    heads: &BTreeMap<u64, SliceSet>,
    bases: &BTreeMap<u64, SliceSet>,
) -> Result<(), EngineError> {
    let missing_heads: Vec<u64> = changes
        .iter()
        .map(|c| c.number)
        .filter(|n| !heads.contains_key(n))
        .collect();
    let missing_bases: Vec<u64> = changes
        .iter()
        .map(|c| c.number)
        .filter(|n| !bases.contains_key(n))
        .collect();
    let unpaired: Vec<u64> = heads
        .keys()
        .filter(|n| !bases.contains_key(n))
        .chain(bases.keys().filter(|n| !heads.contains_key(n)))
        .copied()
        .collect();

    if missing_heads.is_empty() && missing_bases.is_empty() && unpaired.is_empty() {
        Ok(())
    } else {
        Err(EngineError::TableMismatch {
            missing_heads,
            missing_bases,
            unpaired,
        })
    }
}
