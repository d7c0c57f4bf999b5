//! Forward-port tracking for release-train changes.
//!
//! Content merged into an older release line must eventually reappear, by
//! name, in every newer still-supported release line. Given a materialized
//! snapshot of the open changes and the per-release content inventory, this
//! crate decides per change whether that has happened yet, and which other
//! changes supply the missing content.
//!
//! The crate is a pure transform: it fetches nothing and mutates nothing.
//! Harvesting the snapshot from a code-review API, a repository clone or a
//! package archive belongs to the surrounding program.

pub mod domain;
pub use domain::{Change, Config, GitRef, Inventory, Release, ReleaseCatalog, SliceSet, Version};

/// The comparison engine and verdict aggregation.
pub mod engine;
pub use engine::{Aggregate, Comparison, EngineError};

pub mod input;
pub use input::{InputError, RunInputs, Snapshot};

pub mod report;
pub use report::{ChangeReport, LabelPlan};
