//! Domain models for forward-port tracking.
//!
//! This module contains the immutable value objects the engine operates on:
//! releases and their catalog, changes, the per-release content inventory,
//! and the runtime configuration.

/// Release identifiers, versions and the release catalog.
pub mod release;
pub use release::{Release, ReleaseCatalog, Version, VersionError};

/// Proposed changes and their git references.
pub mod change;
pub use change::{Change, GitRef};

mod inventory;
pub use inventory::{Inventory, SliceSet};

mod config;
pub use config::{Config, ConfigError};
