//! Flat-file snapshot input.
//!
//! A snapshot is everything one tracking run needs, harvested externally
//! and written to a single JSON or YAML document: the known releases, the
//! open changes, the per-change content tables and the per-release
//! inventories. Keeping the harvest out of process makes runs cheap to
//! reproduce — rerunning the tracker against a saved snapshot gives the
//! same answer every time.

use std::{collections::BTreeMap, path::Path};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{Change, Inventory, Release, ReleaseCatalog, SliceSet};

/// Errors that can occur when loading a [`Snapshot`].
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The file could not be read.
    #[error("failed to read snapshot file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON for this schema.
    #[error("failed to parse snapshot file: {0}")]
    Json(#[from] serde_json::Error),

    /// The file is not valid YAML for this schema.
    #[error("failed to parse snapshot file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// One run's worth of harvested input, as serialized on disk.
///
/// Inventory maps are keyed by release branch name or version string; keys
/// are resolved against the release catalog when the snapshot is turned
/// into engine inputs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    /// Every release line the snapshot knows about, supported or not.
    pub releases: Vec<Release>,

    /// The open changes under consideration.
    #[serde(default)]
    pub changes: Vec<Change>,

    /// change number → content-item names at the change's tip.
    #[serde(default)]
    pub heads: BTreeMap<u64, SliceSet>,

    /// change number → content-item names at the change's merge base.
    #[serde(default)]
    pub bases: BTreeMap<u64, SliceSet>,

    /// release key → content-item names already present in that release.
    #[serde(default)]
    pub slices: BTreeMap<String, SliceSet>,

    /// release key → package names available in that release.
    #[serde(default)]
    pub packages: BTreeMap<String, SliceSet>,
}

/// A snapshot resolved into the values the engine consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInputs {
    /// The supported releases, end-of-life lines already dropped.
    pub catalog: ReleaseCatalog,

    /// The open changes under consideration.
    pub changes: Vec<Change>,

    /// change number → content at tip.
    pub heads: BTreeMap<u64, SliceSet>,

    /// change number → content at merge base.
    pub bases: BTreeMap<u64, SliceSet>,

    /// Per-release content and package inventory.
    pub inventory: Inventory,
}

impl Snapshot {
    /// Loads a snapshot from a JSON or YAML file.
    ///
    /// Files with a `.yaml` or `.yml` extension parse as YAML; everything
    /// else parses as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path)?;

        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");

        if is_yaml {
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(serde_json::from_str(&content)?)
        }
    }

    /// Resolves the snapshot into engine inputs.
    ///
    /// Builds the release catalog as of `today` (dropping end-of-life
    /// lines) and resolves the inventory's release keys against it.
    /// Inventory keys that match no supported release are dropped with a
    /// warning; they are typically left over from a release that has since
    /// gone end-of-life.
    #[must_use]
    pub fn into_inputs(self, today: NaiveDate) -> RunInputs {
        let catalog = ReleaseCatalog::new(self.releases, today);
        let slices = resolve_keys(self.slices, &catalog, "content");
        let packages = resolve_keys(self.packages, &catalog, "package");

        RunInputs {
            catalog,
            changes: self.changes,
            heads: self.heads,
            bases: self.bases,
            inventory: Inventory::new(slices, packages),
        }
    }
}

fn resolve_keys(
    keyed: BTreeMap<String, SliceSet>,
    catalog: &ReleaseCatalog,
    table: &str,
) -> BTreeMap<Release, SliceSet> {
    let mut resolved = BTreeMap::new();

    for (key, set) in keyed {
        if let Some(release) = catalog.resolve_branch(&key) {
            resolved.insert(release.clone(), set);
        } else {
            tracing::warn!(
                "{table} inventory key '{key}' matches no supported release; dropping"
            );
        }
    }

    resolved
}
