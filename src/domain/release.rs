use std::{cmp::Ordering, fmt, hash::Hash, hash::Hasher, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A two-part numeric release version, e.g. `22.04`.
///
/// Versions order by `(major, minor)` interpreted numerically, so `9.10`
/// sorts before `22.04` even though it is lexicographically greater.
///
/// The canonical rendering zero-pads the minor component to two digits,
/// which matches the release branch naming the engine resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u16,
    minor: u16,
}

impl Version {
    /// Creates a version from its numeric components.
    #[must_use]
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Returns the major component.
    #[must_use]
    pub const fn major(self) -> u16 {
        self.major
    }

    /// Returns the minor component.
    #[must_use]
    pub const fn minor(self) -> u16 {
        self.minor
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

/// Errors that can occur when parsing a [`Version`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VersionError {
    /// The token is not of the form `MAJOR.MINOR`.
    #[error("invalid release version '{0}': expected MAJOR.MINOR")]
    Syntax(String),

    /// One of the components is not a number.
    #[error("invalid release version '{0}': '{1}' is not a number")]
    Number(String, String),
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| VersionError::Syntax(s.to_string()))?;

        if major.is_empty() || minor.is_empty() || minor.contains('.') {
            return Err(VersionError::Syntax(s.to_string()));
        }

        let parse = |part: &str| {
            part.parse::<u16>()
                .map_err(|_| VersionError::Number(s.to_string(), part.to_string()))
        };

        Ok(Self {
            major: parse(major)?,
            minor: parse(minor)?,
        })
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// An ordered point in the product's release line.
///
/// Identity is the `(version, codename)` pair; two releases are equal iff
/// both fields match. Ordering follows the numeric version alone (the
/// codename only breaks ties so that ordering stays consistent with
/// equality). The optional end-of-life date carries maintenance metadata
/// and takes no part in identity or ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    version: Version,
    codename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_of_life: Option<NaiveDate>,
}

impl Release {
    /// Creates a release with no end-of-life date.
    #[must_use]
    pub fn new(version: Version, codename: impl Into<String>) -> Self {
        Self {
            version,
            codename: codename.into(),
            end_of_life: None,
        }
    }

    /// Sets the end-of-life date.
    #[must_use]
    pub const fn with_end_of_life(mut self, date: NaiveDate) -> Self {
        self.end_of_life = Some(date);
        self
    }

    /// Returns the numeric version.
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Returns the human codename, e.g. `jammy`.
    #[must_use]
    pub fn codename(&self) -> &str {
        &self.codename
    }

    /// Returns the end-of-life date, if known.
    #[must_use]
    pub const fn end_of_life(&self) -> Option<NaiveDate> {
        self.end_of_life
    }

    /// Whether the release is still maintained on the given day.
    ///
    /// A release without an end-of-life date is treated as maintained.
    #[must_use]
    pub fn is_supported(&self, today: NaiveDate) -> bool {
        self.end_of_life.is_none_or(|eol| eol >= today)
    }
}

impl PartialEq for Release {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.codename == other.codename
    }
}

impl Eq for Release {}

impl Hash for Release {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version.hash(state);
        self.codename.hash(state);
    }
}

impl PartialOrd for Release {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Release {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version
            .cmp(&other.version)
            .then_with(|| self.codename.cmp(&other.codename))
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.version, self.codename)
    }
}

/// The explicit, ordered collection of known releases.
///
/// Every resolution of a branch name to a release goes through a catalog
/// value passed in by the caller; there is no process-wide lookup table.
/// Construction drops releases whose end-of-life date has passed, so the
/// rest of the pipeline only ever sees supported release lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCatalog {
    /// Sorted ascending by version.
    releases: Vec<Release>,
}

impl ReleaseCatalog {
    /// Builds a catalog from the harvested releases.
    ///
    /// Releases past their end-of-life on `today` are dropped with an info
    /// log. `today` is an explicit argument so that catalog construction
    /// stays referentially transparent.
    #[must_use]
    pub fn new(releases: Vec<Release>, today: NaiveDate) -> Self {
        let (supported, expired): (Vec<_>, Vec<_>) = releases
            .into_iter()
            .partition(|release| release.is_supported(today));

        for release in &expired {
            tracing::info!("release {release} is past end-of-life; ignoring");
        }

        let mut releases = supported;
        releases.sort();
        Self { releases }
    }

    /// Returns the known releases, sorted ascending by version.
    #[must_use]
    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    /// Returns the newest known release, if any.
    #[must_use]
    pub fn newest(&self) -> Option<&Release> {
        self.releases.last()
    }

    /// Returns the releases strictly newer than `release`, in order.
    pub fn future_of<'a>(&'a self, release: &'a Release) -> impl Iterator<Item = &'a Release> {
        self.releases.iter().filter(move |r| *r > release)
    }

    /// Resolves a branch name to a known release.
    ///
    /// The final dash-separated token of the branch name is matched against
    /// the catalog, first as a numeric version (`ubuntu-22.04`, `22.04`) and
    /// then as a codename (`ubuntu-jammy`, `jammy`). Returns `None` when the
    /// branch does not correspond to any known release.
    #[must_use]
    pub fn resolve_branch(&self, branch: &str) -> Option<&Release> {
        let tail = branch.rsplit('-').next().unwrap_or(branch);

        if let Ok(version) = tail.parse::<Version>() {
            return self.releases.iter().find(|r| r.version() == version);
        }

        self.releases.iter().find(|r| r.codename() == tail)
    }
}
