use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use super::release::{Release, ReleaseCatalog};

/// A git reference: a branch name plus the repository it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GitRef {
    /// The branch name, e.g. `ubuntu-22.04`.
    #[serde(rename = "ref")]
    pub ref_name: String,

    /// The repository name.
    pub repo_name: String,

    /// The repository owner.
    pub repo_owner: String,
}

/// A proposed change targeting exactly one release branch.
///
/// Identity, equality, hashing and ordering all derive from the change
/// number alone; the remaining fields are descriptive metadata carried
/// through to the report. Changes are immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Change {
    /// The unique identifying number.
    pub number: u64,

    /// The change title.
    pub title: String,

    /// The author's login.
    #[serde(rename = "user")]
    pub author: String,

    /// The proposed tip of the change.
    pub head: GitRef,

    /// The merge base the change applies on top of. The target release is
    /// resolved from this reference's branch name.
    pub base: GitRef,

    /// Whether the change already carries the missing-forward-port label.
    pub labeled: bool,

    /// Canonical URL of the change.
    pub url: String,
}

impl Change {
    /// Resolves the release this change targets.
    ///
    /// Returns `None` when the base branch does not correspond to any
    /// release in the catalog; callers treat that as a non-fatal condition
    /// and drop the change from the run.
    #[must_use]
    pub fn target_release<'a>(&self, catalog: &'a ReleaseCatalog) -> Option<&'a Release> {
        catalog.resolve_branch(&self.base.ref_name)
    }
}

impl PartialEq for Change {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for Change {}

impl Hash for Change {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
    }
}

impl PartialOrd for Change {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Change {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number.cmp(&other.number)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::release::Version;

    fn change(number: u64, base_branch: &str) -> Change {
        Change {
            number,
            title: format!("add slice #{number}"),
            author: "octocat".to_string(),
            head: GitRef {
                ref_name: "feature".to_string(),
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
                Release::new(Version::new(22, 4), "jammy"),
                Release::new(Version::new(24, 4), "noble"),
            ],
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        )
    }

    #[test]
    fn identity_is_the_number() {
        let mut a = change(7, "ubuntu-22.04");
        let b = change(7, "ubuntu-24.04");
        a.title = "different title".to_string();
        assert_eq!(a, b);
    }

    #[test]
    fn ordering_follows_the_number() {
        let mut changes = vec![change(30, "x"), change(2, "y"), change(19, "z")];
        changes.sort();
        let numbers: Vec<_> = changes.iter().map(|c| c.number).collect();
        assert_eq!(numbers, [2, 19, 30]);
    }

    #[test]
    fn target_release_resolves_from_base_branch() {
        let catalog = catalog();
        let target = change(1, "ubuntu-22.04").target_release(&catalog).unwrap();
        assert_eq!(target.codename(), "jammy");
    }

    #[test]
    fn target_release_is_none_for_unknown_branch() {
        let catalog = catalog();
        assert!(change(1, "ubuntu-16.04").target_release(&catalog).is_none());
        assert!(change(2, "main").target_release(&catalog).is_none());
    }

    #[test]
    fn deserializes_review_api_shape() {
        let raw = serde_json::json!({
            "number": 42,
            "title": "chisel: add openssl slice",
            "user": "octocat",
            "head": {"ref": "openssl-slice", "repo_name": "releases", "repo_owner": "octocat"},
            "base": {"ref": "ubuntu-22.04", "repo_name": "releases", "repo_owner": "upstream"},
            "labeled": true,
            "url": "https://example.com/pulls/42"
        });
        let change: Change = serde_json::from_value(raw).unwrap();
        assert_eq!(change.number, 42);
        assert_eq!(change.author, "octocat");
        assert_eq!(change.base.ref_name, "ubuntu-22.04");
        assert!(change.labeled);
    }
}
