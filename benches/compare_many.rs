//! This bench exercises the pairwise comparison sweep over a synthetic
//! backlog of changes spread across several release lines.

#![allow(missing_docs)]

use std::collections::BTreeMap;

use chrono::NaiveDate;
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use portside::{
    Change, Config, GitRef, Inventory, Release, ReleaseCatalog, SliceSet, Version, engine,
};

const RELEASES: u16 = 6;
const CHANGES_PER_RELEASE: u64 = 40;
const SLICES_PER_CHANGE: u64 = 8;

fn catalog() -> ReleaseCatalog {
    let releases = (0..RELEASES)
        .map(|i| Release::new(Version::new(20 + 2 * i, 4), format!("release-{i}")))
        .collect();
    ReleaseCatalog::new(releases, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
}

fn change(number: u64, base_branch: &str) -> Change {
    Change {
        number,
        title: format!("change #{number}"),
        author: "bench".to_string(),
        head: GitRef {
            ref_name: format!("topic-{number}"),
            repo_name: "releases".to_string(),
            repo_owner: "bench".to_string(),
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

/// A backlog where consecutive changes share a sliding window of content,
/// so most comparisons partially overlap.
fn backlog() -> (Vec<Change>, BTreeMap<u64, SliceSet>, BTreeMap<u64, SliceSet>) {
    let mut changes = Vec::new();
    let mut heads = BTreeMap::new();
    let mut bases = BTreeMap::new();

    let mut number = 0;
    for release in 0..RELEASES {
        for _ in 0..CHANGES_PER_RELEASE {
            number += 1;
            let branch = format!("ubuntu-{}.04", 20 + 2 * release);
            changes.push(change(number, &branch));

            let head: SliceSet = (number..number + SLICES_PER_CHANGE)
                .map(|i| format!("slice-{i}"))
                .collect();
            heads.insert(number, head);
            bases.insert(number, SliceSet::new());
        }
    }

    (changes, heads, bases)
}

fn compare_many(c: &mut Criterion) {
    let catalog = catalog();
    let inventory = Inventory::default();
    let config = Config::default();

    c.bench_function("compare many", |b| {
        b.iter_batched(
            backlog,
            |(changes, heads, bases)| {
                engine::run(&catalog, &changes, &heads, &bases, &inventory, &config).unwrap();
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, compare_many);
criterion_main!(benches);
