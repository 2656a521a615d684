use std::{cmp::Reverse, collections::BTreeMap, fmt};

use tracing::debug;

use crate::parser::FileCountIndex;

/// A package and its position in the ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub rank: usize,
    pub package: Box<str>,
    pub count: u64,
}

impl fmt::Display for RankedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} {}", self.rank, self.package, self.count)
    }
}

/// Rank packages by number of owned files
///
/// Packages with more files come first; packages with the same number of
/// files are ordered by name. At most `limit` entries are returned, and the
/// last group of equal counts may be cut short.
pub fn rank(index: &FileCountIndex, limit: usize) -> Vec<RankedEntry> {
    let mut by_count: BTreeMap<Reverse<u64>, Vec<&str>> = BTreeMap::new();
    for (package, count) in index.iter() {
        by_count.entry(Reverse(count)).or_default().push(package);
    }

    debug!("{} distinct file counts", by_count.len());

    let mut res = Vec::with_capacity(limit.min(index.len()));

    'outer: for (Reverse(count), mut packages) in by_count {
        packages.sort_unstable();

        for package in packages {
            if res.len() >= limit {
                break 'outer;
            }

            res.push(RankedEntry {
                rank: res.len() + 1,
                package: Box::from(package),
                count,
            });
        }
    }

    res
}
