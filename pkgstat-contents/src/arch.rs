use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

// `Contents-udeb-*` indices describe installer packages and are skipped
static CONTENTS_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Contents-[^u].*\.gz").expect("contents file pattern is valid")
});

/// Something that can tell which architectures a repository publishes Contents indices for
pub trait ArchitectureSource {
    /// Architecture tags in the order they appear in `listing`
    fn architectures(&self, listing: &str) -> Vec<String>;
}

/// Scrapes `Contents-<arch>.gz` names out of an HTTP directory index page
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexPageScraper;

impl ArchitectureSource for IndexPageScraper {
    fn architectures(&self, listing: &str) -> Vec<String> {
        let mut res = vec![];

        for line in listing.lines() {
            debug!("Index line: {line}");
            let Some(m) = CONTENTS_FILE.find(line) else {
                continue;
            };

            if let Some(arch) = arch_from_file_name(m.as_str()) {
                debug!("Found architecture {arch} in {}", m.as_str());
                res.push(arch.to_string());
            }
        }

        debug!("Architectures: {res:?}");

        res
    }
}

/// `Contents-amd64.gz">Contents-amd64.gz` -> `amd64`
fn arch_from_file_name(name: &str) -> Option<&str> {
    let name = name.split('"').next().unwrap_or(name);
    name.split(['-', '.']).nth(1)
}

/// List architecture tags found in a directory index page
pub fn list_architectures(listing: &str) -> Vec<String> {
    IndexPageScraper.architectures(listing)
}
