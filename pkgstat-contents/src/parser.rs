use std::sync::LazyLock;

use ahash::HashMap;
use regex::Regex;
use tracing::{debug, trace};
use winnow::{combinator::separated, token::take_till, PResult, Parser};

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("FILE.*LOCATION").expect("header pattern is valid"));

/// One line of a Contents index
#[derive(Debug, PartialEq, Eq)]
pub struct ContentsRecord<'a> {
    pub path: &'a str,
    pub packages: Vec<&'a str>,
}

/// Number of files owned by each package, keyed by `section/package`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileCountIndex {
    counts: HashMap<Box<str>, u64>,
}

impl FileCountIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more file for `package`, dropping a leading area component if present
    pub fn record(&mut self, package: &str) {
        self.add(package, 1);
    }

    fn add(&mut self, package: &str, n: u64) {
        let package = normalize_package(package);

        match self.counts.get_mut(package) {
            Some(count) => *count += n,
            None => {
                self.counts.insert(Box::from(package), n);
            }
        }
    }

    pub fn get(&self, package: &str) -> Option<u64> {
        self.counts.get(normalize_package(package)).copied()
    }

    /// Number of distinct packages
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. every (path, package) occurrence seen
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_ref(), *v))
    }
}

impl<'a> FromIterator<(&'a str, u64)> for FileCountIndex {
    fn from_iter<T: IntoIterator<Item = (&'a str, u64)>>(iter: T) -> Self {
        let mut index = FileCountIndex::new();
        for (package, n) in iter {
            index.add(package, n);
        }

        index
    }
}

/// Build a [`FileCountIndex`] from decompressed Contents text
///
/// The parser never rejects a line. A line containing `FILE` followed later by
/// `LOCATION` is taken to be the optional header and skipped, blank lines are
/// ignored, and every other line contributes its last whitespace separated
/// field as the package list.
pub fn parse(input: &str) -> FileCountIndex {
    let mut index = FileCountIndex::new();

    for line in input.lines() {
        if is_header(line) {
            debug!("Skip header line: {line}");
            continue;
        }

        let Some(record) = parse_contents_single_line(line) else {
            continue;
        };

        trace!("path: {}, packages: {:?}", record.path, record.packages);

        for package in record.packages {
            index.record(package);
        }
    }

    debug!(
        "Parsed {} packages owning {} files",
        index.len(),
        index.total()
    );

    index
}

pub fn is_header(line: &str) -> bool {
    HEADER.is_match(line)
}

/// Parse single line Contents
///
/// Returns `None` only for lines without any non-whitespace character.
pub fn parse_contents_single_line(input: &str) -> Option<ContentsRecord<'_>> {
    // https://wiki.debian.org/DebianRepository/Format#A.22Contents.22_indices
    // The last whitespace separates the path from the package list
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let (path, mut pkgs) = match input.rsplit_once(char::is_whitespace) {
        Some((path, pkgs)) => (path.trim_end(), pkgs),
        None => ("", input),
    };

    let field = pkgs;
    let packages = multi_packages(&mut pkgs).unwrap_or_else(|_| vec![field]);

    Some(ContentsRecord { path, packages })
}

/// Drop the deprecated area from `area/section/package`
///
/// Identifiers with two components or fewer are returned unchanged.
pub fn normalize_package(package: &str) -> &str {
    match package.split_once('/') {
        Some((area, rest)) if rest.contains('/') => {
            trace!("Strip area {area} from {package}");
            rest
        }
        _ => package,
    }
}

#[inline]
fn single_package<'a>(input: &mut &'a str) -> PResult<&'a str> {
    take_till(0.., |c: char| c == ',').parse_next(input)
}

#[inline]
fn multi_packages<'a>(input: &mut &'a str) -> PResult<Vec<&'a str>> {
    separated(1.., single_package, ',').parse_next(input)
}

#[test]
fn test_single_line() {
    let s = "etc/dpkg/dpkg.cfg.d/pk4\t\t\t\t\t    universe/utils/pk4\n";
    let res = parse_contents_single_line(s);

    assert_eq!(
        res.unwrap(),
        ContentsRecord {
            path: "etc/dpkg/dpkg.cfg.d/pk4",
            packages: vec!["universe/utils/pk4"]
        }
    )
}

#[test]
fn test_single_line_multi_packages() {
    let s = "usr/lib/libexec   devel/gcc,devel/llvm,gnome/gconf,libs/gdk-pixbuf\n";
    let res = parse_contents_single_line(s);

    assert_eq!(
        res.unwrap().packages,
        vec!["devel/gcc", "devel/llvm", "gnome/gconf", "libs/gdk-pixbuf"]
    )
}

#[test]
fn test_single_line_file_multi_space() {
    let s = "/etc/i have multi space foo/bar/abc\n";
    let res = parse_contents_single_line(s);

    assert_eq!(
        res.unwrap(),
        ContentsRecord {
            path: "/etc/i have multi space",
            packages: vec!["foo/bar/abc"]
        }
    )
}

#[test]
fn test_single_token_line() {
    let res = parse_contents_single_line("  admin/apt  ").unwrap();
    assert_eq!(res.path, "");
    assert_eq!(res.packages, vec!["admin/apt"]);

    assert!(parse_contents_single_line(" \t ").is_none());
}

#[test]
fn test_stray_commas_are_kept() {
    let res = parse_contents_single_line("usr/bin/x admin/a,,admin/b,").unwrap();
    assert_eq!(res.packages, vec!["admin/a", "", "admin/b", ""]);
}

#[test]
fn test_normalize_package() {
    assert_eq!(normalize_package("extra/section2/pkgB"), "section2/pkgB");
    assert_eq!(normalize_package("section2/pkgB"), "section2/pkgB");
    assert_eq!(normalize_package("pkgB"), "pkgB");
    assert_eq!(normalize_package("a/b/c/d"), "b/c/d");
    // already normalized stays normalized
    assert_eq!(
        normalize_package(normalize_package("non-free/libs/libfoo")),
        "libs/libfoo"
    );
}

#[test]
fn test_header_heuristic() {
    assert!(is_header("FILE                                LOCATION"));
    assert!(is_header("xFILEyLOCATIONz"));
    assert!(!is_header("LOCATION FILE"));
    assert!(!is_header("file location"));
    // a data line with both tokens is treated as a header too
    assert!(is_header("usr/share/doc/FILE-LOCATION admin/foo"));
}

#[test]
fn test_parse_example() {
    let s = "FILE        LOCATION\n\
             bin/foo     section1/pkgA\n\
             bin/bar     section1/pkgA,extra/section2/pkgB\n\
             bin/baz     section2/pkgB\n";
    let index = parse(s);

    assert_eq!(index.len(), 2);
    assert_eq!(index.get("section1/pkgA"), Some(2));
    assert_eq!(index.get("section2/pkgB"), Some(2));
    assert_eq!(index.get("extra/section2/pkgB"), Some(2));
}

#[test]
fn test_parse_total_matches_occurrences() {
    let s = "usr/bin/a admin/a\r\n\
             usr/bin/b admin/a,admin/b,main/admin/c\r\n\
             \r\n\
             usr/bin/c admin/c\r\n";
    let index = parse(s);

    assert_eq!(index.total(), 5);
    assert_eq!(index.get("admin/a"), Some(2));
    assert_eq!(index.get("admin/b"), Some(1));
    assert_eq!(index.get("admin/c"), Some(2));
}

#[test]
fn test_parse_empty() {
    assert!(parse("").is_empty());
    assert_eq!(parse("").total(), 0);
}

#[test]
fn test_from_iter_normalizes() {
    let index = FileCountIndex::from_iter([("main/admin/a", 3), ("admin/a", 2), ("b", 1)]);
    assert_eq!(index.get("admin/a"), Some(5));
    assert_eq!(index.len(), 2);
}
