use std::{
    fmt::Display,
    io::{self, Write},
};

use crate::rank::RankedEntry;

/// Render ranked entries as `<rank>. <package> <count>` lines
pub fn format_report(entries: &[RankedEntry]) -> Vec<String> {
    entries.iter().map(|x| x.to_string()).collect()
}

/// Write ranked entries to `writer`, one line per entry, as they are produced
pub fn report<'a, W, I>(entries: I, mut writer: W) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a RankedEntry>,
{
    for entry in entries {
        writeln!(writer, "{entry}")?;
    }

    writer.flush()
}

/// Write `items` as a 1-indexed list of `<n>. <item>` lines
pub fn numbered_list<W, I, D>(items: I, mut writer: W) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = D>,
    D: Display,
{
    for (i, item) in items.into_iter().enumerate() {
        writeln!(writer, "{}. {item}", i + 1)?;
    }

    writer.flush()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{parser::parse, rank::rank};

    #[test]
    fn test_report_lines() {
        let index = parse("bin/foo section1/pkgA\nbin/bar section1/pkgA,extra/section2/pkgB\nbin/baz section2/pkgB\n");
        let entries = rank(&index, 10);

        assert_eq!(
            format_report(&entries),
            vec!["1. section1/pkgA 2", "2. section2/pkgB 2"]
        );

        let mut buf = vec![];
        report(&entries, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "1. section1/pkgA 2\n2. section2/pkgB 2\n"
        );
    }

    #[test]
    fn test_report_nothing() {
        let entries = rank(&parse("usr/bin/apt admin/apt\n"), 0);
        let mut buf = vec![];
        report(&entries, &mut buf).unwrap();

        assert!(buf.is_empty());
    }

    #[test]
    fn test_numbered_list() {
        let mut buf = vec![];
        numbered_list(["amd64", "arm64", "i386"], &mut buf).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "1. amd64\n2. arm64\n3. i386\n"
        );
    }
}
