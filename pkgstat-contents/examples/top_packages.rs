use std::io::stdout;

use pkgstat_contents::{decompress, parse, rank, report::report};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .unwrap_or_else(|| "Contents-amd64.gz".to_string());
    let count = args.next().and_then(|x| x.parse().ok()).unwrap_or(10);

    let data = std::fs::read(path).unwrap();
    let text = decompress(&data).unwrap();
    let index = parse(&text);

    report(&rank(&index, count), stdout().lock()).unwrap();
}
