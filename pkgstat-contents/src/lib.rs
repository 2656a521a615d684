//! # pkgstat-contents
//!
//! The `pkgstat-contents` crate turns a compressed APT `Contents-<arch>.gz` index into a
//! ranking of the packages that own the most files.
//!
//! ## Modules
//!
//! - `decompress`: Inflate a gzip payload into the index text.
//! - `parser`: Walk the index line by line and count file ownership per package.
//! - `rank`: Order the counts (descending count, then package name) and truncate.
//! - `report`: Render ranked entries as numbered lines into any writer.
//! - `arch`: Discover the architectures a repository publishes Contents files for.
//!
//! ## Example
//!
//! ```
//! use pkgstat_contents::{parser::parse, rank::rank};
//!
//! let index = parse("bin/foo section1/pkgA\nbin/bar section1/pkgA,extra/section2/pkgB\n");
//! let top = rank(&index, 10);
//!
//! assert_eq!(top[0].to_string(), "1. section1/pkgA 2");
//! assert_eq!(top[1].to_string(), "2. section2/pkgB 1");
//! ```

pub mod arch;
pub mod decompress;
pub mod parser;
pub mod rank;
pub mod report;

pub use arch::{list_architectures, ArchitectureSource, IndexPageScraper};
pub use decompress::decompress;
pub use parser::{parse, FileCountIndex};
pub use rank::{rank, RankedEntry};

#[derive(Debug, thiserror::Error)]
pub enum ContentsError {
    #[error("Contents data is not a valid gzip stream: {0}")]
    Format(std::io::Error),
    #[error("Contents data is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub type ContentsResult<T> = std::result::Result<T, ContentsError>;
