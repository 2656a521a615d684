//! # pkgstat-console
//!
//! Prefixed, width-aware messages on stderr for *pkgstat*.
//!
//! - `writer`: a terminal writer that right-aligns a short prefix (`INFO`, `ERROR`, ...)
//!   and wraps the message to the terminal width.
//! - `print`: a `tracing_subscriber` layer rendering events through the writer, plus the
//!   `due_to!` macro for error causes.

pub mod print;
pub mod writer;

pub use console;
pub use print::PkgstatLayer;

use writer::Writer;

pub static WRITER: std::sync::LazyLock<Writer> = std::sync::LazyLock::new(Writer::default);
