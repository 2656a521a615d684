use std::collections::BTreeMap;

use console::style;
use tracing::{field::Field, Level};
use tracing_subscriber::Layer;

use crate::WRITER;

/// Render a level as the styled prefix printed before each message
pub fn level_prefix(level: Level) -> String {
    match level {
        Level::DEBUG => style("DEBUG").dim().to_string(),
        Level::INFO => style("INFO").blue().bold().to_string(),
        Level::WARN => style("WARNING").yellow().bold().to_string(),
        Level::ERROR => style("ERROR").red().bold().to_string(),
        Level::TRACE => style("TRACE").dim().to_string(),
    }
}

/// PkgstatLayer
///
/// A `tracing_subscriber` layer printing the `message` field of every event to
/// stderr, prefixed by its level.
#[derive(Debug, Default)]
pub struct PkgstatLayer;

impl PkgstatLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for PkgstatLayer
where
    S: tracing::Subscriber,
    S: for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let prefix = level_prefix(*event.metadata().level());

        let mut visitor = Recorder(BTreeMap::new());
        event.record(&mut visitor);

        if let Some(msg) = visitor.0.get("message") {
            WRITER.writeln(&prefix, msg).ok();
        }
    }
}

struct Recorder<'a>(BTreeMap<&'a str, String>);

impl tracing::field::Visit for Recorder<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name(), value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.0.insert(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name(), format!("{value:?}"));
    }
}

/// Print the cause of the previous error
#[macro_export]
macro_rules! due_to {
    ($($arg:tt)+) => {
        $crate::WRITER
            .writeln(
                &$crate::console::style("DUE TO").yellow().bold().to_string(),
                &format!($($arg)+),
            )
            .ok();
    };
}

#[test]
fn test_level_prefix() {
    let plain = |level| console::strip_ansi_codes(&level_prefix(level)).to_string();

    assert_eq!(plain(Level::DEBUG), "DEBUG");
    assert_eq!(plain(Level::INFO), "INFO");
    assert_eq!(plain(Level::WARN), "WARNING");
    assert_eq!(plain(Level::ERROR), "ERROR");
}
