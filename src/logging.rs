//! # Log Output
//!
//! The benchmark reports its results through `tracing` at info level, so the
//! log stream doubles as the result table. [`BenchFormatter`] keeps those
//! lines bare and only decorates the diagnostic ones:
//!
//! | Level        | Line shape                       | Color  |
//! |--------------|----------------------------------|--------|
//! | info         | `<message>`                      | plain  |
//! | warn, error  | `<LEVEL> <message>`              | yellow, red |
//! | debug, trace | `[<module>] <message>`           | blue, purple |
//!
//! `<module>` is the last path segment of the event target, for example
//! `benchmark` for events from `signal_benchmark::benchmark`.

use colored::*;
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Event formatter for the benchmark binary.
pub struct BenchFormatter;

/// Text placed before an event's fields.
fn line_prefix(level: Level, target: &str) -> String {
    match level {
        Level::INFO => String::new(),
        Level::WARN | Level::ERROR => format!("{} ", level),
        Level::DEBUG | Level::TRACE => {
            let module = target.rsplit("::").next().unwrap_or(target);
            format!("[{}] ", module)
        }
    }
}

fn paint(level: Level, line: String) -> ColoredString {
    match level {
        Level::INFO => line.normal(),
        Level::WARN => line.yellow(),
        Level::ERROR => line.red().bold(),
        Level::DEBUG => line.blue(),
        Level::TRACE => line.purple(),
    }
}

impl<S, N> FormatEvent<S, N> for BenchFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let level = *metadata.level();

        let mut line = line_prefix(level, metadata.target());
        ctx.format_fields(Writer::new(&mut line), event)?;

        writeln!(writer, "{}", paint(level, line))
    }
}

/// Install the global subscriber used by the benchmark binary.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects debug over info.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(BenchFormatter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_lines_are_bare() {
        assert_eq!(line_prefix(Level::INFO, "signal_benchmark::benchmark"), "");
    }

    #[test]
    fn test_diagnostics_name_their_module() {
        assert_eq!(
            line_prefix(Level::DEBUG, "signal_benchmark::benchmark"),
            "[benchmark] "
        );
        assert_eq!(line_prefix(Level::TRACE, "signal_benchmark"), "[signal_benchmark] ");
    }

    #[test]
    fn test_problems_carry_their_level() {
        assert_eq!(line_prefix(Level::WARN, "signal_benchmark::utils"), "WARN ");
        assert_eq!(line_prefix(Level::ERROR, "signal_benchmark"), "ERROR ");
    }

    #[test]
    fn test_paint_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(paint(Level::ERROR, "boom".to_string()).to_string(), "boom");
        assert_eq!(paint(Level::INFO, "ok".to_string()).to_string(), "ok");
    }
}
