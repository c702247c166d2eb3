//! Diagnostics for the `marginal` binary.
//!
//! Events go to stderr so stdout carries only the report. With `--log-file`
//! they are also appended, timestamped and uncolored, to a file.

use std::fmt;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Level used when neither `RUST_LOG` nor a configured level is present.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// `LEVEL target: fields`, optionally prefixed with local time.
struct EventFormat {
    timestamps: bool,
}

impl<S, N> FormatEvent<S, N> for EventFormat
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
        let meta = event.metadata();

        if self.timestamps {
            write!(writer, "{} ", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))?;
        }

        let level = meta.level();
        if writer.has_ansi_escapes() {
            write!(writer, "\x1b[{}m{:>5}\x1b[0m ", level_color(level), level)?;
        } else {
            write!(writer, "{level:>5} ")?;
        }
        write!(writer, "{}: ", meta.target())?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "1;31",
        Level::WARN => "1;33",
        Level::INFO => "1;32",
        Level::DEBUG => "1;34",
        Level::TRACE => "1;35",
    }
}

/// Builds the event filter. A non-empty `RUST_LOG` value wins over `level`.
///
/// Both accept a bare level (`info`) or full directives
/// (`warn,tax_core=debug`).
pub fn build_filter(
    env: Option<&str>,
    level: Option<&str>,
) -> Result<EnvFilter> {
    if let Some(directives) = env.filter(|d| !d.trim().is_empty()) {
        return EnvFilter::try_new(directives)
            .with_context(|| format!("invalid RUST_LOG value '{directives}'"));
    }
    let level = level.unwrap_or(DEFAULT_LOG_LEVEL);
    EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))
}

/// Installs the global subscriber. Call once, before any work is done.
///
/// `file` is opened in append mode; its directory must already exist.
pub fn init(
    level: Option<&str>,
    file: Option<&Path>,
) -> Result<()> {
    let env = std::env::var("RUST_LOG").ok();
    let filter = build_filter(env.as_deref(), level)?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(EventFormat { timestamps: false })
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = match file {
        Some(path) => {
            let log_file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(EventFormat { timestamps: true })
                    .with_ansi(false)
                    .with_writer(Mutex::new(log_file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install log subscriber")
}
