// # Log File
//
// Every tracing event at or above the configured level is appended to the
// log file as one line:
//
// ```text
// 2026-10-17 14:03:07.412093 - b.example - IP differs (server: 1.2.3.4, domain: 9.9.9.9)
// ```
//
// Timestamps are local time. The file is opened in append mode and never
// rotated. Warnings and errors are mirrored to stderr so that a scheduler
// capturing output (cron mail, journald) sees them too.

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

/// Timestamp layout of a log line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// `<timestamp> - <message>` line format
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLineFormat;

impl<S, N> FormatEvent<S, N> for LogLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(writer, "{} - ", chrono::Local::now().format(TIMESTAMP_FORMAT))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Warn-and-above mirror of the log file
///
/// Colors only when `ansi` is set; captured output (cron mail, journald)
/// must stay plain text.
fn mirror_layer<S, W>(writer: W, ansi: bool) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .with_filter(LevelFilter::WARN)
}

/// Install the global subscriber writing to `path`
pub fn init(path: &Path, level: Level) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", path.display(), e))?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .event_format(LogLineFormat)
        .with_filter(LevelFilter::from_level(level));

    let ansi = std::io::stderr().is_terminal();

    tracing_subscriber::registry()
        .with(file_layer)
        .with(mirror_layer(std::io::stderr, ansi))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}
