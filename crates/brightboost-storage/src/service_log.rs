//! Human-readable service log
//!
//! Events are written as
//!
//! ```text
//! 10-16 07:30:02 I : Step delta set to 10
//! 10-16 07:30:02 START : Conditions met, raising brightness
//! ```
//!
//! The tag is the event's `tag` field when present (see [`tags`]), otherwise
//! a letter for the level. The file is opened in append mode for every event,
//! so renaming it away during rotation is safe: the next event recreates it.

use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{DefaultFields, Writer};
use tracing_subscriber::fmt::writer::{EitherWriter, MakeWriter};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Name of the event field carrying an explicit tag
pub const TAG_FIELD: &str = "tag";

const TIMESTAMP_FORMAT: &str = "%m-%d %H:%M:%S";

/// Tags for cycle milestones
pub mod tags {
    /// Ramp parameters, logged before the first write
    pub const GO: &str = "GO";
    /// Boost conditions met
    pub const START: &str = "START";
    /// Boost finished
    pub const STOP: &str = "STOP";
    /// Boost conditions not met
    pub const SKIP: &str = "SKIP";
    /// End of a cycle
    pub const OVER: &str = "OVER";
}

/// `<timestamp> <TAG> : <message>` event format
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceLogFormat;

impl<S, N> FormatEvent<S, N> for ServiceLogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let tag = visitor
            .tag
            .as_deref()
            .unwrap_or_else(|| level_tag(event.metadata().level()));

        write!(
            writer,
            "{} {} : {}",
            Local::now().format(TIMESTAMP_FORMAT),
            tag,
            visitor.message
        )?;
        for (name, value) in &visitor.fields {
            write!(writer, " {}={}", name, value)?;
        }
        writeln!(writer)
    }
}

fn level_tag(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "E",
        Level::WARN => "W",
        Level::INFO => "I",
        Level::DEBUG => "D",
        Level::TRACE => "T",
    }
}

#[derive(Default)]
struct LineVisitor {
    tag: Option<String>,
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl LineVisitor {
    fn record(&mut self, field: &Field, value: String) {
        match field.name() {
            TAG_FIELD => self.tag = Some(value),
            "message" => self.message = value,
            name => self.fields.push((name, value)),
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record(field, format!("{:?}", value));
    }
}

/// Opens the log in append mode for each event; events are dropped when
/// the file cannot be opened.
#[derive(Debug, Clone)]
pub struct ServiceLogWriter {
    path: PathBuf,
}

impl ServiceLogWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<'a> MakeWriter<'a> for ServiceLogWriter {
    type Writer = EitherWriter<File, io::Sink>;

    fn make_writer(&'a self) -> Self::Writer {
        match OpenOptions::new().create(true).append(true).open(&self.path) {
            Ok(file) => EitherWriter::A(file),
            Err(_) => EitherWriter::B(io::sink()),
        }
    }
}

/// `fmt` layer writing the service log at `path`
pub fn service_log_layer<S>(
    path: impl Into<PathBuf>,
) -> tracing_subscriber::fmt::Layer<S, DefaultFields, ServiceLogFormat, ServiceLogWriter>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(ServiceLogFormat)
        .with_writer(ServiceLogWriter::new(path))
}
