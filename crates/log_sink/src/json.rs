//! A bundled [`EventWriter`][crate::EventWriter] that writes events as JSON lines, and helpers to
//! construct it for the console or for rolling log files.

mod formatter;
mod storage;

use std::{collections::HashMap, num::NonZeroUsize};

use serde_json::Value;
pub use tracing_appender::rolling::Rotation;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};

pub use self::formatter::{JsonEvent, JsonEventWriter};
use crate::{LoggerError, writer::LevelFilter};

mod keys {
    use std::sync::LazyLock;

    use rustc_hash::FxHashSet;

    pub(crate) const MESSAGE: &str = "message";
    pub(crate) const LEVEL: &str = "level";
    pub(crate) const TIME: &str = "time";
    pub(crate) const HOSTNAME: &str = "hostname";
    pub(crate) const PID: &str = "pid";
    pub(crate) const FILE: &str = "file";
    pub(crate) const LINE: &str = "line";

    /// Prepended to event fields whose key collides with an implicit field.
    pub(crate) const SHADOWED_PREFIX: &str = "fields.";

    pub(crate) static IMPLICIT_KEYS: LazyLock<FxHashSet<&'static str>> = LazyLock::new(|| {
        [MESSAGE, LEVEL, TIME, HOSTNAME, PID, FILE, LINE]
            .iter()
            .copied()
            .collect()
    });

    /// Whether `key` names an implicit field of a writer, given whether it writes the caller.
    pub(crate) fn is_implicit(key: &str, include_caller: bool) -> bool {
        match key {
            FILE | LINE => include_caller,
            _ => IMPLICIT_KEYS.contains(key),
        }
    }
}

/// Configuration for creating a [`JsonEventWriter`].
#[derive(Clone, Debug)]
pub struct JsonWriterConfig {
    /// A map of key-value pairs that are statically defined at initialization and included at the
    /// top level of every log entry.
    pub static_top_level_fields: HashMap<String, Value>,

    /// The most verbose severity written. Events above it are never opened.
    pub max_level: LevelFilter,

    /// If `true`, the file and line of the logging call are written on every entry.
    pub include_caller: bool,

    /// Output format of each entry.
    pub format: JsonFormat,
}

impl Default for JsonWriterConfig {
    fn default() -> Self {
        Self {
            static_top_level_fields: HashMap::new(),
            max_level: LevelFilter::INFO,
            include_caller: false,
            format: JsonFormat::Compact,
        }
    }
}

/// Defines how each JSON entry is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact, single-line JSON format.
    Compact,

    /// Pretty-printed, multi-line JSON format.
    Pretty,
}

/// Where a [`JsonEventWriter`] built by [`build_json_writer`] sends its output.
#[derive(Debug, Clone)]
pub enum Destination {
    /// Standard output.
    Stdout,

    /// Standard error.
    Stderr,

    /// Rolling log files.
    File(FileLoggingConfig),
}

/// Configuration for file logging.
#[derive(Debug, Clone)]
pub struct FileLoggingConfig {
    /// Directory where log files will be stored.
    pub directory: String,

    /// Prefix for log file names.
    pub file_name_prefix: String,

    /// Rotation strategy for log files.
    pub file_rotation: Rotation,

    /// Maximum number of log files to keep. If `None`, all files are kept.
    pub max_log_files: Option<NonZeroUsize>,
}

/// A [`JsonEventWriter`] writing through a background worker, and the guard keeping that worker
/// alive.
#[derive(Debug)]
pub struct JsonLogging {
    /// The writer, ready to be handed to [`Logger::new`][crate::Logger::new].
    pub writer: JsonEventWriter<NonBlocking>,

    /// Entries are written as long as this guard is in scope; dropping it flushes pending
    /// entries.
    pub guard: WorkerGuard,
}

/// Builds a [`JsonEventWriter`] writing to `destination` through a non-blocking worker.
///
/// # Example
///
/// ```
/// use log_sink::{Destination, JsonWriterConfig, Logger, build_json_writer, kv};
///
/// let logging = build_json_writer(JsonWriterConfig::default(), Destination::Stdout)?;
/// let _guard = logging.guard; // Keep the guard in scope
///
/// let log = Logger::new(logging.writer).with_name("my_app");
/// log.info("Logging initialized successfully!", &kv!["version", "0.1.0"]);
/// # Ok::<(), log_sink::LoggerError>(())
/// ```
///
/// # Errors
///
/// Returns [`LoggerError`] if the rolling file appender cannot be created or the writer
/// configuration is invalid.
pub fn build_json_writer(
    config: JsonWriterConfig,
    destination: Destination,
) -> Result<JsonLogging, LoggerError> {
    let (non_blocking, guard) = match destination {
        Destination::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        Destination::Stderr => tracing_appender::non_blocking(std::io::stderr()),
        Destination::File(file_logging_config) => {
            let mut file_appender_builder =
                tracing_appender::rolling::RollingFileAppender::builder()
                    .rotation(file_logging_config.file_rotation)
                    .filename_prefix(file_logging_config.file_name_prefix);

            if let Some(max_log_files) = file_logging_config.max_log_files {
                file_appender_builder =
                    file_appender_builder.max_log_files(usize::from(max_log_files));
            }

            let file_appender = file_appender_builder.build(&file_logging_config.directory)?;
            tracing_appender::non_blocking(file_appender)
        }
    };

    let writer = JsonEventWriter::new(config, non_blocking)?;
    Ok(JsonLogging { writer, guard })
}
