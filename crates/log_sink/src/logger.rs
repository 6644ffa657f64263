//! The caller-facing [`Logger`] handle.

use std::{error::Error, fmt, sync::Arc};

use crate::{
    LogSinkConfig, LoggerError, depth::RuntimeInfo, sink::LogSink, value::Value,
    writer::EventWriter,
};

/// A leveled, structured logger.
///
/// A `Logger` pairs a [`LogSink`] with a verbosity level. [`Logger::v`] makes a handle more
/// verbose, and [`Logger::with_values`], [`Logger::with_name`] and [`Logger::with_call_depth`]
/// derive handles that carry extra context. None of them affect the handle they are called on.
///
/// # Example
///
/// ```
/// use log_sink::{JsonEventWriter, JsonWriterConfig, Logger, kv};
///
/// let writer = JsonEventWriter::new(JsonWriterConfig::default(), std::io::stdout)?;
/// let log = Logger::new(writer).with_name("svc").with_values(&kv!["region", "us"]);
///
/// log.info("started", &kv!["port", 8080]);
/// log.v(1).info("listening", &[]);
/// log.error(None, "nothing to report", &[]);
/// # Ok::<(), log_sink::LoggerError>(())
/// ```
pub struct Logger<W> {
    sink: LogSink<W>,
    level: u32,
}

impl<W> Clone for Logger<W> {
    fn clone(&self) -> Self {
        Self {
            sink: self.sink.clone(),
            level: self.level,
        }
    }
}

impl<W> fmt::Debug for Logger<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("sink", &self.sink)
            .field("level", &self.level)
            .finish()
    }
}

impl<W: EventWriter> Logger<W> {
    /// Creates a logger writing through `writer` with the default [`LogSinkConfig`].
    pub fn new(writer: W) -> Self {
        Self::shared(Arc::new(writer))
    }

    /// Creates a logger writing through a writer that is also used elsewhere.
    pub fn shared(writer: Arc<W>) -> Self {
        Self::from_parts(writer, LogSinkConfig::default())
    }

    /// Creates a logger writing through `writer` with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::Configuration`] if the configuration is invalid.
    pub fn with_config(writer: Arc<W>, config: LogSinkConfig) -> Result<Self, LoggerError> {
        config.validate()?;
        Ok(Self::from_parts(writer, config))
    }

    fn from_parts(writer: Arc<W>, config: LogSinkConfig) -> Self {
        let mut sink = LogSink::new(writer, Arc::new(config));
        // The logger's own method is one frame between the caller and the sink.
        sink.init(RuntimeInfo { call_depth: 1 });
        Self { sink, level: 0 }
    }

    /// Returns a logger whose messages are `level` steps more verbose than this one's.
    pub fn v(&self, level: u32) -> Self {
        Self {
            sink: self.sink.clone(),
            level: self.level.saturating_add(level),
        }
    }

    /// The verbosity level of this handle.
    pub fn verbosity(&self) -> u32 {
        self.level
    }

    /// Whether [`Logger::info`] on this handle would produce an event.
    pub fn enabled(&self) -> bool {
        self.sink.enabled(self.level)
    }

    /// Logs a message with key/value pairs at this handle's verbosity.
    #[track_caller]
    pub fn info(&self, message: &str, kv: &[Value]) {
        if self.enabled() {
            self.sink.info(self.level, message, kv);
        }
    }

    /// Logs an error with key/value pairs. Errors are written regardless of verbosity.
    #[track_caller]
    pub fn error(&self, err: Option<&(dyn Error + 'static)>, message: &str, kv: &[Value]) {
        self.sink.error(err, message, kv);
    }

    /// Returns a logger that adds `kv` to every message.
    pub fn with_values(&self, kv: &[Value]) -> Self {
        Self {
            sink: self.sink.with_values(kv),
            level: self.level,
        }
    }

    /// Returns a logger with `segment` appended to its name.
    pub fn with_name(&self, segment: &str) -> Self {
        Self {
            sink: self.sink.with_name(segment),
            level: self.level,
        }
    }

    /// Returns a logger that attributes messages `depth` frames further up the stack.
    ///
    /// Helpers that log on behalf of their caller can instead be marked `#[track_caller]`, which
    /// carries the caller's location to writers that use it.
    pub fn with_call_depth(&self, depth: usize) -> Self {
        Self {
            sink: self.sink.with_call_depth(depth),
            level: self.level,
        }
    }

    /// The underlying sink.
    pub fn sink(&self) -> &LogSink<W> {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        LevelMapper, kv,
        testing::{Field, Recorder},
    };

    #[test]
    fn v_accumulates_verbosity() {
        let log = Logger::new(Recorder::default());
        assert_eq!(log.v(1).v(1).verbosity(), 2);
        assert_eq!(log.verbosity(), 0);
    }

    #[test]
    fn verbosity_beyond_configured_maximum_is_suppressed() {
        let recorder = Arc::new(Recorder::default());
        let config = LogSinkConfig {
            levels: LevelMapper::new(1, 1).expect("valid mapper"),
            ..LogSinkConfig::default()
        };
        let log = Logger::with_config(Arc::clone(&recorder), config).expect("valid config");

        assert!(!log.v(9).enabled());
        log.v(9).info("hidden", &[]);
        log.v(1).info("shown", &[]);

        let messages: Vec<_> = recorder.records().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, ["shown"]);
    }

    #[test]
    fn end_to_end_info_event() {
        let recorder = Arc::new(Recorder::default());
        let log = Logger::shared(Arc::clone(&recorder))
            .with_name("svc")
            .with_values(&kv!["region", "us"]);

        log.info("started", &kv!["port", 8080]);

        let records = recorder.records();
        assert_eq!(records.len(), 1);
        let record = records.first().expect("one record");
        assert_eq!(record.level, tracing::Level::INFO);
        assert_eq!(record.message, "started");
        assert_eq!(
            record.fields,
            [
                Field::new("region", "us"),
                Field::new("port", "8080"),
                Field::new("logger", "svc"),
                Field::new("v", "0"),
            ]
        );
    }

    #[test]
    fn location_points_at_the_call_site() {
        let recorder = Arc::new(Recorder::default());
        let log = Logger::shared(Arc::clone(&recorder));

        log.info("here", &[]);
        let line = line!() - 1;

        let location = recorder
            .records()
            .first()
            .and_then(|r| r.location)
            .expect("location recorded");
        assert_eq!(location.file(), file!());
        assert_eq!(location.line(), line);
    }

    #[test]
    fn root_depth_covers_logger_and_sink_frames() {
        let recorder = Arc::new(Recorder::default());
        let log = Logger::shared(Arc::clone(&recorder));

        log.info("root", &[]);
        log.with_call_depth(2).info("helper", &[]);

        let depths: Vec<_> = recorder
            .records()
            .into_iter()
            .map(|r| r.skip_frames)
            .collect();
        assert_eq!(depths, [3, 5]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = LogSinkConfig {
            name_separator: String::new(),
            ..LogSinkConfig::default()
        };
        assert!(matches!(
            Logger::with_config(Arc::new(Recorder::default()), config),
            Err(LoggerError::Configuration(_))
        ));
    }
}
