//! The [`LogSink`], which turns leveled key/value calls into events on an [`EventWriter`].

use std::{error::Error, fmt, panic::Location, sync::Arc};

use crate::{
    LogSinkConfig,
    depth::{CallDepth, RuntimeInfo},
    encoder,
    level::EventKind,
    name,
    value::Value,
    writer::{Event, EventWriter, Level},
};

/// An immutable logging handle bound to a shared [`EventWriter`].
///
/// Every `with_*` method returns a new sink and leaves the receiver untouched, so a sink can be
/// shared between threads and derived from freely. Cloning is cheap: the name and accumulated
/// values are reference-counted and never written to after construction.
pub struct LogSink<W> {
    writer: Arc<W>,
    config: Arc<LogSinkConfig>,
    name: Arc<str>,
    values: Arc<[Value]>,
    depth: CallDepth,
}

impl<W> Clone for LogSink<W> {
    fn clone(&self) -> Self {
        Self {
            writer: Arc::clone(&self.writer),
            config: Arc::clone(&self.config),
            name: Arc::clone(&self.name),
            values: Arc::clone(&self.values),
            depth: self.depth,
        }
    }
}

impl<W> fmt::Debug for LogSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink")
            .field("name", &self.name)
            .field("values", &self.values)
            .field("depth", &self.depth.frames())
            .finish_non_exhaustive()
    }
}

impl<W: EventWriter> LogSink<W> {
    /// Creates an unnamed sink with no accumulated values.
    ///
    /// The sink is not usable for correct call-site reporting until [`LogSink::init`] has been
    /// called; [`Logger::new`][crate::Logger::new] does this.
    pub fn new(writer: Arc<W>, config: Arc<LogSinkConfig>) -> Self {
        Self {
            writer,
            config,
            name: Arc::from(""),
            values: Arc::from(Vec::new()),
            depth: CallDepth::default(),
        }
    }

    /// Establishes the base call depth: the wrapper's frames plus the sink's own.
    pub fn init(&mut self, info: RuntimeInfo) {
        self.depth = self.depth.init(info);
    }

    /// Whether events at verbosity `level` are produced.
    ///
    /// This is a plain comparison against the configured maximum verbosity; the writer may still
    /// filter the event out by severity.
    #[inline]
    pub fn enabled(&self, level: u32) -> bool {
        self.config.levels.enabled(level)
    }

    /// Emits an informational event at verbosity `level`.
    #[track_caller]
    pub fn info(&self, level: u32, message: &str, kv: &[Value]) {
        if !self.enabled(level) {
            return;
        }
        let severity = self.config.levels.severity(level);
        self.emit(
            severity,
            EventKind::Info,
            level,
            None,
            message,
            kv,
            Location::caller(),
        );
    }

    /// Emits an error event, regardless of verbosity.
    ///
    /// When `err` is `None`, only the message and fields are written.
    #[track_caller]
    pub fn error(&self, err: Option<&(dyn Error + 'static)>, message: &str, kv: &[Value]) {
        self.emit(
            Level::ERROR,
            EventKind::Error,
            0,
            err,
            message,
            kv,
            Location::caller(),
        );
    }

    /// Returns a sink that additionally writes `kv` on every event.
    ///
    /// A trailing key without a value is paired with a placeholder value.
    pub fn with_values(&self, kv: &[Value]) -> Self {
        let mut values = Vec::with_capacity(self.values.len() + kv.len() + 1);
        values.extend_from_slice(&self.values);
        values.extend_from_slice(kv);
        encoder::pad_odd(&mut values);

        Self {
            values: Arc::from(values),
            ..self.clone()
        }
    }

    /// Returns a sink whose name has `segment` appended.
    ///
    /// Segments are joined with the configured separator, and should not contain it.
    pub fn with_name(&self, segment: &str) -> Self {
        let name = name::join(&self.name, &self.config.name_separator, segment);

        Self {
            name: Arc::from(name),
            ..self.clone()
        }
    }

    /// Returns a sink that skips `depth` more stack frames when reporting the call site.
    pub fn with_call_depth(&self, depth: usize) -> Self {
        Self {
            depth: self.depth.add(depth),
            ..self.clone()
        }
    }

    /// The accumulated name, empty if none was set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The values accumulated through [`LogSink::with_values`].
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The number of stack frames the writer is asked to skip.
    pub fn call_depth(&self) -> usize {
        self.depth.frames()
    }

    /// The configuration shared by this sink and every sink derived from the same root.
    pub fn config(&self) -> &LogSinkConfig {
        &self.config
    }

    #[allow(clippy::too_many_arguments)]
    fn emit(
        &self,
        severity: Level,
        kind: EventKind,
        verbosity: u32,
        err: Option<&(dyn Error + 'static)>,
        message: &str,
        kv: &[Value],
        location: &'static Location<'static>,
    ) {
        let Some(mut event) = self.writer.event(severity) else {
            return;
        };

        if let Some(err) = err {
            event.error(&self.config.error_key, err);
        }
        if !self.values.is_empty() {
            encoder::encode_fields(&mut event, &self.values);
        }
        encoder::encode_fields(&mut event, kv);
        if !self.name.is_empty() {
            event.str(&self.config.name_key, &self.name);
        }
        if let Some(v) = self.config.levels.recorded_verbosity(kind, verbosity) {
            event.u32(&self.config.verbosity_key, v);
        }

        event.caller_location(location);
        event.caller_skip_frames(self.depth.frames());
        event.msg(message);
    }
}
