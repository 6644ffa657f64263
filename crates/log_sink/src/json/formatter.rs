//! Provides [`JsonEventWriter`], an [`EventWriter`] that formats events as JSON lines.

use std::{
    collections::HashMap,
    error::Error,
    fmt,
    io::Write,
    net::IpAddr,
    panic::Location,
    time::Duration,
};

use serde::ser::{SerializeMap, Serializer};
use serde_json::{Value, ser::Formatter};
use time::{
    OffsetDateTime,
    format_description::well_known::{Iso8601, Rfc3339},
};
use tracing_subscriber::fmt::MakeWriter;

use super::{JsonFormat, JsonWriterConfig, storage::Storage};
use crate::{
    LoggerError,
    value::{HardwareAddr, IpPrefix, SharedError},
    writer::{Event, EventWriter, Level, LevelFilter},
};

/// An [`EventWriter`] that serializes each event as one JSON object per line.
///
/// Every record starts with the implicit fields (message, level, time, hostname, pid and,
/// if enabled, the caller's file and line), followed by the static top-level fields from the
/// [`JsonWriterConfig`] and then the event's own fields in the order they were recorded. An event
/// field whose key collides with an implicit field is written under `fields.<key>` instead.
///
/// It requires a [`MakeWriter`] to determine the output destination; anything implementing
/// [`std::io::Write`] through a closure (such as `std::io::stdout`) works, as does a
/// [`tracing_appender::non_blocking::NonBlocking`] writer.
#[derive(Debug)]
pub struct JsonEventWriter<W>
where
    W: for<'a> MakeWriter<'a> + 'static,
{
    dst_writer: W,
    format: JsonFormat,
    pid: u32,
    hostname: String,
    static_top_level_fields: HashMap<String, Value>,
    max_level: LevelFilter,
    include_caller: bool,
}

impl<W> JsonEventWriter<W>
where
    W: for<'a> MakeWriter<'a> + 'static,
{
    /// Creates a new [`JsonEventWriter`] with the specified configuration and writer.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::Configuration`] if a static top-level field uses the key of an
    /// implicit field. `file` and `line` are only reserved when `include_caller` is set.
    pub fn new(config: JsonWriterConfig, dst_writer: W) -> Result<Self, LoggerError> {
        let pid = std::process::id();
        let hostname = gethostname::gethostname().to_string_lossy().into_owned();

        for key in config.static_top_level_fields.keys() {
            if super::keys::is_implicit(key, config.include_caller) {
                return Err(LoggerError::Configuration(format!(
                    "A reserved key `{key}` was included in `static_top_level_fields` in the \
                     JSON event writer"
                )));
            }
        }

        Ok(Self {
            dst_writer,
            format: config.format,
            pid,
            hostname,
            static_top_level_fields: config.static_top_level_fields,
            max_level: config.max_level,
            include_caller: config.include_caller,
        })
    }

    /// Serializes implicit fields.
    fn serialize_implicit_fields(
        &self,
        map_serializer: &mut impl SerializeMap<Error = serde_json::Error>,
        level: Level,
        location: Option<&Location<'_>>,
        message: &str,
    ) -> Result<(), LoggerError> {
        use super::keys;

        map_serializer.serialize_entry(keys::MESSAGE, message)?;
        map_serializer.serialize_entry(keys::LEVEL, &format_args!("{level}"))?;

        if let Ok(time) = time::UtcDateTime::now().format(&Iso8601::DEFAULT) {
            map_serializer.serialize_entry(keys::TIME, &time)?;
        }

        map_serializer.serialize_entry(keys::HOSTNAME, &self.hostname)?;
        map_serializer.serialize_entry(keys::PID, &self.pid)?;

        if self.include_caller {
            if let Some(location) = location {
                map_serializer.serialize_entry(keys::FILE, location.file())?;
                map_serializer.serialize_entry(keys::LINE, &location.line())?;
            }
        }

        Ok(())
    }

    /// Serializes all entries of an event into `map_serializer`.
    fn serialize_entries(
        &self,
        map_serializer: &mut impl SerializeMap<Error = serde_json::Error>,
        event: &JsonEvent<'_, W>,
        message: &str,
    ) -> Result<(), LoggerError> {
        self.serialize_implicit_fields(map_serializer, event.level, event.location, message)?;

        for (key, value) in self.static_top_level_fields.iter() {
            map_serializer.serialize_entry(key, value)?;
        }

        for (key, value) in event.storage.values() {
            map_serializer.serialize_entry(key, value)?;
        }

        Ok(())
    }

    fn serialize_with<F: Formatter>(
        &self,
        buffer: &mut Vec<u8>,
        formatter: F,
        event: &JsonEvent<'_, W>,
        message: &str,
    ) -> Result<(), LoggerError> {
        let mut serializer = serde_json::Serializer::with_formatter(buffer, formatter);
        let mut map_serializer = serializer.serialize_map(None)?;
        self.serialize_entries(&mut map_serializer, event, message)?;
        map_serializer.end()?;
        Ok(())
    }

    /// Serialize an event and its message into a new buffer.
    fn event_serialize(
        &self,
        event: &JsonEvent<'_, W>,
        message: &str,
    ) -> Result<Vec<u8>, LoggerError> {
        let mut buffer = Vec::new();
        match self.format {
            JsonFormat::Compact => self.serialize_with(
                &mut buffer,
                serde_json::ser::CompactFormatter,
                event,
                message,
            )?,
            JsonFormat::Pretty => self.serialize_with(
                &mut buffer,
                serde_json::ser::PrettyFormatter::new(),
                event,
                message,
            )?,
        }
        Ok(buffer)
    }

    /// Flush memory buffer into an output stream with a trailing newline.
    ///
    /// Should be done by a single `write_all` call to avoid fragmentation of log because of
    /// multithreading.
    fn flush(&self, mut buffer: Vec<u8>) -> Result<(), std::io::Error> {
        buffer.write_all(b"\n")?;
        self.dst_writer.make_writer().write_all(&buffer)
    }
}

impl<W> EventWriter for JsonEventWriter<W>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    type Event<'a> = JsonEvent<'a, W>;

    fn event(&self, level: Level) -> Option<Self::Event<'_>> {
        (level <= self.max_level).then(|| JsonEvent {
            writer: self,
            level,
            storage: Storage::new(self.include_caller),
            location: None,
        })
    }

    fn max_level(&self) -> LevelFilter {
        self.max_level
    }
}

/// An event being built by a [`JsonEventWriter`].
#[derive(Debug)]
pub struct JsonEvent<'a, W>
where
    W: for<'w> MakeWriter<'w> + 'static,
{
    writer: &'a JsonEventWriter<W>,
    level: Level,
    storage: Storage,
    location: Option<&'static Location<'static>>,
}

impl<W> JsonEvent<'_, W>
where
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn record(&mut self, key: &str, value: impl Into<Value>) {
        self.storage.record_value(key, value.into());
    }

    fn record_display(&mut self, key: &str, value: impl fmt::Display) {
        self.record(key, value.to_string());
    }
}

fn format_time(value: OffsetDateTime) -> String {
    value
        .format(&Rfc3339)
        .unwrap_or_else(|_| value.to_string())
}

/// Durations are written as fractional milliseconds.
fn duration_millis(value: Duration) -> f64 {
    value.as_secs_f64() * 1000.0
}

impl<W> Event for JsonEvent<'_, W>
where
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn str(&mut self, key: &str, value: &str) {
        self.record(key, value);
    }

    fn bytes(&mut self, key: &str, value: &[u8]) {
        self.record(key, String::from_utf8_lossy(value).into_owned());
    }

    fn bool(&mut self, key: &str, value: bool) {
        self.record(key, value);
    }

    fn i64(&mut self, key: &str, value: i64) {
        self.record(key, value);
    }

    fn u64(&mut self, key: &str, value: u64) {
        self.record(key, value);
    }

    fn f64(&mut self, key: &str, value: f64) {
        self.record(key, value);
    }

    fn time(&mut self, key: &str, value: OffsetDateTime) {
        self.record(key, format_time(value));
    }

    fn duration(&mut self, key: &str, value: Duration) {
        self.record(key, duration_millis(value));
    }

    fn strs(&mut self, key: &str, value: &[String]) {
        self.record(key, value);
    }

    fn bools(&mut self, key: &str, value: &[bool]) {
        self.record(key, value);
    }

    fn i64s(&mut self, key: &str, value: &[i64]) {
        self.record(key, value);
    }

    fn u64s(&mut self, key: &str, value: &[u64]) {
        self.record(key, value);
    }

    fn f64s(&mut self, key: &str, value: &[f64]) {
        self.record(key, value);
    }

    fn times(&mut self, key: &str, value: &[OffsetDateTime]) {
        let times: Vec<_> = value.iter().copied().map(format_time).collect();
        self.record(key, times);
    }

    fn durations(&mut self, key: &str, value: &[Duration]) {
        let millis: Vec<_> = value.iter().copied().map(duration_millis).collect();
        self.record(key, millis);
    }

    fn ip_addr(&mut self, key: &str, value: IpAddr) {
        self.record_display(key, value);
    }

    fn ip_prefix(&mut self, key: &str, value: IpPrefix) {
        self.record_display(key, value);
    }

    fn hardware_addr(&mut self, key: &str, value: &HardwareAddr) {
        self.record_display(key, value);
    }

    fn raw_json(&mut self, key: &str, value: &Value) {
        self.record(key, value.clone());
    }

    fn error(&mut self, key: &str, value: &(dyn Error + 'static)) {
        self.record_display(key, value);
    }

    fn errors(&mut self, key: &str, value: &[SharedError]) {
        let messages: Vec<_> = value.iter().map(ToString::to_string).collect();
        self.record(key, messages);
    }

    fn any(&mut self, key: &str, value: &dyn fmt::Debug) {
        self.record(key, format!("{value:?}"));
    }

    // The call site is taken from `caller_location` instead of walking the stack.
    fn caller_skip_frames(&mut self, _frames: usize) {}

    fn caller_location(&mut self, location: &'static Location<'static>) {
        self.location = Some(location);
    }

    fn msg(self, message: &str) {
        if let Ok(serialized) = self.writer.event_serialize(&self, message) {
            let _ = self.writer.flush(serialized);
        }
    }
}
