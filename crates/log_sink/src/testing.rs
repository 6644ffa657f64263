//! An in-memory [`EventWriter`] that records every emitted event as text fields.

use std::{error::Error, fmt, net::IpAddr, panic::Location, sync::Mutex, time::Duration};

use time::OffsetDateTime;

use crate::{
    value::{HardwareAddr, IpPrefix, SharedError},
    writer::{Event, EventWriter, Level, LevelFilter},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Field {
    pub(crate) key: String,
    pub(crate) value: String,
}

impl Field {
    pub(crate) fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_owned(),
            value: value.to_owned(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Record {
    pub(crate) level: Level,
    pub(crate) fields: Vec<Field>,
    pub(crate) message: String,
    pub(crate) skip_frames: usize,
    pub(crate) location: Option<&'static Location<'static>>,
}

#[derive(Debug)]
pub(crate) struct Recorder {
    max_level: LevelFilter,
    records: Mutex<Vec<Record>>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::with_max_level(Level::TRACE)
    }
}

impl Recorder {
    pub(crate) fn with_max_level(level: Level) -> Self {
        Self {
            max_level: LevelFilter::from_level(level),
            records: Mutex::new(Vec::new()),
        }
    }

    #[allow(clippy::unwrap_used)]
    pub(crate) fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }
}

impl EventWriter for Recorder {
    type Event<'a> = RecordedEvent<'a>;

    fn event(&self, level: Level) -> Option<Self::Event<'_>> {
        (level <= self.max_level).then(|| RecordedEvent {
            recorder: self,
            record: Record {
                level,
                fields: Vec::new(),
                message: String::new(),
                skip_frames: 0,
                location: None,
            },
        })
    }

    fn max_level(&self) -> LevelFilter {
        self.max_level
    }
}

#[derive(Debug)]
pub(crate) struct RecordedEvent<'a> {
    recorder: &'a Recorder,
    record: Record,
}

impl RecordedEvent<'_> {
    fn push(&mut self, key: &str, value: impl fmt::Display) {
        self.record.fields.push(Field {
            key: key.to_owned(),
            value: value.to_string(),
        });
    }

    fn push_debug(&mut self, key: &str, value: impl fmt::Debug) {
        self.push(key, format_args!("{value:?}"));
    }
}

impl Event for RecordedEvent<'_> {
    fn str(&mut self, key: &str, value: &str) {
        self.push(key, value);
    }

    fn bytes(&mut self, key: &str, value: &[u8]) {
        self.push(key, String::from_utf8_lossy(value));
    }

    fn bool(&mut self, key: &str, value: bool) {
        self.push(key, value);
    }

    fn i64(&mut self, key: &str, value: i64) {
        self.push(key, value);
    }

    fn u64(&mut self, key: &str, value: u64) {
        self.push(key, value);
    }

    fn f64(&mut self, key: &str, value: f64) {
        self.push(key, value);
    }

    fn time(&mut self, key: &str, value: OffsetDateTime) {
        self.push(key, value);
    }

    fn duration(&mut self, key: &str, value: Duration) {
        self.push_debug(key, value);
    }

    fn strs(&mut self, key: &str, value: &[String]) {
        self.push_debug(key, value);
    }

    fn bools(&mut self, key: &str, value: &[bool]) {
        self.push_debug(key, value);
    }

    fn i64s(&mut self, key: &str, value: &[i64]) {
        self.push_debug(key, value);
    }

    fn u64s(&mut self, key: &str, value: &[u64]) {
        self.push_debug(key, value);
    }

    fn f64s(&mut self, key: &str, value: &[f64]) {
        self.push_debug(key, value);
    }

    fn times(&mut self, key: &str, value: &[OffsetDateTime]) {
        self.push_debug(key, value);
    }

    fn durations(&mut self, key: &str, value: &[Duration]) {
        self.push_debug(key, value);
    }

    fn ip_addr(&mut self, key: &str, value: IpAddr) {
        self.push(key, value);
    }

    fn ip_prefix(&mut self, key: &str, value: IpPrefix) {
        self.push(key, value);
    }

    fn hardware_addr(&mut self, key: &str, value: &HardwareAddr) {
        self.push(key, value);
    }

    fn raw_json(&mut self, key: &str, value: &serde_json::Value) {
        self.push(key, value);
    }

    fn error(&mut self, key: &str, value: &(dyn Error + 'static)) {
        self.push(key, value);
    }

    fn errors(&mut self, key: &str, value: &[SharedError]) {
        let text: Vec<_> = value.iter().map(ToString::to_string).collect();
        self.push_debug(key, text);
    }

    fn any(&mut self, key: &str, value: &dyn fmt::Debug) {
        self.push_debug(key, value);
    }

    fn caller_skip_frames(&mut self, frames: usize) {
        self.record.skip_frames = frames;
    }

    fn caller_location(&mut self, location: &'static Location<'static>) {
        self.record.location = Some(location);
    }

    #[allow(clippy::unwrap_used)]
    fn msg(mut self, message: &str) {
        message.clone_into(&mut self.record.message);
        self.recorder.records.lock().unwrap().push(self.record);
    }
}
