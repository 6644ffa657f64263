//! The interface of the structured event writer that a [`LogSink`][crate::LogSink] drives.
//!
//! A writer hands out one [`Event`] per log record, receives typed fields on it, and emits it
//! with [`Event::msg`]. The sink never configures the writer or performs any output itself.

use std::{error::Error, fmt, net::IpAddr, panic::Location, time::Duration};

use time::OffsetDateTime;
pub use tracing::{Level, level_filters::LevelFilter};

use crate::value::{HardwareAddr, IpPrefix, SharedError};

/// A structured event writer.
///
/// Writers are shared by every handle derived from the same root, so [`EventWriter::event`] may
/// be called from several threads at once.
pub trait EventWriter: Send + Sync {
    /// An open event, borrowed from the writer until it is emitted.
    type Event<'a>: Event
    where
        Self: 'a;

    /// Opens an event at `level`.
    ///
    /// Returns `None` if the writer filters out events of that severity; the caller then does
    /// nothing.
    fn event(&self, level: Level) -> Option<Self::Event<'_>>;

    /// The most verbose severity this writer currently emits.
    fn max_level(&self) -> LevelFilter;
}

/// An open event accepting typed fields.
///
/// Narrow integer and float widths, and their list forms, have provided methods that widen to
/// the 64-bit setters. Writers override them when they encode a width differently.
#[allow(missing_docs)] // One setter per field type, named after the type
pub trait Event {
    fn str(&mut self, key: &str, value: &str);
    fn bytes(&mut self, key: &str, value: &[u8]);
    fn bool(&mut self, key: &str, value: bool);
    fn i64(&mut self, key: &str, value: i64);
    fn u64(&mut self, key: &str, value: u64);
    fn f64(&mut self, key: &str, value: f64);
    fn time(&mut self, key: &str, value: OffsetDateTime);
    fn duration(&mut self, key: &str, value: Duration);

    fn strs(&mut self, key: &str, value: &[String]);
    fn bools(&mut self, key: &str, value: &[bool]);
    fn i64s(&mut self, key: &str, value: &[i64]);
    fn u64s(&mut self, key: &str, value: &[u64]);
    fn f64s(&mut self, key: &str, value: &[f64]);
    fn times(&mut self, key: &str, value: &[OffsetDateTime]);
    fn durations(&mut self, key: &str, value: &[Duration]);

    fn ip_addr(&mut self, key: &str, value: IpAddr);
    fn ip_prefix(&mut self, key: &str, value: IpPrefix);
    fn hardware_addr(&mut self, key: &str, value: &HardwareAddr);

    /// Attaches an already-encoded value without re-encoding it.
    fn raw_json(&mut self, key: &str, value: &serde_json::Value);

    /// Attaches an error through the writer's dedicated error representation.
    fn error(&mut self, key: &str, value: &(dyn Error + 'static));

    /// Attaches several errors under one key.
    fn errors(&mut self, key: &str, value: &[SharedError]);

    /// Attaches a value of a type with no dedicated setter.
    fn any(&mut self, key: &str, value: &dyn fmt::Debug);

    /// Sets the number of stack frames to skip when resolving the reported call site.
    fn caller_skip_frames(&mut self, frames: usize);

    /// Supplies the call site as captured by `#[track_caller]` at the public logging call.
    fn caller_location(&mut self, _location: &'static Location<'static>) {}

    /// Emits the event with `message`.
    fn msg(self, message: &str)
    where
        Self: Sized;

    fn i8(&mut self, key: &str, value: i8) {
        self.i64(key, i64::from(value));
    }

    fn i16(&mut self, key: &str, value: i16) {
        self.i64(key, i64::from(value));
    }

    fn i32(&mut self, key: &str, value: i32) {
        self.i64(key, i64::from(value));
    }

    fn isize(&mut self, key: &str, value: isize) {
        self.i64(key, i64::try_from(value).unwrap_or(i64::MAX));
    }

    fn u8(&mut self, key: &str, value: u8) {
        self.u64(key, u64::from(value));
    }

    fn u16(&mut self, key: &str, value: u16) {
        self.u64(key, u64::from(value));
    }

    fn u32(&mut self, key: &str, value: u32) {
        self.u64(key, u64::from(value));
    }

    fn usize(&mut self, key: &str, value: usize) {
        self.u64(key, u64::try_from(value).unwrap_or(u64::MAX));
    }

    fn f32(&mut self, key: &str, value: f32) {
        self.f64(key, f64::from(value));
    }

    fn i8s(&mut self, key: &str, value: &[i8]) {
        self.i64s(key, &widen(value, i64::from));
    }

    fn i16s(&mut self, key: &str, value: &[i16]) {
        self.i64s(key, &widen(value, i64::from));
    }

    fn i32s(&mut self, key: &str, value: &[i32]) {
        self.i64s(key, &widen(value, i64::from));
    }

    fn isizes(&mut self, key: &str, value: &[isize]) {
        self.i64s(
            key,
            &widen(value, |v| i64::try_from(v).unwrap_or(i64::MAX)),
        );
    }

    fn u16s(&mut self, key: &str, value: &[u16]) {
        self.u64s(key, &widen(value, u64::from));
    }

    fn u32s(&mut self, key: &str, value: &[u32]) {
        self.u64s(key, &widen(value, u64::from));
    }

    fn usizes(&mut self, key: &str, value: &[usize]) {
        self.u64s(
            key,
            &widen(value, |v| u64::try_from(v).unwrap_or(u64::MAX)),
        );
    }

    fn f32s(&mut self, key: &str, value: &[f32]) {
        self.f64s(key, &widen(value, f64::from));
    }
}

fn widen<T: Copy, U>(values: &[T], f: impl Fn(T) -> U) -> Vec<U> {
    values.iter().copied().map(f).collect()
}
