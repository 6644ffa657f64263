//! Dispatch of key/value sequences onto the typed field setters of an [`Event`].

use crate::{value::Value, writer::Event};

/// Paired with a trailing key that has no value.
pub const NO_VALUE: &str = "<no-value>";

/// Substituted for a key that is not a string.
pub const NON_STRING_KEY: &str = "<non-string-key>";

/// Writes a flat `key, value, key, value, ...` sequence onto `event`.
///
/// A trailing key without a value is written with [`NO_VALUE`] as its value, and keys that are
/// not [`Value::Str`] are written as [`NON_STRING_KEY`]. Duplicate keys are passed through.
pub(crate) fn encode_fields<E: Event>(event: &mut E, kv: &[Value]) {
    let mut pairs = kv.chunks_exact(2);
    for pair in pairs.by_ref() {
        if let [key, value] = pair {
            encode_field(event, key_str(key), value);
        }
    }
    if let [key] = pairs.remainder() {
        event.str(key_str(key), NO_VALUE);
    }
}

/// Pads an odd-length sequence with [`NO_VALUE`], so that every key has a value.
pub(crate) fn pad_odd(kv: &mut Vec<Value>) {
    if kv.len() % 2 == 1 {
        kv.push(Value::from(NO_VALUE));
    }
}

fn key_str(key: &Value) -> &str {
    key.as_str().unwrap_or(NON_STRING_KEY)
}

fn encode_field<E: Event>(event: &mut E, key: &str, value: &Value) {
    match value {
        Value::Str(v) => event.str(key, v),
        Value::Bytes(v) => event.bytes(key, v),
        Value::Bool(v) => event.bool(key, *v),
        Value::I8(v) => event.i8(key, *v),
        Value::I16(v) => event.i16(key, *v),
        Value::I32(v) => event.i32(key, *v),
        Value::I64(v) => event.i64(key, *v),
        Value::Isize(v) => event.isize(key, *v),
        Value::U8(v) => event.u8(key, *v),
        Value::U16(v) => event.u16(key, *v),
        Value::U32(v) => event.u32(key, *v),
        Value::U64(v) => event.u64(key, *v),
        Value::Usize(v) => event.usize(key, *v),
        Value::F32(v) => event.f32(key, *v),
        Value::F64(v) => event.f64(key, *v),
        Value::Time(v) => event.time(key, *v),
        Value::Duration(v) => event.duration(key, *v),
        Value::Strs(v) => event.strs(key, v),
        Value::Bools(v) => event.bools(key, v),
        Value::I8s(v) => event.i8s(key, v),
        Value::I16s(v) => event.i16s(key, v),
        Value::I32s(v) => event.i32s(key, v),
        Value::I64s(v) => event.i64s(key, v),
        Value::Isizes(v) => event.isizes(key, v),
        Value::U16s(v) => event.u16s(key, v),
        Value::U32s(v) => event.u32s(key, v),
        Value::U64s(v) => event.u64s(key, v),
        Value::Usizes(v) => event.usizes(key, v),
        Value::F32s(v) => event.f32s(key, v),
        Value::F64s(v) => event.f64s(key, v),
        Value::Times(v) => event.times(key, v),
        Value::Durations(v) => event.durations(key, v),
        Value::IpAddr(v) => event.ip_addr(key, *v),
        Value::IpPrefix(v) => event.ip_prefix(key, *v),
        Value::HardwareAddr(v) => event.hardware_addr(key, v),
        Value::Json(v) => event.raw_json(key, v),
        // No concrete representation: errors first, then the generic setter
        Value::Error(err) => event.error(key, err.as_ref()),
        Value::Errors(errs) => event.errors(key, errs),
        Value::Any(v) => event.any(key, v.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        error::Error,
        fmt,
        net::{IpAddr, Ipv4Addr},
        time::Duration,
    };

    use time::OffsetDateTime;

    use super::*;
    use crate::{
        value::{HardwareAddr, IpPrefix, SharedError},
        writer::Event,
    };

    /// Records `(setter, key, rendered value)` for every field.
    #[derive(Debug, Default)]
    struct SetterLog(Vec<(&'static str, String, String)>);

    impl SetterLog {
        fn push(&mut self, setter: &'static str, key: &str, value: impl fmt::Debug) {
            self.0.push((setter, key.to_owned(), format!("{value:?}")));
        }

        fn setters(&self) -> Vec<&'static str> {
            self.0.iter().map(|(setter, _, _)| *setter).collect()
        }
    }

    impl Event for SetterLog {
        fn str(&mut self, key: &str, value: &str) {
            self.push("str", key, value);
        }
        fn bytes(&mut self, key: &str, value: &[u8]) {
            self.push("bytes", key, value);
        }
        fn bool(&mut self, key: &str, value: bool) {
            self.push("bool", key, value);
        }
        fn i64(&mut self, key: &str, value: i64) {
            self.push("i64", key, value);
        }
        fn u64(&mut self, key: &str, value: u64) {
            self.push("u64", key, value);
        }
        fn f64(&mut self, key: &str, value: f64) {
            self.push("f64", key, value);
        }
        fn time(&mut self, key: &str, value: OffsetDateTime) {
            self.push("time", key, value);
        }
        fn duration(&mut self, key: &str, value: Duration) {
            self.push("duration", key, value);
        }
        fn strs(&mut self, key: &str, value: &[String]) {
            self.push("strs", key, value);
        }
        fn bools(&mut self, key: &str, value: &[bool]) {
            self.push("bools", key, value);
        }
        fn i64s(&mut self, key: &str, value: &[i64]) {
            self.push("i64s", key, value);
        }
        fn u64s(&mut self, key: &str, value: &[u64]) {
            self.push("u64s", key, value);
        }
        fn f64s(&mut self, key: &str, value: &[f64]) {
            self.push("f64s", key, value);
        }
        fn times(&mut self, key: &str, value: &[OffsetDateTime]) {
            self.push("times", key, value);
        }
        fn durations(&mut self, key: &str, value: &[Duration]) {
            self.push("durations", key, value);
        }
        fn ip_addr(&mut self, key: &str, value: IpAddr) {
            self.push("ip_addr", key, value);
        }
        fn ip_prefix(&mut self, key: &str, value: IpPrefix) {
            self.push("ip_prefix", key, value.to_string());
        }
        fn hardware_addr(&mut self, key: &str, value: &HardwareAddr) {
            self.push("hardware_addr", key, value.to_string());
        }
        fn raw_json(&mut self, key: &str, value: &serde_json::Value) {
            self.push("raw_json", key, value);
        }
        fn error(&mut self, key: &str, value: &(dyn Error + 'static)) {
            self.push("error", key, value.to_string());
        }
        fn errors(&mut self, key: &str, value: &[SharedError]) {
            self.push("errors", key, value.len());
        }
        fn any(&mut self, key: &str, value: &dyn fmt::Debug) {
            self.push("any", key, value);
        }
        fn caller_skip_frames(&mut self, _frames: usize) {}
        fn msg(self, _message: &str) {}
        fn i32(&mut self, key: &str, value: i32) {
            self.push("i32", key, value);
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl fmt::Display for Broken {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("broken")
        }
    }

    impl Error for Broken {}

    #[test]
    fn odd_sequence_pairs_trailing_key_with_sentinel() {
        let mut event = SetterLog::default();
        encode_fields(&mut event, &crate::kv!["a", 1_i64, "dangling"]);

        assert_eq!(event.0.len(), 2);
        assert_eq!(
            event.0.get(1),
            Some(&("str", "dangling".to_owned(), format!("{NO_VALUE:?}")))
        );
    }

    #[test]
    fn non_string_key_is_replaced() {
        let mut event = SetterLog::default();
        encode_fields(&mut event, &crate::kv![42_i64, "value"]);

        assert_eq!(event.0.first().map(|f| f.1.as_str()), Some(NON_STRING_KEY));
    }

    #[test]
    fn values_reach_the_most_specific_setter() {
        let mut event = SetterLog::default();
        encode_fields(
            &mut event,
            &crate::kv![
                "s", "text",
                "b", vec![1_u8, 2],
                "flag", true,
                "narrow", 7_i8,
                "i32", 7_i32,
                "unsigned", 7_u16,
                "float", 1.5_f32,
                "dur", Duration::from_millis(5),
                "list", vec![1_i16, 2],
                "ip", Ipv4Addr::LOCALHOST,
                "net", IpPrefix::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 0)), 8),
                "mac", HardwareAddr::from([1, 2, 3, 4, 5, 6]),
                "raw", serde_json::json!({"k": 1}),
                "err", Value::error(Broken),
                "errs", Value::errors([Broken, Broken]),
                "other", Value::debug((1, 2)),
            ],
        );

        assert_eq!(
            event.setters(),
            [
                "str",
                "bytes",
                "bool",
                "i64",
                "i32",
                "u64",
                "f64",
                "duration",
                "i64s",
                "ip_addr",
                "ip_prefix",
                "hardware_addr",
                "raw_json",
                "error",
                "errors",
                "any",
            ]
        );
    }

    #[test]
    fn duplicate_keys_are_kept_in_order() {
        let mut event = SetterLog::default();
        encode_fields(&mut event, &crate::kv!["k", 1_i64, "k", 2_i64]);

        let values: Vec<_> = event.0.iter().map(|f| f.2.as_str()).collect();
        assert_eq!(values, ["1", "2"]);
    }

    #[test]
    fn pad_odd_appends_exactly_one_sentinel() {
        let mut kv = crate::kv!["a", 1_i64, "b"].to_vec();
        pad_odd(&mut kv);
        assert_eq!(kv.len(), 4);
        assert_eq!(kv.last().and_then(Value::as_str), Some(NO_VALUE));

        pad_odd(&mut kv);
        assert_eq!(kv.len(), 4);
    }
}
