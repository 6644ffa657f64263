//! `log_sink` adapts leveled, free-form key/value logging calls onto a structured event writer.
//!
//! It offers:
//! - A [`Logger`] handle with `info`/`error` calls taking a message and a flat key/value list,
//!   and cheap derivation of handles carrying extra values, a hierarchical name, a higher
//!   verbosity, or a deeper call-site offset.
//! - A typed [`Value`] for the key/value list, dispatched onto the most specific field setter of
//!   the writer's [`Event`].
//! - A [`LevelMapper`] translating verbosity numbers into [`Level`]s.
//! - The [`EventWriter`] interface to plug in a writer, and a bundled [`JsonEventWriter`]
//!   (behind the `json` feature) with [`build_json_writer`] to construct it for the console or
//!   for rolling files.
//!
//! Handles are immutable: deriving one never changes the handle it was derived from, so they can
//! be shared across threads without coordination.
//!
//! # Example
//!
//! ```
//! use log_sink::{JsonEventWriter, JsonWriterConfig, LevelFilter, Logger, kv};
//!
//! let config = JsonWriterConfig {
//!     max_level: LevelFilter::DEBUG,
//!     ..JsonWriterConfig::default()
//! };
//! let log = Logger::new(JsonEventWriter::new(config, std::io::stdout)?)
//!     .with_name("MyName")
//!     .with_values(&kv!["module", "example"]);
//!
//! log.info("hello", &kv!["val1", 1, "val2", serde_json::json!({"k": 1})]);
//! log.v(1).info("you should see this", &[]);
//! log.v(1).v(1).info("you should NOT see this", &[]);
//! log.error(None, "uh oh", &kv!["trouble", true, "reasons", vec![0.1, 0.11, 3.5]]);
//!
//! let err = std::io::Error::other("an error occurred");
//! log.error(Some(&err), "goodbye", &kv!["code", -1]);
//! # Ok::<(), log_sink::LoggerError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod depth;
mod encoder;
#[cfg(feature = "json")]
mod json;
mod level;
mod logger;
mod name;
mod sink;
#[cfg(test)]
mod testing;
mod value;
mod writer;

#[cfg(feature = "json")]
pub use self::json::{
    Destination, FileLoggingConfig, JsonEvent, JsonEventWriter, JsonFormat, JsonLogging,
    JsonWriterConfig, Rotation, build_json_writer,
};
pub use self::{
    depth::RuntimeInfo,
    encoder::{NO_VALUE, NON_STRING_KEY},
    level::{EventKind, LevelMapper},
    logger::Logger,
    sink::LogSink,
    value::{HardwareAddr, IpPrefix, SharedError, Value},
    writer::{Event, EventWriter, Level, LevelFilter},
};

/// Builds a `[Value; N]` from alternating keys and values, converting each with [`Value::from`].
///
/// ```
/// use log_sink::kv;
///
/// let pairs = kv!["port", 8080, "tls", true];
/// assert_eq!(pairs.len(), 4);
/// assert_eq!(pairs[0].as_str(), Some("port"));
/// ```
#[macro_export]
macro_rules! kv {
    ($($item:expr),* $(,)?) => {
        [$($crate::Value::from($item)),*]
    };
}

/// Configuration shared by a [`Logger`] and every handle derived from it.
#[derive(Debug, Clone)]
pub struct LogSinkConfig {
    /// Key under which the logger's name is written.
    pub name_key: String,

    /// Separator placed between name segments.
    pub name_separator: String,

    /// Key under which the verbosity of info events is written.
    pub verbosity_key: String,

    /// Key under which the error passed to [`Logger::error`] is written.
    pub error_key: String,

    /// Mapping from verbosity to severity, and the highest enabled verbosity.
    pub levels: LevelMapper,
}

impl LogSinkConfig {
    /// Checks that every key and the name separator are non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::Configuration`] naming the first empty setting.
    pub fn validate(&self) -> Result<(), LoggerError> {
        let settings = [
            ("name_key", &self.name_key),
            ("name_separator", &self.name_separator),
            ("verbosity_key", &self.verbosity_key),
            ("error_key", &self.error_key),
        ];

        for (setting, value) in settings {
            if value.is_empty() {
                return Err(LoggerError::Configuration(format!(
                    "`{setting}` must not be empty"
                )));
            }
        }

        Ok(())
    }
}

impl Default for LogSinkConfig {
    fn default() -> Self {
        Self {
            name_key: "logger".to_string(),
            name_separator: "/".to_string(),
            verbosity_key: "v".to_string(),
            error_key: "error".to_string(),
            levels: LevelMapper::default(),
        }
    }
}

/// Errors that can occur while setting up a logger.
///
/// Logging calls themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Represents an error in configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Represents an error during JSON serialization.
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// Represents an error during initialization of the rolling file appender.
    #[cfg(feature = "json")]
    #[error("Failed to initialize rolling file appender: {0}")]
    FileAppenderInitialization(#[from] tracing_appender::rolling::InitError),
}
