//! Translation of verbosity numbers into writer severities.

use tracing::Level;

use crate::LoggerError;

/// Which logging call produced an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// An informational message emitted by [`Logger::info`][crate::Logger::info].
    Info,

    /// An error emitted by [`Logger::error`][crate::Logger::error].
    Error,
}

/// Maps verbosity levels (0 = always relevant, higher = more detailed) onto severity tiers.
///
/// Verbosity 0 maps to [`Level::INFO`], verbosities `1..coalesce_at` map to [`Level::DEBUG`], and
/// every verbosity from `coalesce_at` upwards maps to [`Level::TRACE`]. Independently of that,
/// [`LevelMapper::enabled`] accepts only verbosities up to `max_verbosity`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelMapper {
    coalesce_at: u32,
    max_verbosity: u32,
}

impl LevelMapper {
    /// The first verbosity mapped onto [`Level::TRACE`] by default.
    pub const DEFAULT_COALESCE_AT: u32 = 2;

    /// The highest verbosity considered enabled by default.
    pub const DEFAULT_MAX_VERBOSITY: u32 = 2;

    /// Creates a mapper.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::Configuration`] if `coalesce_at` is zero, since verbosity 0 is
    /// always the info tier.
    pub fn new(coalesce_at: u32, max_verbosity: u32) -> Result<Self, LoggerError> {
        if coalesce_at == 0 {
            return Err(LoggerError::Configuration(
                "verbosity 0 must map to the info tier, `coalesce_at` must be at least 1"
                    .to_string(),
            ));
        }

        Ok(Self {
            coalesce_at,
            max_verbosity,
        })
    }

    /// The first verbosity mapped onto [`Level::TRACE`].
    pub fn coalesce_at(self) -> u32 {
        self.coalesce_at
    }

    /// The highest verbosity considered enabled.
    pub fn max_verbosity(self) -> u32 {
        self.max_verbosity
    }

    /// Whether events at `verbosity` should be produced at all.
    #[inline]
    pub fn enabled(self, verbosity: u32) -> bool {
        verbosity <= self.max_verbosity
    }

    /// The severity an info event at `verbosity` is written with.
    pub fn severity(self, verbosity: u32) -> Level {
        match verbosity {
            0 => Level::INFO,
            v if v < self.coalesce_at => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// The verbosity to record as a field on an event of the given kind, if any.
    ///
    /// Error events carry a fixed severity, so no verbosity is recorded for them.
    pub fn recorded_verbosity(self, kind: EventKind, verbosity: u32) -> Option<u32> {
        match kind {
            EventKind::Info => Some(verbosity),
            EventKind::Error => None,
        }
    }
}

impl Default for LevelMapper {
    fn default() -> Self {
        Self {
            coalesce_at: Self::DEFAULT_COALESCE_AT,
            max_verbosity: Self::DEFAULT_MAX_VERBOSITY,
        }
    }
}
