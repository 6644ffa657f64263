//! Accounting of the stack frames a writer should skip when resolving the call site.

/// Frames contributed by the sink itself between the public logging call and the writer:
/// the [`LogSink`][crate::LogSink] method and the shared emit path.
pub(crate) const ADAPTER_FRAMES: usize = 2;

/// Information supplied once when a sink is attached to a [`Logger`][crate::Logger].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RuntimeInfo {
    /// Frames added by whatever wraps the sink (the [`Logger`][crate::Logger] handle itself).
    pub call_depth: usize,
}

/// The number of frames to skip, accumulated along a chain of derived handles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct CallDepth(usize);

impl CallDepth {
    /// Folds the wrapper's frames and the sink's own frames into the offset.
    pub(crate) fn init(self, info: RuntimeInfo) -> Self {
        Self(
            self.0
                .saturating_add(info.call_depth)
                .saturating_add(ADAPTER_FRAMES),
        )
    }

    /// Adds `frames` more frames to skip.
    pub(crate) fn add(self, frames: usize) -> Self {
        Self(self.0.saturating_add(frames))
    }

    pub(crate) fn frames(self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_includes_adapter_frames() {
        let depth = CallDepth::default().init(RuntimeInfo { call_depth: 1 });
        assert_eq!(depth.frames(), 1 + ADAPTER_FRAMES);
    }

    #[test]
    fn additions_are_order_independent() {
        let base = CallDepth::default().init(RuntimeInfo { call_depth: 1 });
        assert_eq!(base.add(2).add(3), base.add(3).add(2));
        assert_eq!(base.add(2).add(3).frames(), base.frames() + 5);
        assert!(base.add(0) >= base);
    }
}
