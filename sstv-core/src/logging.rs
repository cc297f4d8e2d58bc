//! Observer-callback logging.
//!
//! The decoder never owns a logging sink. Instead, a caller may supply a
//! type implementing [`DecoderObserver`] at construction; every hook
//! defaults to a no-op so the hot `push_samples` path costs nothing when
//! nobody is watching.

use crate::sync::SyncWidth;

/// A sync pulse was accepted and used to close out a scan line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncObserved {
    pub width: SyncWidth,
    pub freq_offset: f64,
}

/// A line decoder produced image rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineDecoded {
    pub row: usize,
    pub rows: u8,
}

/// A sync pulse was detected but discarded (bad width, bad frequency, or
/// debounced as too close to the previous accepted sync).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseRejected {
    pub width: SyncWidth,
}

/// Observer hooks for decoder lifecycle and line events.
///
/// All methods default to doing nothing, matching the "no process-wide
/// sink" design: a caller opts in to exactly the events it cares about.
pub trait DecoderObserver {
    fn on_sync(&mut self, _event: SyncObserved) {}
    fn on_line(&mut self, _event: LineDecoded) {}
    fn on_reject(&mut self, _event: PulseRejected) {}
}

/// The default observer: observes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DecoderObserver for NoopObserver {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        syncs: usize,
        lines: usize,
        rejects: usize,
    }

    impl DecoderObserver for Counting {
        fn on_sync(&mut self, _event: SyncObserved) {
            self.syncs += 1;
        }
        fn on_line(&mut self, _event: LineDecoded) {
            self.lines += 1;
        }
        fn on_reject(&mut self, _event: PulseRejected) {
            self.rejects += 1;
        }
    }

    #[test]
    fn noop_observer_is_inert() {
        let mut obs = NoopObserver;
        obs.on_sync(SyncObserved { width: SyncWidth::Nine, freq_offset: 0.0 });
        obs.on_line(LineDecoded { row: 0, rows: 1 });
        obs.on_reject(PulseRejected { width: SyncWidth::Five });
    }

    #[test]
    fn counting_observer_tallies_events() {
        let mut obs = Counting::default();
        obs.on_sync(SyncObserved { width: SyncWidth::Twenty, freq_offset: 0.1 });
        obs.on_line(LineDecoded { row: 2, rows: 2 });
        obs.on_reject(PulseRejected { width: SyncWidth::Five });
        assert_eq!(obs.syncs, 1);
        assert_eq!(obs.lines, 1);
        assert_eq!(obs.rejects, 1);
    }
}
