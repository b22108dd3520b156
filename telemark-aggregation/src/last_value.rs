//! Last-value aggregator for observer-style instruments.

use crossbeam_utils::atomic::AtomicCell;

use crate::point::{Labels, LongPoint, Point};

/// Holds the most recently recorded i64 value, or nothing since the last
/// reset.
///
/// The value does not carry the time it was recorded, so merging several
/// partial windows into one target does not preserve chronological order
/// between them. This is acceptable because last-value serves
/// observer-style instruments, which record exactly once per collection
/// cycle.
///
/// State is an `AtomicCell<Option<i64>>`, giving reset its
/// swap-with-unset in a single atomic operation. The payload is two words,
/// so the cell guards it with an internal lightweight lock on most targets;
/// the critical section is a single copy.
#[derive(Debug)]
pub struct LongLastValue {
    current: AtomicCell<Option<i64>>,
}

impl LongLastValue {
    pub(crate) fn new() -> Self {
        Self {
            current: AtomicCell::new(None),
        }
    }

    pub(crate) fn record(&self, value: i64) {
        self.current.store(Some(value));
    }

    /// Take this aggregator's value, leaving it unset, and overwrite the
    /// target's value with it. When nothing was recorded since the last
    /// reset the target keeps whatever value it already holds.
    pub(crate) fn merge_to_and_reset(&self, target: &Self) {
        if let Some(value) = self.current.swap(None) {
            target.current.store(Some(value));
        }
    }

    pub(crate) fn to_point(
        &self,
        start_epoch_nanos: u64,
        epoch_nanos: u64,
        labels: &Labels,
    ) -> Option<Point> {
        self.current.load().map(|value| {
            Point::Long(LongPoint::new(
                start_epoch_nanos,
                epoch_nanos,
                labels.clone(),
                value,
            ))
        })
    }

    pub(crate) fn has_recordings(&self) -> bool {
        self.current.load().is_some()
    }
}
