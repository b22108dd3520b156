//! Lock-free running-total aggregators.
//!
//! Sum state is a single machine word, so recording is a plain atomic
//! read-modify-write and never blocks: `fetch_add` for i64, a
//! compare-and-swap retry loop over the bit pattern for f64 (there is no
//! native atomic f64 add). A separate recorded-flag distinguishes "total is
//! zero" from "nothing recorded since the last reset"; the flag and the
//! value are two words, so a recording racing a merge may land in either
//! collection window, but always lands whole in exactly one.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

use crate::point::{DoublePoint, Labels, LongPoint, Point};

/// Running i64 total.
///
/// Overflow wraps (two's complement, the semantics of `fetch_add`). A
/// counter adding one per nanosecond takes centuries to wrap; pipelines
/// that cannot tolerate it should collect often enough to keep window
/// totals small.
#[derive(Debug)]
pub struct LongSum {
    current: AtomicI64,
    recorded: AtomicBool,
}

impl LongSum {
    pub(crate) fn new() -> Self {
        Self {
            current: AtomicI64::new(0),
            recorded: AtomicBool::new(false),
        }
    }

    pub(crate) fn record(&self, value: i64) {
        self.current.fetch_add(value, Ordering::Relaxed);
        self.recorded.store(true, Ordering::Relaxed);
    }

    pub(crate) fn merge_to_and_reset(&self, target: &LongSum) {
        let had_recordings = self.recorded.swap(false, Ordering::Relaxed);
        let drained = self.current.swap(0, Ordering::Relaxed);
        target.current.fetch_add(drained, Ordering::Relaxed);
        if had_recordings {
            target.recorded.store(true, Ordering::Relaxed);
        }
    }

    pub(crate) fn to_point(
        &self,
        start_epoch_nanos: u64,
        epoch_nanos: u64,
        labels: &Labels,
    ) -> Option<Point> {
        if !self.has_recordings() {
            return None;
        }
        Some(Point::Long(LongPoint::new(
            start_epoch_nanos,
            epoch_nanos,
            labels.clone(),
            self.current.load(Ordering::Relaxed),
        )))
    }

    pub(crate) fn has_recordings(&self) -> bool {
        self.recorded.load(Ordering::Relaxed)
    }
}

/// Running f64 total.
///
/// Accumulation follows IEEE-754: a total that exceeds the representable
/// range saturates at infinity.
#[derive(Debug)]
pub struct DoubleSum {
    // f64 bit pattern; all access goes through from_bits/to_bits
    current: AtomicU64,
    recorded: AtomicBool,
}

impl DoubleSum {
    pub(crate) fn new() -> Self {
        Self {
            current: AtomicU64::new(0f64.to_bits()),
            recorded: AtomicBool::new(false),
        }
    }

    fn add(&self, value: f64) {
        let mut current = self.current.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(current) + value).to_bits();
            match self
                .current
                .compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    pub(crate) fn record(&self, value: f64) {
        self.add(value);
        self.recorded.store(true, Ordering::Relaxed);
    }

    pub(crate) fn merge_to_and_reset(&self, target: &DoubleSum) {
        let had_recordings = self.recorded.swap(false, Ordering::Relaxed);
        let drained = f64::from_bits(self.current.swap(0f64.to_bits(), Ordering::Relaxed));
        target.add(drained);
        if had_recordings {
            target.recorded.store(true, Ordering::Relaxed);
        }
    }

    pub(crate) fn to_point(
        &self,
        start_epoch_nanos: u64,
        epoch_nanos: u64,
        labels: &Labels,
    ) -> Option<Point> {
        if !self.has_recordings() {
            return None;
        }
        Some(Point::Double(DoublePoint::new(
            start_epoch_nanos,
            epoch_nanos,
            labels.clone(),
            f64::from_bits(self.current.load(Ordering::Relaxed)),
        )))
    }

    pub(crate) fn has_recordings(&self) -> bool {
        self.recorded.load(Ordering::Relaxed)
    }
}
