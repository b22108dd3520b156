//! Locked min/max/sum/count summary aggregators.
//!
//! Unlike the sum aggregators, a summary has four fields that must reflect
//! one coherent snapshot — a point with the count of one window and the
//! maximum of another would be wrong. A single atomic word cannot carry all
//! four, so the fields live in a plain struct behind a readers-writer lock:
//! recordings and merges take the write lock, point reads take the read
//! lock. Critical sections are a handful of arithmetic operations; no lock
//! is ever held across another lock acquisition.

use std::sync::RwLock;

use smallvec::smallvec;

use crate::point::{Labels, Point, SummaryPoint, ValueAtPercentile};

/// Numeric domain of a summary aggregator. Implemented for `i64` and `f64`.
pub(crate) trait SummaryValue: Copy {
    const ZERO: Self;
    /// Sentinel that any recorded value replaces on the first min fold.
    const EMPTY_MIN: Self;
    /// Sentinel that any recorded value replaces on the first max fold.
    const EMPTY_MAX: Self;

    fn accumulate(sum: Self, value: Self) -> Self;
    fn min(a: Self, b: Self) -> Self;
    fn max(a: Self, b: Self) -> Self;
    fn into_f64(self) -> f64;
}

impl SummaryValue for i64 {
    const ZERO: i64 = 0;
    const EMPTY_MIN: i64 = i64::MAX;
    const EMPTY_MAX: i64 = i64::MIN;

    // wrapping, consistent with the i64 sum aggregator
    fn accumulate(sum: i64, value: i64) -> i64 {
        sum.wrapping_add(value)
    }

    fn min(a: i64, b: i64) -> i64 {
        a.min(b)
    }

    fn max(a: i64, b: i64) -> i64 {
        a.max(b)
    }

    fn into_f64(self) -> f64 {
        self as f64
    }
}

impl SummaryValue for f64 {
    const ZERO: f64 = 0.0;
    const EMPTY_MIN: f64 = f64::INFINITY;
    const EMPTY_MAX: f64 = f64::NEG_INFINITY;

    fn accumulate(sum: f64, value: f64) -> f64 {
        sum + value
    }

    fn min(a: f64, b: f64) -> f64 {
        a.min(b)
    }

    fn max(a: f64, b: f64) -> f64 {
        a.max(b)
    }

    fn into_f64(self) -> f64 {
        self
    }
}

#[derive(Debug)]
struct SummaryState<T> {
    sum: T,
    count: u64,
    min: T,
    max: T,
}

impl<T: SummaryValue> SummaryState<T> {
    fn empty() -> Self {
        Self {
            sum: T::ZERO,
            count: 0,
            min: T::EMPTY_MIN,
            max: T::EMPTY_MAX,
        }
    }
}

/// Min/max/sum/count aggregator over one numeric domain.
///
/// `count == 0` means nothing has been recorded since the last reset, and
/// `min <= max` holds whenever `count > 0`.
#[derive(Debug)]
pub struct MinMaxSumCount<T> {
    current: RwLock<SummaryState<T>>,
}

/// Summary aggregator over i64 values.
pub type LongMinMaxSumCount = MinMaxSumCount<i64>;

/// Summary aggregator over f64 values.
pub type DoubleMinMaxSumCount = MinMaxSumCount<f64>;

impl<T: SummaryValue> MinMaxSumCount<T> {
    pub(crate) fn new() -> Self {
        Self {
            current: RwLock::new(SummaryState::empty()),
        }
    }

    pub(crate) fn record(&self, value: T) {
        let mut state = self.current.write().unwrap();
        state.count += 1;
        state.sum = T::accumulate(state.sum, value);
        state.min = T::min(value, state.min);
        state.max = T::max(value, state.max);
    }

    /// Drain this summary and fold it into `target`.
    ///
    /// The source is drained to locals under its own lock, then folded
    /// under the target's lock; the two locks are never held at once, so
    /// two aggregators merging into each other in different orders across
    /// cycles cannot deadlock. A recording that lands before the source
    /// lock is acquired is part of the drained snapshot; one that lands
    /// after belongs entirely to the next window.
    pub(crate) fn merge_to_and_reset(&self, target: &Self) {
        let drained = {
            let mut state = self.current.write().unwrap();
            if state.count == 0 {
                return;
            }
            std::mem::replace(&mut *state, SummaryState::empty())
        };

        let mut state = target.current.write().unwrap();
        state.count += drained.count;
        state.sum = T::accumulate(state.sum, drained.sum);
        state.min = T::min(drained.min, state.min);
        state.max = T::max(drained.max, state.max);
    }

    pub(crate) fn to_point(
        &self,
        start_epoch_nanos: u64,
        epoch_nanos: u64,
        labels: &Labels,
    ) -> Option<Point> {
        let state = self.current.read().unwrap();
        if state.count == 0 {
            return None;
        }
        Some(Point::Summary(SummaryPoint {
            start_epoch_nanos,
            epoch_nanos,
            labels: labels.clone(),
            count: state.count,
            sum: state.sum.into_f64(),
            percentile_values: smallvec![
                ValueAtPercentile::new(0.0, state.min.into_f64()),
                ValueAtPercentile::new(100.0, state.max.into_f64()),
            ],
        }))
    }

    pub(crate) fn has_recordings(&self) -> bool {
        self.current.read().unwrap().count > 0
    }
}
