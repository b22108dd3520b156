//! The aggregator contract: record, merge-and-reset, point snapshots.
//!
//! One [`Aggregator`] instance accumulates measurements for one
//! (instrument, label-set) timeseries. Instrumentation threads call
//! [`record_long`](Aggregator::record_long) /
//! [`record_double`](Aggregator::record_double) concurrently with unbounded
//! arrival rate; a collection cycle periodically calls
//! [`merge_to_and_reset`](Aggregator::merge_to_and_reset) to drain the open
//! window into an ephemeral accumulator, then
//! [`to_point`](Aggregator::to_point) on that accumulator to obtain the
//! immutable snapshot handed to the exporter.
//!
//! Merge-and-reset is the linearization point between windows: a recording
//! that completes before it is included in the drained snapshot, one that
//! starts after it counts toward the next window, and a concurrent one
//! lands whole in exactly one of the two — never split, never lost.

use crate::factory::AggregatorKind;
use crate::last_value::LongLastValue;
use crate::min_max_sum_count::{DoubleMinMaxSumCount, LongMinMaxSumCount};
use crate::point::{Labels, Point};
use crate::sum::{DoubleSum, LongSum};

/// A per-timeseries accumulator.
///
/// All methods take `&self`; share one instance between the recording
/// threads and the collection path with `Arc`. Each variant accepts only
/// its native numeric domain — recording through the foreign-typed method
/// is a no-op, never an error (see [`record_long`](Self::record_long)).
#[derive(Debug)]
pub enum Aggregator {
    /// Running i64 total.
    LongSum(LongSum),
    /// Running f64 total.
    DoubleSum(DoubleSum),
    /// i64 min/max/sum/count summary.
    LongMinMaxSumCount(LongMinMaxSumCount),
    /// f64 min/max/sum/count summary.
    DoubleMinMaxSumCount(DoubleMinMaxSumCount),
    /// Most recent i64 value, for observer-style instruments.
    LongLastValue(LongLastValue),
    /// Discards everything; used when an instrument or pipeline is
    /// disabled.
    Noop,
}

impl Aggregator {
    /// Update the accumulator with a newly recorded i64 value.
    ///
    /// On variants whose native domain is f64 this is a no-op: the call is
    /// permitted from generic instrumentation code, but there is no
    /// meaningful coercion, so the value is discarded.
    pub fn record_long(&self, value: i64) {
        match self {
            Aggregator::LongSum(sum) => sum.record(value),
            Aggregator::LongMinMaxSumCount(summary) => summary.record(value),
            Aggregator::LongLastValue(last) => last.record(value),
            Aggregator::DoubleSum(_) | Aggregator::DoubleMinMaxSumCount(_) | Aggregator::Noop => {}
        }
    }

    /// Update the accumulator with a newly recorded f64 value.
    ///
    /// On variants whose native domain is i64 this is a no-op.
    pub fn record_double(&self, value: f64) {
        match self {
            Aggregator::DoubleSum(sum) => sum.record(value),
            Aggregator::DoubleMinMaxSumCount(summary) => summary.record(value),
            Aggregator::LongSum(_)
            | Aggregator::LongMinMaxSumCount(_)
            | Aggregator::LongLastValue(_)
            | Aggregator::Noop => {}
        }
    }

    /// Atomically read this aggregator's open window, reset it to the
    /// variant's zero value, and fold the drained state into `target`.
    ///
    /// Sums and counts add, minima and maxima combine, a last value
    /// overwrites the target's value — but only when this aggregator
    /// actually recorded one. When nothing was recorded since the last
    /// reset, the call leaves `target` untouched.
    ///
    /// # Panics
    ///
    /// Panics when `target` is a different concrete variant. Folding, say,
    /// a summary into a running total would produce numerically
    /// meaningless results, so the mismatch fails fast instead of
    /// coercing. A `Noop` source is the exception: it has nothing to
    /// merge and ignores the target entirely.
    pub fn merge_to_and_reset(&self, target: &Aggregator) {
        match (self, target) {
            (Aggregator::Noop, _) => {}
            (Aggregator::LongSum(source), Aggregator::LongSum(target)) => {
                source.merge_to_and_reset(target);
            }
            (Aggregator::DoubleSum(source), Aggregator::DoubleSum(target)) => {
                source.merge_to_and_reset(target);
            }
            (Aggregator::LongMinMaxSumCount(source), Aggregator::LongMinMaxSumCount(target)) => {
                source.merge_to_and_reset(target);
            }
            (
                Aggregator::DoubleMinMaxSumCount(source),
                Aggregator::DoubleMinMaxSumCount(target),
            ) => {
                source.merge_to_and_reset(target);
            }
            (Aggregator::LongLastValue(source), Aggregator::LongLastValue(target)) => {
                source.merge_to_and_reset(target);
            }
            (source, target) => panic!(
                "aggregator variant mismatch: cannot merge {:?} into {:?}",
                source.kind(),
                target.kind()
            ),
        }
    }

    /// Return an immutable point reflecting the current accumulator state,
    /// bound to the given collection window and label set.
    ///
    /// Read-only: the accumulator is not reset. Returns `None` when there
    /// is nothing to report — the count is zero, or no value has been
    /// recorded since the last reset. Intended for the merged accumulator
    /// that `merge_to_and_reset` populated, not the live per-thread one.
    pub fn to_point(
        &self,
        start_epoch_nanos: u64,
        epoch_nanos: u64,
        labels: &Labels,
    ) -> Option<Point> {
        match self {
            Aggregator::LongSum(sum) => sum.to_point(start_epoch_nanos, epoch_nanos, labels),
            Aggregator::DoubleSum(sum) => sum.to_point(start_epoch_nanos, epoch_nanos, labels),
            Aggregator::LongMinMaxSumCount(summary) => {
                summary.to_point(start_epoch_nanos, epoch_nanos, labels)
            }
            Aggregator::DoubleMinMaxSumCount(summary) => {
                summary.to_point(start_epoch_nanos, epoch_nanos, labels)
            }
            Aggregator::LongLastValue(last) => {
                last.to_point(start_epoch_nanos, epoch_nanos, labels)
            }
            Aggregator::Noop => None,
        }
    }

    /// Whether at least one recording has occurred since the last reset.
    pub fn has_recordings(&self) -> bool {
        match self {
            Aggregator::LongSum(sum) => sum.has_recordings(),
            Aggregator::DoubleSum(sum) => sum.has_recordings(),
            Aggregator::LongMinMaxSumCount(summary) => summary.has_recordings(),
            Aggregator::DoubleMinMaxSumCount(summary) => summary.has_recordings(),
            Aggregator::LongLastValue(last) => last.has_recordings(),
            Aggregator::Noop => false,
        }
    }

    /// The concrete variant of this aggregator.
    pub fn kind(&self) -> AggregatorKind {
        match self {
            Aggregator::LongSum(_) => AggregatorKind::LongSum,
            Aggregator::DoubleSum(_) => AggregatorKind::DoubleSum,
            Aggregator::LongMinMaxSumCount(_) => AggregatorKind::LongMinMaxSumCount,
            Aggregator::DoubleMinMaxSumCount(_) => AggregatorKind::DoubleMinMaxSumCount,
            Aggregator::LongLastValue(_) => AggregatorKind::LongLastValue,
            Aggregator::Noop => AggregatorKind::Noop,
        }
    }
}
