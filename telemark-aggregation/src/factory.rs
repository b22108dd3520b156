//! Factories that instantiate one aggregator per (instrument, label-set)
//! pair.

use crate::aggregator::Aggregator;
use crate::last_value::LongLastValue;
use crate::min_max_sum_count::{DoubleMinMaxSumCount, LongMinMaxSumCount};
use crate::sum::{DoubleSum, LongSum};

/// Identifies one concrete aggregator variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AggregatorKind {
    /// Running i64 total.
    LongSum,
    /// Running f64 total.
    DoubleSum,
    /// i64 min/max/sum/count summary.
    LongMinMaxSumCount,
    /// f64 min/max/sum/count summary.
    DoubleMinMaxSumCount,
    /// Most recent i64 value.
    LongLastValue,
    /// Discards everything.
    Noop,
}

/// Stateless creator bound to one aggregator variant.
///
/// Factories are plain `Copy` values with no teardown; use the associated
/// constants rather than constructing them. The metrics pipeline calls
/// [`new_instance`](Self::new_instance) once per tracked (instrument,
/// label-set) pair; instances produced by one factory share nothing beyond
/// their variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AggregatorFactory {
    kind: AggregatorKind,
}

impl AggregatorFactory {
    /// Produces [`Aggregator::LongSum`] instances.
    pub const LONG_SUM: AggregatorFactory = AggregatorFactory {
        kind: AggregatorKind::LongSum,
    };

    /// Produces [`Aggregator::DoubleSum`] instances.
    pub const DOUBLE_SUM: AggregatorFactory = AggregatorFactory {
        kind: AggregatorKind::DoubleSum,
    };

    /// Produces [`Aggregator::LongMinMaxSumCount`] instances.
    pub const LONG_MIN_MAX_SUM_COUNT: AggregatorFactory = AggregatorFactory {
        kind: AggregatorKind::LongMinMaxSumCount,
    };

    /// Produces [`Aggregator::DoubleMinMaxSumCount`] instances.
    pub const DOUBLE_MIN_MAX_SUM_COUNT: AggregatorFactory = AggregatorFactory {
        kind: AggregatorKind::DoubleMinMaxSumCount,
    };

    /// Produces [`Aggregator::LongLastValue`] instances.
    pub const LONG_LAST_VALUE: AggregatorFactory = AggregatorFactory {
        kind: AggregatorKind::LongLastValue,
    };

    /// Produces [`Aggregator::Noop`] instances.
    pub const NOOP: AggregatorFactory = AggregatorFactory {
        kind: AggregatorKind::Noop,
    };

    /// The variant this factory produces.
    pub fn kind(&self) -> AggregatorKind {
        self.kind
    }

    /// Return a freshly zeroed aggregator of this factory's variant.
    pub fn new_instance(&self) -> Aggregator {
        match self.kind {
            AggregatorKind::LongSum => Aggregator::LongSum(LongSum::new()),
            AggregatorKind::DoubleSum => Aggregator::DoubleSum(DoubleSum::new()),
            AggregatorKind::LongMinMaxSumCount => {
                Aggregator::LongMinMaxSumCount(LongMinMaxSumCount::new())
            }
            AggregatorKind::DoubleMinMaxSumCount => {
                Aggregator::DoubleMinMaxSumCount(DoubleMinMaxSumCount::new())
            }
            AggregatorKind::LongLastValue => Aggregator::LongLastValue(LongLastValue::new()),
            AggregatorKind::Noop => Aggregator::Noop,
        }
    }
}
