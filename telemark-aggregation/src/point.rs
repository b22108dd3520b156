//! Immutable point snapshots produced at collection time.
//!
//! A point is a value object: it owns its data (the label set is cloned in)
//! and never aliases the mutable aggregator state it was read from, so it
//! can outlive the accumulation window and travel to an exporter on another
//! thread.

use smallvec::SmallVec;
use telemark_export::Record;

/// Opaque label set identifying one timeseries.
///
/// An unordered key-value mapping with unique keys. The aggregation engine
/// never inspects label contents; callers own the (instrument, label-set) →
/// aggregator mapping and supply the labels again at collection time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Labels {
    entries: hashbrown::HashMap<String, String>,
}

impl Labels {
    /// The empty label set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up the value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of labels in the set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no labels.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the labels in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Labels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A (percentile, value) pair carried by a [`SummaryPoint`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueAtPercentile {
    /// Percentile in `[0.0, 100.0]`.
    pub percentile: f64,
    /// Value at that percentile.
    pub value: f64,
}

impl ValueAtPercentile {
    /// Create a percentile-value pair.
    pub fn new(percentile: f64, value: f64) -> Self {
        Self { percentile, value }
    }
}

/// An i64 total or last value bound to a collection window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LongPoint {
    /// Window start, nanoseconds since the Unix epoch.
    pub start_epoch_nanos: u64,
    /// Window end, nanoseconds since the Unix epoch.
    pub epoch_nanos: u64,
    /// Label set of the timeseries this point belongs to.
    pub labels: Labels,
    /// The recorded value.
    pub value: i64,
}

impl LongPoint {
    /// Create a point.
    pub fn new(start_epoch_nanos: u64, epoch_nanos: u64, labels: Labels, value: i64) -> Self {
        Self {
            start_epoch_nanos,
            epoch_nanos,
            labels,
            value,
        }
    }
}

/// An f64 total bound to a collection window.
#[derive(Clone, Debug, PartialEq)]
pub struct DoublePoint {
    /// Window start, nanoseconds since the Unix epoch.
    pub start_epoch_nanos: u64,
    /// Window end, nanoseconds since the Unix epoch.
    pub epoch_nanos: u64,
    /// Label set of the timeseries this point belongs to.
    pub labels: Labels,
    /// The recorded value.
    pub value: f64,
}

impl DoublePoint {
    /// Create a point.
    pub fn new(start_epoch_nanos: u64, epoch_nanos: u64, labels: Labels, value: f64) -> Self {
        Self {
            start_epoch_nanos,
            epoch_nanos,
            labels,
            value,
        }
    }
}

/// A min/max/sum/count summary bound to a collection window.
///
/// The sum is widened to `f64` when the point is built; the minimum and
/// maximum ride along as the 0.0 and 100.0 percentile values.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryPoint {
    /// Window start, nanoseconds since the Unix epoch.
    pub start_epoch_nanos: u64,
    /// Window end, nanoseconds since the Unix epoch.
    pub epoch_nanos: u64,
    /// Label set of the timeseries this point belongs to.
    pub labels: Labels,
    /// Number of recordings in the window. Always greater than zero; an
    /// empty summary produces no point at all.
    pub count: u64,
    /// Sum of the recorded values.
    pub sum: f64,
    /// Percentile values; two entries, minimum at 0.0 and maximum at 100.0.
    pub percentile_values: SmallVec<[ValueAtPercentile; 2]>,
}

/// An immutable snapshot of one aggregator bound to a collection window and
/// a label set, ready for export.
#[derive(Clone, Debug, PartialEq)]
pub enum Point {
    /// Produced by sum and last-value aggregators over i64.
    Long(LongPoint),
    /// Produced by sum aggregators over f64.
    Double(DoublePoint),
    /// Produced by min/max/sum/count aggregators.
    Summary(SummaryPoint),
}

impl Point {
    /// Window start, nanoseconds since the Unix epoch.
    pub fn start_epoch_nanos(&self) -> u64 {
        match self {
            Point::Long(point) => point.start_epoch_nanos,
            Point::Double(point) => point.start_epoch_nanos,
            Point::Summary(point) => point.start_epoch_nanos,
        }
    }

    /// Window end, nanoseconds since the Unix epoch.
    pub fn epoch_nanos(&self) -> u64 {
        match self {
            Point::Long(point) => point.epoch_nanos,
            Point::Double(point) => point.epoch_nanos,
            Point::Summary(point) => point.epoch_nanos,
        }
    }

    /// Label set of the timeseries this point belongs to.
    pub fn labels(&self) -> &Labels {
        match self {
            Point::Long(point) => &point.labels,
            Point::Double(point) => &point.labels,
            Point::Summary(point) => &point.labels,
        }
    }
}

impl Record for Point {}
