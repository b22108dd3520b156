//! Cross-thread behavior of the aggregators: concurrent recording, and
//! collection cycles racing the recording path.

use assert2::{check, let_assert};
use telemark_aggregation::{AggregatorFactory, Labels, Point};

#[test]
fn three_concurrent_recorders_fold_into_one_summary() {
    let aggregator = AggregatorFactory::LONG_MIN_MAX_SUM_COUNT.new_instance();

    std::thread::scope(|scope| {
        for value in [5, -3, 10] {
            let aggregator = &aggregator;
            scope.spawn(move || aggregator.record_long(value));
        }
    });

    let target = AggregatorFactory::LONG_MIN_MAX_SUM_COUNT.new_instance();
    aggregator.merge_to_and_reset(&target);

    let_assert!(Some(Point::Summary(point)) = target.to_point(0, 100, &Labels::empty()));
    check!(point.count == 3);
    check!(point.sum == 12.0);
    check!(point.percentile_values[0].percentile == 0.0);
    check!(point.percentile_values[0].value == -3.0);
    check!(point.percentile_values[1].percentile == 100.0);
    check!(point.percentile_values[1].value == 10.0);

    check!(!aggregator.has_recordings());
    check!(aggregator.to_point(0, 100, &Labels::empty()) == None);
}

#[test]
fn concurrent_sum_recordings_are_order_independent() {
    const THREADS: i64 = 8;
    const PER_THREAD: i64 = 1_000;

    let aggregator = AggregatorFactory::LONG_SUM.new_instance();

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            let aggregator = &aggregator;
            scope.spawn(move || {
                for value in 1..=PER_THREAD {
                    aggregator.record_long(value);
                }
            });
        }
    });

    let_assert!(Some(Point::Long(point)) = aggregator.to_point(0, 1, &Labels::empty()));
    check!(point.value == THREADS * PER_THREAD * (PER_THREAD + 1) / 2);
}

#[test]
fn collection_racing_recorders_never_loses_a_sum() {
    const THREADS: i64 = 4;
    const PER_THREAD: i64 = 10_000;

    let aggregator = AggregatorFactory::LONG_SUM.new_instance();
    let accumulator = AggregatorFactory::LONG_SUM.new_instance();

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            let aggregator = &aggregator;
            scope.spawn(move || {
                for _ in 0..PER_THREAD {
                    aggregator.record_long(1);
                }
            });
        }

        // Collection cycles run while the recorders are still going; each
        // drained window folds into the same accumulator.
        for _ in 0..100 {
            aggregator.merge_to_and_reset(&accumulator);
            std::thread::yield_now();
        }
    });

    // One final cycle for whatever landed after the last in-flight merge.
    aggregator.merge_to_and_reset(&accumulator);

    let_assert!(Some(Point::Long(point)) = accumulator.to_point(0, 1, &Labels::empty()));
    check!(point.value == THREADS * PER_THREAD);
}

#[test]
fn collection_racing_recorders_never_loses_a_summary_recording() {
    const THREADS: u64 = 4;
    const PER_THREAD: u64 = 2_000;

    let aggregator = AggregatorFactory::LONG_MIN_MAX_SUM_COUNT.new_instance();
    let accumulator = AggregatorFactory::LONG_MIN_MAX_SUM_COUNT.new_instance();

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            let aggregator = &aggregator;
            scope.spawn(move || {
                for _ in 0..PER_THREAD {
                    aggregator.record_long(3);
                }
            });
        }

        for _ in 0..100 {
            aggregator.merge_to_and_reset(&accumulator);
            std::thread::yield_now();
        }
    });

    aggregator.merge_to_and_reset(&accumulator);

    let_assert!(Some(Point::Summary(point)) = accumulator.to_point(0, 1, &Labels::empty()));
    check!(point.count == THREADS * PER_THREAD);
    check!(point.sum == (THREADS * PER_THREAD * 3) as f64);
    check!(point.percentile_values[0].value == 3.0);
    check!(point.percentile_values[1].value == 3.0);
}

#[test]
fn concurrent_double_recordings_accumulate_exactly() {
    // 0.25 is a power of two, so f64 addition is exact regardless of the
    // interleaving.
    const THREADS: usize = 8;
    const PER_THREAD: usize = 1_000;

    let aggregator = AggregatorFactory::DOUBLE_SUM.new_instance();

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            let aggregator = &aggregator;
            scope.spawn(move || {
                for _ in 0..PER_THREAD {
                    aggregator.record_double(0.25);
                }
            });
        }
    });

    let_assert!(Some(Point::Double(point)) = aggregator.to_point(0, 1, &Labels::empty()));
    check!(point.value == (THREADS * PER_THREAD) as f64 * 0.25);
}
