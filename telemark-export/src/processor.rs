//! A forwarding processor that hands each finished record directly to the
//! configured exporter.
//!
//! [`SimpleProcessor`] keeps no internal buffer and applies no back
//! pressure: every [`emit`](SimpleProcessor::emit) call wraps the record in
//! a single-element batch, invokes the exporter, and blocks until the
//! exporter's completion signal resolves. Use it where the exporter can
//! absorb one batch per record; high-throughput pipelines should batch
//! upstream instead.
//!
//! Delivery problems stay on this side of the boundary: an unsuccessful
//! completion is logged at `debug`, and an exporter that panics is caught
//! and logged at `warn`. Neither reaches the code that produced the record.

use std::marker::PhantomData;
use std::panic::{AssertUnwindSafe, catch_unwind};

use hashbrown::HashMap;

use crate::export::{ExportWait, Exporter, Record};

/// Property key controlling whether only sampled records are exported.
const KEY_SAMPLED: &str = "telemark.sp.export.sampled";
/// Environment variable equivalent of [`KEY_SAMPLED`].
const ENV_SAMPLED: &str = "TELEMARK_SP_EXPORT_SAMPLED";

const DEFAULT_EXPORT_ONLY_SAMPLED: bool = true;

/// Forwards each finished record to an exporter as it arrives.
#[derive(Debug)]
pub struct SimpleProcessor<R, E> {
    exporter: E,
    export_only_sampled: bool,
    _phantom: PhantomData<fn(R)>,
}

impl<R: Record, E: Exporter<R>> SimpleProcessor<R, E> {
    /// Create a processor with default configuration.
    pub fn new(exporter: E) -> Self {
        SimpleProcessorBuilder::new().build(exporter)
    }

    /// Forward one record to the exporter.
    ///
    /// Blocks until the exporter's completion signal resolves. A failed
    /// export is logged and swallowed; a panicking exporter is contained
    /// here and never unwinds into the caller.
    pub fn emit(&self, record: R) {
        if self.export_only_sampled && !record.is_sampled() {
            return;
        }
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            futures::executor::block_on(self.exporter.export(vec![record]))
        }));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::debug!(%err, "exporter failed"),
            Err(_) => tracing::warn!("exporter panicked"),
        }
    }

    /// Release the exporter's resources. No records will be emitted after
    /// this call.
    pub fn shutdown(&self) -> ExportWait {
        self.exporter.shutdown()
    }

    /// Request any buffered records to be flushed.
    ///
    /// This processor holds no buffer, so the returned signal is always
    /// immediately ready.
    pub fn force_flush(&self) -> ExportWait {
        ExportWait::ready_ok()
    }
}

impl SimpleProcessor<(), ()> {
    /// Create a new builder for configuring a `SimpleProcessor`.
    pub fn builder() -> SimpleProcessorBuilder {
        SimpleProcessorBuilder::new()
    }
}

/// Builder for [`SimpleProcessor`].
///
/// Configuration can be set programmatically or read from a property map or
/// the process environment. Recognized names:
///
/// - property `telemark.sp.export.sampled` / environment variable
///   `TELEMARK_SP_EXPORT_SAMPLED`: whether only sampled records are
///   exported. Defaults to `true`.
#[derive(Debug, Clone)]
pub struct SimpleProcessorBuilder {
    export_only_sampled: bool,
}

impl Default for SimpleProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleProcessorBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            export_only_sampled: DEFAULT_EXPORT_ONLY_SAMPLED,
        }
    }

    /// Set whether only sampled records should be exported.
    pub fn export_only_sampled(mut self, export_only_sampled: bool) -> Self {
        self.export_only_sampled = export_only_sampled;
        self
    }

    /// Apply configuration from a property map.
    ///
    /// Keys are normalized (trimmed, lowercased, `_` treated as `.`) before
    /// matching, so `TELEMARK_SP_EXPORT_SAMPLED` and
    /// `telemark.sp.export.sampled` name the same property. Values that do
    /// not parse as booleans are skipped.
    pub fn read_properties(mut self, properties: &HashMap<String, String>) -> Self {
        for (key, value) in properties {
            if normalize_key(key) == KEY_SAMPLED
                && let Some(value) = parse_bool(value)
            {
                self.export_only_sampled = value;
            }
        }
        self
    }

    /// Apply configuration from the process environment.
    pub fn read_environment(mut self) -> Self {
        if let Ok(value) = std::env::var(ENV_SAMPLED)
            && let Some(value) = parse_bool(&value)
        {
            self.export_only_sampled = value;
        }
        self
    }

    /// Build a [`SimpleProcessor`] forwarding to the given exporter.
    pub fn build<R: Record, E: Exporter<R>>(self, exporter: E) -> SimpleProcessor<R, E> {
        SimpleProcessor {
            exporter,
            export_only_sampled: self.export_only_sampled,
            _phantom: PhantomData,
        }
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', ".")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportError;
    use assert2::check;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    struct TestRecord {
        name: &'static str,
        sampled: bool,
    }

    impl TestRecord {
        fn sampled(name: &'static str) -> Self {
            Self {
                name,
                sampled: true,
            }
        }

        fn unsampled(name: &'static str) -> Self {
            Self {
                name,
                sampled: false,
            }
        }
    }

    impl Record for TestRecord {
        fn is_sampled(&self) -> bool {
            self.sampled
        }
    }

    #[derive(Default)]
    struct TestExporter {
        batches: Mutex<Vec<Vec<TestRecord>>>,
        fail: bool,
        panic: bool,
        shutdown_called: AtomicBool,
    }

    impl Exporter<TestRecord> for TestExporter {
        fn export(&self, batch: Vec<TestRecord>) -> ExportWait {
            if self.panic {
                panic!("exporter blew up");
            }
            self.batches.lock().unwrap().push(batch);
            if self.fail {
                ExportWait::failed(ExportError::new("downstream unavailable"))
            } else {
                ExportWait::ready_ok()
            }
        }

        fn shutdown(&self) -> ExportWait {
            self.shutdown_called.store(true, Ordering::SeqCst);
            ExportWait::ready_ok()
        }
    }

    #[test]
    fn forwards_each_record_as_a_singleton_batch() {
        let processor = SimpleProcessor::new(TestExporter::default());
        processor.emit(TestRecord::sampled("a"));
        processor.emit(TestRecord::sampled("b"));

        let batches = processor.exporter.batches.lock().unwrap();
        check!(batches.len() == 2);
        check!(batches[0] == vec![TestRecord::sampled("a")]);
        check!(batches[1] == vec![TestRecord::sampled("b")]);
    }

    #[test]
    fn failed_export_is_swallowed() {
        let processor = SimpleProcessor::new(TestExporter {
            fail: true,
            ..TestExporter::default()
        });

        // Must not panic or propagate; future emits still go through.
        processor.emit(TestRecord::sampled("a"));
        processor.emit(TestRecord::sampled("b"));
        check!(processor.exporter.batches.lock().unwrap().len() == 2);
    }

    #[test]
    fn panicking_exporter_is_contained() {
        let processor = SimpleProcessor::new(TestExporter {
            panic: true,
            ..TestExporter::default()
        });

        processor.emit(TestRecord::sampled("a"));
    }

    #[test]
    fn unsampled_records_are_dropped_by_default() {
        let processor = SimpleProcessor::new(TestExporter::default());
        processor.emit(TestRecord::unsampled("dropped"));
        processor.emit(TestRecord::sampled("kept"));

        let batches = processor.exporter.batches.lock().unwrap();
        check!(batches.len() == 1);
        check!(batches[0][0].name == "kept");
    }

    #[test]
    fn unsampled_records_are_kept_when_configured() {
        let processor = SimpleProcessorBuilder::new()
            .export_only_sampled(false)
            .build(TestExporter::default());
        processor.emit(TestRecord::unsampled("kept"));

        check!(processor.exporter.batches.lock().unwrap().len() == 1);
    }

    #[test]
    fn shutdown_delegates_to_the_exporter() {
        let processor = SimpleProcessor::<TestRecord, _>::new(TestExporter::default());
        futures::executor::block_on(processor.shutdown()).unwrap();
        check!(processor.exporter.shutdown_called.load(Ordering::SeqCst));
    }

    #[test]
    fn force_flush_is_immediately_ready() {
        let processor = SimpleProcessor::<TestRecord, _>::new(TestExporter::default());
        check!(futures::executor::block_on(processor.force_flush()).is_ok());
    }

    #[test]
    fn properties_configure_sampling_with_normalized_keys() {
        let mut properties = HashMap::new();
        properties.insert("TELEMARK_SP_EXPORT_SAMPLED".to_string(), "false".to_string());

        let builder = SimpleProcessorBuilder::new().read_properties(&properties);
        check!(!builder.export_only_sampled);
    }

    #[test]
    fn unparseable_property_values_are_skipped() {
        let mut properties = HashMap::new();
        properties.insert(KEY_SAMPLED.to_string(), "yes please".to_string());

        let builder = SimpleProcessorBuilder::new().read_properties(&properties);
        check!(builder.export_only_sampled == DEFAULT_EXPORT_ONLY_SAMPLED);
    }

    #[test]
    fn environment_configures_sampling() {
        // SAFETY: no other thread in this test binary reads or writes this
        // variable concurrently.
        unsafe { std::env::set_var(ENV_SAMPLED, "false") };
        let builder = SimpleProcessorBuilder::new().read_environment();
        unsafe { std::env::remove_var(ENV_SAMPLED) };
        check!(!builder.export_only_sampled);
    }
}
