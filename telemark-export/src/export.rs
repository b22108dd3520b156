//! Contains the [`Exporter`] trait implemented by delivery backends, and the
//! [`ExportWait`] completion signal returned from export and shutdown calls.

use std::borrow::Cow;
use std::fmt;
use std::pin::Pin;

/// Outcome of a completed export or shutdown call.
pub type ExportResult = Result<(), ExportError>;

/// Error reported by an exporter when a batch could not be delivered.
///
/// Carries a human-readable message only. The forwarding boundary logs these
/// rather than propagating them, so there is no structured error data to
/// match on.
#[derive(Debug, Clone)]
pub struct ExportError {
    message: Cow<'static, str>,
}

impl ExportError {
    /// Create an error from a message.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "export failed: {}", self.message)
    }
}

impl std::error::Error for ExportError {}

/// This struct contains a future that can be used to wait for an export or
/// shutdown call to complete.
///
/// In synchronous code, you can use `pollster::block_on` or
/// `futures::executor::block_on` to wait for this future to complete.
#[must_use = "future does nothing unless polled"]
pub struct ExportWait(Pin<Box<dyn Future<Output = ExportResult> + Send + 'static>>);

impl Future for ExportWait {
    type Output = ExportResult;

    fn poll(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Self::Output> {
        self.0.as_mut().poll(cx)
    }
}

impl ExportWait {
    /// Return an `ExportWait` that resolves successfully immediately.
    pub fn ready_ok() -> Self {
        Self(Box::pin(std::future::ready(Ok(()))))
    }

    /// Return an `ExportWait` that resolves to the given error immediately.
    pub fn failed(error: ExportError) -> Self {
        Self(Box::pin(std::future::ready(Err(error))))
    }

    /// Create an `ExportWait` that resolves when a future is ready.
    pub fn from_future(f: impl Future<Output = ExportResult> + Send + 'static) -> Self {
        Self(Box::pin(f))
    }
}

impl fmt::Debug for ExportWait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExportWait").finish()
    }
}

/// A finished immutable record that can be handed to an exporter.
///
/// Implemented by point snapshots and log records. Spans carry a sampled
/// bit; record kinds without one report `true`.
pub trait Record {
    /// Whether this record was sampled in.
    fn is_sampled(&self) -> bool {
        true
    }
}

/// Destination that delivers batches of finished records.
///
/// `export` receives a finite ordered batch and returns a completion signal;
/// it should move delivery failures into the signal rather than panicking,
/// but callers at the forwarding boundary contain a panicking implementation
/// anyway.
pub trait Exporter<R>: Send + Sync {
    /// Deliver a batch of records.
    fn export(&self, batch: Vec<R>) -> ExportWait;

    /// Release any resources held by this exporter. No export calls will
    /// follow.
    fn shutdown(&self) -> ExportWait {
        ExportWait::ready_ok()
    }
}
