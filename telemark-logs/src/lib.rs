#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod builder;
pub mod record;

pub use builder::LogRecordBuilder;
pub use record::{AnyValue, LogRecord, Severity};
