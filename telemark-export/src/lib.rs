#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod export;
pub mod processor;

pub use export::{ExportError, ExportResult, ExportWait, Exporter, Record};
pub use processor::{SimpleProcessor, SimpleProcessorBuilder};
