//! Core library for batch media transcoding, preview generation, and
//! publishing.
//!
//! This crate walks a directory tree of media files, transcodes each into
//! WebM and MP4 targets via an external encoder, optionally composites an
//! animated preview, and optionally publishes outputs to an object store or
//! a local mirror — skipping work already completed and isolating per-file
//! failures so one bad input never aborts a batch.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use recast_core::{CoreConfig, run_pipeline};
//! use std::path::PathBuf;
//!
//! let mut config = CoreConfig::new(
//!     PathBuf::from("/path/to/input"),
//!     PathBuf::from("/path/to/output"),
//! );
//! config.concurrency = 2;
//! config.export_metadata = true;
//!
//! let summary = run_pipeline(&config).unwrap();
//! println!(
//!     "{} converted, {} skipped, {} errored",
//!     summary.converted, summary.skipped, summary.errored
//! );
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod idempotency;
pub mod pipeline;
pub mod publish;
pub mod report;
pub mod task;
pub mod thumbnail;
pub mod utils;

// Re-exports for the public API
pub use config::{CoreConfig, PublishMode};
pub use discovery::find_processable_files;
pub use error::{CoreError, CoreResult};
pub use external::{DurationTolerance, HmsDuration};
pub use pipeline::{RunSummary, run_pipeline};
pub use publish::{LocalMirror, PublishTarget, RemoteStore, derive_object_key};
pub use report::{ERROR_REPORT_FILENAME, ErrorRecord};
pub use task::{FileTask, TaskState};
pub use utils::format_duration;
