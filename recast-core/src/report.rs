//! Run-wide error collection and the final JSON report.
//!
//! Workers share one append-only collector; records are persisted exactly
//! once at the end of a run. Failing to write the report is fatal, since the
//! run could not otherwise confirm what failed.

use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Well-known name of the report under the output root.
pub const ERROR_REPORT_FILENAME: &str = "errors.json";

/// One recorded per-file stage failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    /// Pipeline stage the failure occurred in.
    pub stage: String,
    /// Rendered underlying error.
    pub message: String,
    /// Input file being processed.
    pub input_path: PathBuf,
    /// Output the stage was attempting to produce, when known.
    pub output_path: Option<PathBuf>,
}

/// Concurrency-safe append-only list of error records.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    records: Mutex<Vec<ErrorRecord>>,
}

impl ErrorCollector {
    /// Records one stage failure and logs it.
    pub fn record(&self, stage: &str, error: &CoreError, input: &Path, output: Option<&Path>) {
        log::error!("{} failed for {}: {}", stage, input.display(), error);
        let record = ErrorRecord {
            stage: stage.to_string(),
            message: error.to_string(),
            input_path: input.to_path_buf(),
            output_path: output.map(Path::to_path_buf),
        };
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record);
    }

    /// Number of records collected so far.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the collector, returning all records.
    pub fn into_records(self) -> Vec<ErrorRecord> {
        self.records.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Serialize)]
struct ErrorReport<'a> {
    generated_at: String,
    error_count: usize,
    errors: &'a [ErrorRecord],
}

/// Writes the aggregated error report under the output root.
///
/// # Errors
///
/// Propagates serialization and I/O failures; the caller treats these as
/// fatal for the run.
pub fn write_error_report(output_root: &Path, records: &[ErrorRecord]) -> CoreResult<PathBuf> {
    let path = output_root.join(ERROR_REPORT_FILENAME);
    let report = ErrorReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        error_count: records.len(),
        errors: records,
    };
    let body = serde_json::to_string_pretty(&report)?;
    fs::write(&path, body)?;
    log::info!("Wrote error report with {} entries to {}", records.len(), path.display());
    Ok(path)
}
