//! Skip detection for outputs that already match their input.
//!
//! The check favors correctness over speed: a corrupt, truncated, or
//! unprobeable prior output is always re-produced.

use crate::external::prober::{DurationTolerance, probe_duration};
use std::fs;
use std::path::Path;

/// Decides whether re-processing `output` can be skipped.
///
/// Skips only when the output exists with non-zero size and both input and
/// output durations probe to numeric triples within the tolerance. Any probe
/// failure (prober exit, spawn error, unparseable annotation) means "cannot
/// confirm equality" and results in a re-encode; it never aborts the run.
pub fn should_skip(
    prober_bin: &Path,
    input: &Path,
    output: &Path,
    tolerance: &DurationTolerance,
) -> bool {
    let Ok(metadata) = fs::metadata(output) else {
        return false;
    };
    if metadata.len() == 0 {
        log::debug!("Existing output {} is empty, re-encoding", output.display());
        return false;
    }

    let input_duration = match probe_duration(prober_bin, input) {
        Ok(d) => d,
        Err(e) => {
            log::warn!("Probe failed for {}: {}", input.display(), e);
            return false;
        }
    };
    let output_duration = match probe_duration(prober_bin, output) {
        Ok(d) => d,
        Err(e) => {
            log::warn!("Probe failed for {}: {}", output.display(), e);
            return false;
        }
    };

    match (input_duration, output_duration) {
        (Some(a), Some(b)) => {
            let matches = a.within_tolerance(&b, tolerance);
            if matches {
                log::info!(
                    "Skipping {}: duration matches existing output",
                    output.display()
                );
            }
            matches
        }
        _ => false,
    }
}
